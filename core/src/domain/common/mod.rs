use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use uuid::{NoContext, Timestamp};

use crate::domain::{
    common::entities::app_errors::CoreError,
    nutrition::value_objects::{NutrientProfile, NutrientSet, StateEncoding},
};

pub mod entities;
pub mod services;

#[derive(Clone, Debug, Default)]
pub struct MealTallyConfig {
    pub llm: LLMConfig,
    pub nutrition: NutritionConfig,
}

#[derive(Clone, Debug)]
pub struct LLMConfig {
    pub classifier: ClassifierKind,
    pub gemini_api_key: String,
    pub gemini_model: String,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierKind::default(),
            gemini_api_key: String::new(),
            gemini_model: "gemini-2.0-flash".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct NutritionConfig {
    pub profile: NutrientProfile,
    pub state_encoding: StateEncoding,
    /// Per-nutrient replacements for the profile's recommended daily values
    pub recommended_overrides: NutrientSet,
}

/// Which food classifier backs the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClassifierKind {
    Gemini,
    #[default]
    Fixture,
}

impl ClassifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierKind::Gemini => "gemini",
            ClassifierKind::Fixture => "fixture",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassifierKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ClassifierKind::Gemini),
            "fixture" => Ok(ClassifierKind::Fixture),
            other => Err(CoreError::InvalidConfiguration(format!(
                "unknown classifier '{other}', expected one of: gemini, fixture"
            ))),
        }
    }
}

pub fn generate_timestamp() -> (DateTime<Utc>, Timestamp) {
    let now = Utc::now();
    let seconds = now.timestamp().try_into().unwrap_or(0);
    let timestamp = Timestamp::from_unix(NoContext, seconds, now.timestamp_subsec_nanos());

    (now, timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_kind_parses_case_insensitively() {
        assert_eq!(
            "Gemini".parse::<ClassifierKind>().unwrap(),
            ClassifierKind::Gemini
        );
        assert_eq!(
            " fixture ".parse::<ClassifierKind>().unwrap(),
            ClassifierKind::Fixture
        );
    }

    #[test]
    fn test_classifier_kind_rejects_unknown_backend() {
        let err = "openai".parse::<ClassifierKind>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfiguration(_)));
    }
}
