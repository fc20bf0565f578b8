use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{common::entities::app_errors::CoreError, nutrition::entities::SessionState};

/// Closed set of nutrients the tally knows how to track.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum NutrientKey {
    Calories,
    Water,
    Protein,
    Fat,
    Carbohydrates,
    Sugar,
    Fiber,
    Sodium,
}

impl NutrientKey {
    pub const ALL: [NutrientKey; 8] = [
        NutrientKey::Calories,
        NutrientKey::Water,
        NutrientKey::Protein,
        NutrientKey::Fat,
        NutrientKey::Carbohydrates,
        NutrientKey::Sugar,
        NutrientKey::Fiber,
        NutrientKey::Sodium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientKey::Calories => "calories",
            NutrientKey::Water => "water",
            NutrientKey::Protein => "protein",
            NutrientKey::Fat => "fat",
            NutrientKey::Carbohydrates => "carbohydrates",
            NutrientKey::Sugar => "sugar",
            NutrientKey::Fiber => "fiber",
            NutrientKey::Sodium => "sodium",
        }
    }

    /// Label shown on cards, bars and the warning banner.
    pub fn label(&self) -> &'static str {
        match self {
            NutrientKey::Calories => "에너지",
            NutrientKey::Water => "수분",
            NutrientKey::Protein => "단백질",
            NutrientKey::Fat => "지방",
            NutrientKey::Carbohydrates => "탄수화물",
            NutrientKey::Sugar => "당류",
            NutrientKey::Fiber => "식이섬유",
            NutrientKey::Sodium => "나트륨",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            NutrientKey::Calories => "kcal",
            NutrientKey::Water => "ml",
            NutrientKey::Sodium => "mg",
            _ => "g",
        }
    }

    pub fn bar_color(&self) -> &'static str {
        match self {
            NutrientKey::Calories => "#4CAF50",
            NutrientKey::Water | NutrientKey::Fiber => "#2196F3",
            NutrientKey::Protein => "#FF9800",
            NutrientKey::Fat => "#E91E63",
            NutrientKey::Carbohydrates => "#9C27B0",
            NutrientKey::Sugar | NutrientKey::Sodium => "#FF5722",
        }
    }

    /// Field names a classifier may report this nutrient under.
    pub fn source_aliases(&self) -> &'static [&'static str] {
        match self {
            NutrientKey::Calories => &["calories", "energy", "kcal"],
            NutrientKey::Water => &["water", "moisture"],
            NutrientKey::Protein => &["protein"],
            NutrientKey::Fat => &["fat", "total_fat"],
            NutrientKey::Carbohydrates => &["carbohydrates", "carbohydrate", "carbs"],
            NutrientKey::Sugar => &["sugar", "sugars"],
            NutrientKey::Fiber => &["fiber", "dietary_fiber", "fibre"],
            NutrientKey::Sodium => &["sodium"],
        }
    }

    pub fn matches_source(&self, field_name: &str) -> bool {
        let field_name = field_name.trim();
        self.source_aliases()
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(field_name))
    }
}

impl fmt::Display for NutrientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NutrientKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NutrientKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::InvalidConfiguration(format!("unknown nutrient '{s}'")))
    }
}

const WATER_SUGAR_DAILY_VALUES: [(NutrientKey, f64); 6] = [
    (NutrientKey::Calories, 2600.0),
    (NutrientKey::Water, 2500.0),
    (NutrientKey::Protein, 65.0),
    (NutrientKey::Fat, 65.0),
    (NutrientKey::Carbohydrates, 360.0),
    (NutrientKey::Sugar, 50.0),
];

const FIBER_SODIUM_DAILY_VALUES: [(NutrientKey, f64); 6] = [
    (NutrientKey::Calories, 2600.0),
    (NutrientKey::Carbohydrates, 360.0),
    (NutrientKey::Protein, 65.0),
    (NutrientKey::Fat, 65.0),
    (NutrientKey::Fiber, 25.0),
    (NutrientKey::Sodium, 2300.0),
];

/// The six nutrients tracked by a deployment, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum NutrientProfile {
    #[default]
    WaterSugar,
    FiberSodium,
}

impl NutrientProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientProfile::WaterSugar => "water-sugar",
            NutrientProfile::FiberSodium => "fiber-sodium",
        }
    }

    fn daily_value_table(&self) -> &'static [(NutrientKey, f64)] {
        match self {
            NutrientProfile::WaterSugar => &WATER_SUGAR_DAILY_VALUES,
            NutrientProfile::FiberSodium => &FIBER_SODIUM_DAILY_VALUES,
        }
    }

    pub fn keys(self) -> impl Iterator<Item = NutrientKey> {
        self.daily_value_table().iter().map(|(key, _)| *key)
    }

    pub fn key_count(&self) -> usize {
        self.daily_value_table().len()
    }

    pub fn contains(&self, key: NutrientKey) -> bool {
        self.keys().any(|k| k == key)
    }
}

impl fmt::Display for NutrientProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NutrientProfile {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "water-sugar" => Ok(NutrientProfile::WaterSugar),
            "fiber-sodium" => Ok(NutrientProfile::FiberSodium),
            other => Err(CoreError::InvalidConfiguration(format!(
                "unknown nutrient profile '{other}', expected one of: water-sugar, fiber-sodium"
            ))),
        }
    }
}

/// How running totals are carried inside rendered markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StateEncoding {
    /// Exact totals in a comment inside the summary zone.
    #[default]
    StateBlock,
    /// Totals recovered from the truncated percentage labels only.
    PercentLabels,
}

impl StateEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateEncoding::StateBlock => "state-block",
            StateEncoding::PercentLabels => "percent-labels",
        }
    }
}

impl fmt::Display for StateEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateEncoding {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "state-block" => Ok(StateEncoding::StateBlock),
            "percent-labels" => Ok(StateEncoding::PercentLabels),
            other => Err(CoreError::InvalidConfiguration(format!(
                "unknown state encoding '{other}', expected one of: state-block, percent-labels"
            ))),
        }
    }
}

/// A nutrient amount as reported by the classifier, kept verbatim for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NutrientValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for NutrientValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NutrientValue::Number(number) => write!(f, "{number}"),
            NutrientValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for NutrientValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(NutrientValue::Number)
            .unwrap_or_else(|| NutrientValue::Text(String::new()))
    }
}

impl From<i64> for NutrientValue {
    fn from(value: i64) -> Self {
        NutrientValue::Number(value.into())
    }
}

impl From<i32> for NutrientValue {
    fn from(value: i32) -> Self {
        NutrientValue::Number(value.into())
    }
}

impl From<&str> for NutrientValue {
    fn from(value: &str) -> Self {
        NutrientValue::Text(value.to_string())
    }
}

impl From<String> for NutrientValue {
    fn from(value: String) -> Self {
        NutrientValue::Text(value)
    }
}

impl From<&NutrientValue> for NutrientValue {
    fn from(value: &NutrientValue) -> Self {
        value.clone()
    }
}

/// Quantities per nutrient. A key that is absent reads as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct NutrientSet(BTreeMap<NutrientKey, f64>);

impl NutrientSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zeroed(profile: NutrientProfile) -> Self {
        profile.keys().map(|key| (key, 0.0)).collect()
    }

    pub fn get(&self, key: NutrientKey) -> f64 {
        self.0.get(&key).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, key: NutrientKey, value: f64) {
        self.0.insert(key, value);
    }

    pub fn with(mut self, key: NutrientKey, value: f64) -> Self {
        self.set(key, value);
        self
    }

    pub fn contains(&self, key: NutrientKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NutrientKey, f64)> + '_ {
        self.0.iter().map(|(key, value)| (*key, *value))
    }

    /// True when every key of the profile, and nothing else, is present.
    pub fn covers_exactly(&self, profile: NutrientProfile) -> bool {
        self.0.len() == profile.key_count() && profile.keys().all(|key| self.contains(key))
    }
}

impl FromIterator<(NutrientKey, f64)> for NutrientSet {
    fn from_iter<I: IntoIterator<Item = (NutrientKey, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// `calories=180;water=50`
impl fmt::Display for NutrientSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(";")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

impl FromStr for NutrientSet {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = NutrientSet::new();

        for entry in s.split([';', ',']).map(str::trim).filter(|e| !e.is_empty()) {
            let (key, value) = entry.split_once('=').ok_or_else(|| {
                CoreError::InvalidConfiguration(format!("expected key=value, got '{entry}'"))
            })?;
            let key: NutrientKey = key.parse()?;
            let value: f64 = value.trim().parse().map_err(|_| {
                CoreError::InvalidConfiguration(format!("'{value}' is not a number for {key}"))
            })?;
            if !value.is_finite() {
                return Err(CoreError::InvalidConfiguration(format!(
                    "{key} must be a finite number"
                )));
            }
            set.set(key, value);
        }

        Ok(set)
    }
}

/// Daily upper targets for the nutrients of one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecommendedDailyValues {
    profile: NutrientProfile,
    values: NutrientSet,
}

impl RecommendedDailyValues {
    pub fn for_profile(profile: NutrientProfile) -> Self {
        Self {
            profile,
            values: profile.daily_value_table().iter().copied().collect(),
        }
    }

    pub fn with_overrides(mut self, overrides: &NutrientSet) -> Result<Self, CoreError> {
        for (key, value) in overrides.iter() {
            if !self.profile.contains(key) {
                return Err(CoreError::InvalidConfiguration(format!(
                    "{key} is not tracked by the {} profile",
                    self.profile
                )));
            }
            self.values.set(key, value);
        }
        Ok(self)
    }

    /// Every tracked nutrient needs a positive, finite target; percentages divide by it.
    pub fn validate(&self) -> Result<(), CoreError> {
        for key in self.profile.keys() {
            let value = self.values.get(key);
            if !value.is_finite() || value <= 0.0 {
                return Err(CoreError::InvalidConfiguration(format!(
                    "recommended value for {key} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn profile(&self) -> NutrientProfile {
        self.profile
    }

    pub fn get(&self, key: NutrientKey) -> f64 {
        self.values.get(key)
    }

    pub fn values(&self) -> &NutrientSet {
        &self.values
    }
}

/// One nutrient's running total measured against its daily target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntakePercent {
    pub key: NutrientKey,
    pub total: f64,
    pub recommended: f64,
    pub percent: f64,
}

impl IntakePercent {
    pub fn new(key: NutrientKey, total: f64, recommended: f64) -> Self {
        Self {
            key,
            total,
            recommended,
            percent: total / recommended * 100.0,
        }
    }

    /// Whole percent as shown in labels; the fraction is dropped, not rounded.
    pub fn label_percent(&self) -> i64 {
        self.percent.trunc() as i64
    }

    pub fn is_exceeded(&self) -> bool {
        self.total > self.recommended
    }
}

#[derive(Debug, Clone)]
pub struct SubmitMarkupInput {
    pub image_data: Vec<u8>,
    pub prior_markup: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SubmitSessionInput {
    pub image_data: Vec<u8>,
    pub prior_state: Option<SessionState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_key_order_is_render_order() {
        let water_sugar: Vec<_> = NutrientProfile::WaterSugar.keys().collect();
        assert_eq!(
            water_sugar,
            vec![
                NutrientKey::Calories,
                NutrientKey::Water,
                NutrientKey::Protein,
                NutrientKey::Fat,
                NutrientKey::Carbohydrates,
                NutrientKey::Sugar,
            ]
        );

        let fiber_sodium: Vec<_> = NutrientProfile::FiberSodium.keys().collect();
        assert_eq!(fiber_sodium[1], NutrientKey::Carbohydrates);
        assert_eq!(fiber_sodium[5], NutrientKey::Sodium);
    }

    #[test]
    fn test_recommended_values_per_profile() {
        let water_sugar = RecommendedDailyValues::for_profile(NutrientProfile::WaterSugar);
        assert_eq!(water_sugar.get(NutrientKey::Calories), 2600.0);
        assert_eq!(water_sugar.get(NutrientKey::Water), 2500.0);
        assert_eq!(water_sugar.get(NutrientKey::Sugar), 50.0);
        assert!(water_sugar.validate().is_ok());

        let fiber_sodium = RecommendedDailyValues::for_profile(NutrientProfile::FiberSodium);
        assert_eq!(fiber_sodium.get(NutrientKey::Fiber), 25.0);
        assert_eq!(fiber_sodium.get(NutrientKey::Sodium), 2300.0);
    }

    #[test]
    fn test_overrides_replace_recommended_values() {
        let overrides: NutrientSet = "sugar=40".parse().unwrap();
        let values = RecommendedDailyValues::for_profile(NutrientProfile::WaterSugar)
            .with_overrides(&overrides)
            .unwrap();

        assert_eq!(values.get(NutrientKey::Sugar), 40.0);
        assert_eq!(values.get(NutrientKey::Calories), 2600.0);
    }

    #[test]
    fn test_overrides_reject_untracked_nutrient() {
        let overrides: NutrientSet = "sodium=2000".parse().unwrap();
        let result = RecommendedDailyValues::for_profile(NutrientProfile::WaterSugar)
            .with_overrides(&overrides);

        assert!(matches!(result, Err(CoreError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_validate_rejects_zero_recommended_value() {
        let overrides: NutrientSet = "fat=0".parse().unwrap();
        let values = RecommendedDailyValues::for_profile(NutrientProfile::WaterSugar)
            .with_overrides(&overrides)
            .unwrap();

        assert!(matches!(
            values.validate(),
            Err(CoreError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_nutrient_set_missing_key_reads_as_zero() {
        let set = NutrientSet::new().with(NutrientKey::Protein, 12.5);
        assert_eq!(set.get(NutrientKey::Protein), 12.5);
        assert_eq!(set.get(NutrientKey::Sodium), 0.0);
    }

    #[test]
    fn test_nutrient_set_text_form_is_exact() {
        let set = NutrientSet::zeroed(NutrientProfile::WaterSugar)
            .with(NutrientKey::Calories, 336.1)
            .with(NutrientKey::Fat, 0.1 + 0.2);

        let parsed: NutrientSet = set.to_string().parse().unwrap();
        assert_eq!(parsed, set);
        assert!(parsed.covers_exactly(NutrientProfile::WaterSugar));
    }

    #[test]
    fn test_nutrient_set_parse_errors() {
        assert!("calories".parse::<NutrientSet>().is_err());
        assert!("calories=abc".parse::<NutrientSet>().is_err());
        assert!("vitamin_c=10".parse::<NutrientSet>().is_err());
        assert!("calories=inf".parse::<NutrientSet>().is_err());
        assert!("".parse::<NutrientSet>().unwrap().is_empty());
    }

    #[test]
    fn test_source_aliases_match_classifier_field_names() {
        assert!(NutrientKey::Calories.matches_source("Energy"));
        assert!(NutrientKey::Fiber.matches_source("Dietary_Fiber"));
        assert!(NutrientKey::Carbohydrates.matches_source("Carbohydrates"));
        assert!(!NutrientKey::Sugar.matches_source("Sodium"));
    }

    #[test]
    fn test_nutrient_value_deserializes_numbers_and_text() {
        let value: NutrientValue = serde_json::from_str("42").unwrap();
        assert_eq!(value, NutrientValue::from(42));
        assert_eq!(value.to_string(), "42");

        let value: NutrientValue = serde_json::from_str("\"180kcal\"").unwrap();
        assert_eq!(value.to_string(), "180kcal");
    }

    #[test]
    fn test_intake_percent_truncates_label() {
        let intake = IntakePercent::new(NutrientKey::Calories, 336.0, 2600.0);
        assert_eq!(intake.label_percent(), 12);
        assert!(!intake.is_exceeded());

        let at_target = IntakePercent::new(NutrientKey::Sugar, 50.0, 50.0);
        assert_eq!(at_target.label_percent(), 100);
        assert!(!at_target.is_exceeded());
    }

    #[test]
    fn test_enum_text_forms() {
        assert_eq!(
            "fiber-sodium".parse::<NutrientProfile>().unwrap(),
            NutrientProfile::FiberSodium
        );
        assert_eq!(
            "percent-labels".parse::<StateEncoding>().unwrap(),
            StateEncoding::PercentLabels
        );
        assert_eq!(StateEncoding::default().to_string(), "state-block");
        assert!("water".parse::<NutrientProfile>().is_err());
    }
}
