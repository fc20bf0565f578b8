use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    common::generate_timestamp,
    nutrition::{
        helpers::extract_number,
        value_objects::{NutrientKey, NutrientProfile, NutrientSet, NutrientValue},
    },
};

/// Raw answer of a food classifier for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClassifiedFood {
    #[serde(default)]
    pub food_name: String,
    #[serde(default)]
    pub confidence: f64,
    /// Nutrient field name to reported amount, e.g. `"Energy": "180kcal"`
    #[serde(default)]
    #[schema(value_type = Object)]
    pub nutrients: BTreeMap<String, NutrientValue>,
}

/// One recognized food item, fixed once classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Observation {
    pub id: Uuid,
    pub food_name: String,
    /// Classifier confidence, 0 to 100
    pub confidence: f64,
    #[schema(value_type = Object)]
    pub nutrients: BTreeMap<NutrientKey, NutrientValue>,
    pub observed_at: DateTime<Utc>,
}

impl Observation {
    pub fn new(
        food_name: impl Into<String>,
        confidence: f64,
        nutrients: BTreeMap<NutrientKey, NutrientValue>,
    ) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            id: Uuid::new_v7(timestamp),
            food_name: food_name.into(),
            confidence,
            nutrients,
            observed_at: now,
        }
    }

    /// Keeps the profile's nutrients, matched by any known field name. The
    /// first matching field wins. Negative amounts are clamped to zero.
    pub fn from_classification(food: ClassifiedFood, profile: NutrientProfile) -> Self {
        let nutrients = profile
            .keys()
            .filter_map(|key| {
                food.nutrients
                    .iter()
                    .find(|(field_name, _)| key.matches_source(field_name))
                    .map(|(_, value)| (key, non_negative(value)))
            })
            .collect();

        Self::new(food.food_name.trim(), food.confidence, nutrients)
    }

    pub fn display_value(&self, key: NutrientKey) -> Option<&NutrientValue> {
        self.nutrients.get(&key)
    }

    /// Reported amounts as numbers. Unreported nutrients are left out.
    pub fn quantities(&self) -> NutrientSet {
        self.nutrients
            .iter()
            .map(|(key, value)| (*key, extract_number(value)))
            .collect()
    }
}

fn non_negative(value: &NutrientValue) -> NutrientValue {
    match value {
        NutrientValue::Number(number) if number.as_f64().is_some_and(|n| n < 0.0) => {
            NutrientValue::from(0)
        }
        other => other.clone(),
    }
}
