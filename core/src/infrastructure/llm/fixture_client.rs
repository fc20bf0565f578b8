use tracing::debug;

use crate::domain::{
    common::entities::app_errors::CoreError,
    nutrition::{entities::ClassifiedFood, ports::FoodClassifier, value_objects::NutrientValue},
};

/// Answers every image with the same food. Used for demos and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureFoodClassifier {
    food: ClassifiedFood,
}

impl FixtureFoodClassifier {
    pub fn new(food: ClassifiedFood) -> Self {
        Self { food }
    }
}

impl Default for FixtureFoodClassifier {
    fn default() -> Self {
        let nutrients = [
            ("calories", "180kcal"),
            ("water", "50"),
            ("protein", "10g"),
            ("fat", "5"),
            ("carbohydrates", "30"),
            ("sugar", "8"),
            ("dietary_fiber", "3g"),
            ("sodium", "420mg"),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), NutrientValue::from(value)))
        .collect();

        Self::new(ClassifiedFood {
            food_name: "비빔밥".to_string(),
            confidence: 92.5,
            nutrients,
        })
    }
}

impl FoodClassifier for FixtureFoodClassifier {
    async fn classify(&self, image_data: Vec<u8>) -> Result<ClassifiedFood, CoreError> {
        debug!(
            image_bytes = image_data.len(),
            food_name = %self.food.food_name,
            "fixture classification"
        );
        Ok(self.food.clone())
    }
}
