use crate::domain::nutrition::{
    ports::FoodClassifier,
    value_objects::{NutrientProfile, RecommendedDailyValues, StateEncoding},
};

#[derive(Debug, Clone)]
pub struct Service<FC>
where
    FC: FoodClassifier,
{
    pub(crate) food_classifier: FC,
    pub(crate) recommended: RecommendedDailyValues,
    pub(crate) state_encoding: StateEncoding,
}

impl<FC> Service<FC>
where
    FC: FoodClassifier,
{
    pub fn new(
        food_classifier: FC,
        recommended: RecommendedDailyValues,
        state_encoding: StateEncoding,
    ) -> Self {
        Self {
            food_classifier,
            recommended,
            state_encoding,
        }
    }

    pub fn profile(&self) -> NutrientProfile {
        self.recommended.profile()
    }

    pub fn recommended(&self) -> &RecommendedDailyValues {
        &self.recommended
    }

    pub fn state_encoding(&self) -> StateEncoding {
        self.state_encoding
    }
}
