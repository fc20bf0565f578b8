use tracing::{debug, instrument};

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    nutrition::{
        entities::{Observation, SessionSnapshot, SessionState, SubmitOutcome},
        ports::{FoodClassifier, NutritionService},
        session::{PriorMarkup, on_submit_state},
        value_objects::{SubmitMarkupInput, SubmitSessionInput},
    },
};

impl<FC> Service<FC>
where
    FC: FoodClassifier,
{
    async fn observe(&self, image_data: Vec<u8>) -> Result<Observation, CoreError> {
        if image_data.is_empty() {
            return Err(CoreError::Invalid);
        }

        let food = self.food_classifier.classify(image_data).await?;
        let observation = Observation::from_classification(food, self.profile());

        debug!(
            observation_id = %observation.id,
            food_name = %observation.food_name,
            confidence = observation.confidence,
            nutrients = observation.nutrients.len(),
            "food classified"
        );

        Ok(observation)
    }
}

impl<FC> NutritionService for Service<FC>
where
    FC: FoodClassifier,
{
    #[instrument(skip(self, input), fields(image_bytes = input.image_data.len()))]
    async fn submit_markup(&self, input: SubmitMarkupInput) -> Result<SubmitOutcome, CoreError> {
        let prior = PriorMarkup::inspect(input.prior_markup.as_deref());

        // Corrupted markup is handed back as-is, so there is nothing to classify for.
        if let PriorMarkup::Corrupted(markup) = prior {
            return Ok(SubmitOutcome::unchanged(markup));
        }

        let observation = self.observe(input.image_data).await?;

        Ok(prior.apply(&observation, &self.recommended, self.state_encoding))
    }

    #[instrument(skip(self, input), fields(image_bytes = input.image_data.len()))]
    async fn submit_session(
        &self,
        input: SubmitSessionInput,
    ) -> Result<SessionSnapshot, CoreError> {
        let profile = self.profile();

        if let Some(state) = &input.prior_state
            && state.profile != profile
        {
            return Err(CoreError::ProfileMismatch {
                expected: profile.to_string(),
                actual: state.profile.to_string(),
            });
        }

        let observation = self.observe(input.image_data).await?;
        let prior = input
            .prior_state
            .unwrap_or_else(|| SessionState::new(profile));

        Ok(on_submit_state(
            observation,
            Some(prior),
            &self.recommended,
            self.state_encoding,
        ))
    }
}
