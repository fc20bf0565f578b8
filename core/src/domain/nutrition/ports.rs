use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    nutrition::{
        entities::{ClassifiedFood, SessionSnapshot, SubmitOutcome},
        value_objects::{SubmitMarkupInput, SubmitSessionInput},
    },
};

/// Recognizes the food in an image and reports its nutrients.
#[cfg_attr(test, mockall::automock)]
pub trait FoodClassifier: Send + Sync {
    fn classify(
        &self,
        image_data: Vec<u8>,
    ) -> impl Future<Output = Result<ClassifiedFood, CoreError>> + Send;
}

/// Service trait for the nutrition tally
#[cfg_attr(test, mockall::automock)]
pub trait NutritionService: Send + Sync {
    /// Classifies the image and folds it into the markup from the previous turn.
    fn submit_markup(
        &self,
        input: SubmitMarkupInput,
    ) -> impl Future<Output = Result<SubmitOutcome, CoreError>> + Send;

    /// Classifies the image and records it in a typed session.
    fn submit_session(
        &self,
        input: SubmitSessionInput,
    ) -> impl Future<Output = Result<SessionSnapshot, CoreError>> + Send;
}
