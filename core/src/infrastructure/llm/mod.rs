use crate::domain::{
    common::entities::app_errors::CoreError,
    nutrition::{entities::ClassifiedFood, ports::FoodClassifier},
};

pub mod fixture_client;
pub mod gemini_client;

pub use fixture_client::FixtureFoodClassifier;
pub use gemini_client::GeminiFoodClassifier;

/// The classifier chosen at startup.
#[derive(Debug, Clone)]
pub enum ClassifierBackend {
    Gemini(GeminiFoodClassifier),
    Fixture(FixtureFoodClassifier),
}

impl FoodClassifier for ClassifierBackend {
    async fn classify(&self, image_data: Vec<u8>) -> Result<ClassifiedFood, CoreError> {
        match self {
            ClassifierBackend::Gemini(classifier) => classifier.classify(image_data).await,
            ClassifierBackend::Fixture(classifier) => classifier.classify(image_data).await,
        }
    }
}
