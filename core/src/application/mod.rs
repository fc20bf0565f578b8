use tracing::info;

use crate::{
    domain::{
        common::{
            ClassifierKind, MealTallyConfig, entities::app_errors::CoreError, services::Service,
        },
        nutrition::value_objects::RecommendedDailyValues,
    },
    infrastructure::llm::{ClassifierBackend, FixtureFoodClassifier, GeminiFoodClassifier},
};

pub type MealTallyService = Service<ClassifierBackend>;

/// Validates the configuration and wires the classifier chosen by it.
pub fn create_service(config: MealTallyConfig) -> Result<MealTallyService, CoreError> {
    let profile = config.nutrition.profile;
    let recommended = RecommendedDailyValues::for_profile(profile)
        .with_overrides(&config.nutrition.recommended_overrides)?;
    recommended.validate()?;

    let classifier = match config.llm.classifier {
        ClassifierKind::Gemini => {
            if config.llm.gemini_api_key.trim().is_empty() {
                return Err(CoreError::InvalidConfiguration(
                    "a Gemini API key is required for the gemini classifier".to_string(),
                ));
            }
            ClassifierBackend::Gemini(GeminiFoodClassifier::new(
                config.llm.gemini_api_key,
                config.llm.gemini_model,
                profile,
            ))
        }
        ClassifierKind::Fixture => ClassifierBackend::Fixture(FixtureFoodClassifier::default()),
    };

    info!(
        profile = %profile,
        classifier = %config.llm.classifier,
        state_encoding = %config.nutrition.state_encoding,
        "nutrition service ready"
    );

    Ok(Service::new(
        classifier,
        recommended,
        config.nutrition.state_encoding,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        common::{LLMConfig, NutritionConfig},
        nutrition::value_objects::{NutrientKey, NutrientProfile, NutrientSet},
    };

    #[test]
    fn test_create_service_with_defaults_uses_fixture() {
        let service = create_service(MealTallyConfig::default()).unwrap();

        assert_eq!(service.profile(), NutrientProfile::WaterSugar);
        assert!(matches!(
            service.food_classifier,
            ClassifierBackend::Fixture(_)
        ));
    }

    #[test]
    fn test_create_service_applies_overrides() {
        let config = MealTallyConfig {
            nutrition: NutritionConfig {
                profile: NutrientProfile::FiberSodium,
                recommended_overrides: NutrientSet::new().with(NutrientKey::Sodium, 2000.0),
                ..Default::default()
            },
            ..Default::default()
        };

        let service = create_service(config).unwrap();

        assert_eq!(service.recommended().get(NutrientKey::Sodium), 2000.0);
    }

    #[test]
    fn test_create_service_rejects_zero_recommended_value() {
        let config = MealTallyConfig {
            nutrition: NutritionConfig {
                recommended_overrides: NutrientSet::new().with(NutrientKey::Sugar, 0.0),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(matches!(
            create_service(config),
            Err(CoreError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_create_service_requires_gemini_key() {
        let config = MealTallyConfig {
            llm: LLMConfig {
                classifier: ClassifierKind::Gemini,
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(matches!(
            create_service(config),
            Err(CoreError::InvalidConfiguration(_))
        ));
    }
}
