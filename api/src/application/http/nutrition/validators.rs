use axum::extract::Multipart;
use mealtally_core::domain::nutrition::{
    entities::{Observation, SessionState},
    value_objects::{NutrientProfile, NutrientSet},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::application::http::server::api_entities::api_error::ApiError;

pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB
/// Whole multipart body: the image plus the markup or state sent back by the client.
pub const MAX_SUBMISSION_SIZE: usize = MAX_IMAGE_SIZE + 2 * 1024 * 1024;

/// Documents the multipart body of the markup submission.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitMarkupForm {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
    /// `next_state_markup` from the previous response
    pub prior_markup: Option<String>,
}

/// Documents the multipart body of the typed session submission.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitSessionForm {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
    /// JSON encoded `state` from the previous response
    pub state: Option<String>,
}

#[derive(Debug, Default)]
pub struct SubmissionForm {
    pub image_data: Option<Vec<u8>>,
    pub prior_markup: Option<String>,
    pub state: Option<String>,
}

impl SubmissionForm {
    pub async fn read(multipart: &mut Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "image" => {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;

                    if data.len() > MAX_IMAGE_SIZE {
                        return Err(ApiError::BadRequest(format!(
                            "Image too large. Max size is {} bytes",
                            MAX_IMAGE_SIZE
                        )));
                    }

                    form.image_data = Some(data.to_vec());
                }
                "prior_markup" => {
                    form.prior_markup = Some(field.text().await.map_err(|e| {
                        ApiError::BadRequest(format!("Failed to read prior_markup: {}", e))
                    })?);
                }
                "state" => {
                    form.state = Some(field.text().await.map_err(|e| {
                        ApiError::BadRequest(format!("Failed to read state: {}", e))
                    })?);
                }
                _ => {}
            }
        }

        Ok(form)
    }

    pub fn take_image(&mut self) -> Result<Vec<u8>, ApiError> {
        match self.image_data.take() {
            Some(data) if !data.is_empty() => Ok(data),
            Some(_) => Err(ApiError::BadRequest("Image field is empty".to_string())),
            None => Err(ApiError::BadRequest("Missing image field".to_string())),
        }
    }

    /// Blank state means a new session.
    pub fn take_session_state(&mut self) -> Result<Option<SessionState>, ApiError> {
        match self.state.take() {
            Some(raw) if !raw.trim().is_empty() => parse_session_state(&raw).map(Some),
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SessionStateValidator {
    pub profile: NutrientProfile,
    #[validate(length(max = 500, message = "a session holds at most 500 observations"))]
    pub observations: Vec<Observation>,
    #[validate(custom(function = "validate_totals"))]
    pub totals: NutrientSet,
}

fn validate_totals(totals: &NutrientSet) -> Result<(), ValidationError> {
    if totals
        .iter()
        .all(|(_, value)| value.is_finite() && value >= 0.0)
    {
        Ok(())
    } else {
        Err(ValidationError::new("totals_out_of_range")
            .with_message("totals must be finite and not negative".into()))
    }
}

impl From<SessionStateValidator> for SessionState {
    fn from(payload: SessionStateValidator) -> Self {
        Self {
            profile: payload.profile,
            observations: payload.observations,
            totals: payload.totals,
        }
    }
}

pub fn parse_session_state(raw: &str) -> Result<SessionState, ApiError> {
    let payload: SessionStateValidator = serde_json::from_str(raw)
        .map_err(|e| ApiError::BadRequest(format!("Invalid session state: {}", e)))?;
    payload.validate()?;

    Ok(payload.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealtally_core::domain::nutrition::value_objects::NutrientKey;

    #[test]
    fn test_parse_session_state_accepts_new_session() {
        let raw = serde_json::to_string(&SessionState::new(NutrientProfile::WaterSugar)).unwrap();

        let state = parse_session_state(&raw).unwrap();

        assert_eq!(state.profile, NutrientProfile::WaterSugar);
        assert_eq!(state.totals.get(NutrientKey::Calories), 0.0);
    }

    #[test]
    fn test_parse_session_state_rejects_negative_totals() {
        let raw = r#"{"profile": "water-sugar", "observations": [], "totals": {"calories": -5}}"#;

        let result = parse_session_state(raw);

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_parse_session_state_rejects_unknown_nutrient() {
        let raw = r#"{"profile": "water-sugar", "observations": [], "totals": {"vitamin_c": 5}}"#;

        assert!(matches!(
            parse_session_state(raw),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_blank_state_field_starts_new_session() {
        let mut form = SubmissionForm {
            state: Some("   ".to_string()),
            ..Default::default()
        };

        assert!(form.take_session_state().unwrap().is_none());
    }

    #[test]
    fn test_take_image_requires_bytes() {
        let mut missing = SubmissionForm::default();
        assert!(missing.take_image().is_err());

        let mut empty = SubmissionForm {
            image_data: Some(Vec::new()),
            ..Default::default()
        };
        assert!(empty.take_image().is_err());
    }
}
