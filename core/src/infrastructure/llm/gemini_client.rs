use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::{
    common::entities::app_errors::CoreError,
    nutrition::{
        entities::ClassifiedFood,
        ports::FoodClassifier,
        schema::{build_classification_prompt, get_classification_schema},
        value_objects::NutrientProfile,
    },
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiFoodClassifier {
    api_key: String,
    model_name: String,
    profile: NutrientProfile,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ContentResponse,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: String,
}

impl GeminiFoodClassifier {
    pub fn new(api_key: String, model_name: String, profile: NutrientProfile) -> Self {
        Self {
            api_key,
            model_name,
            profile,
            client: Client::new(),
        }
    }

    fn build_request(&self, image_data: &[u8]) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: build_classification_prompt(self.profile),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: sniff_image_mime_type(image_data).to_string(),
                            data: general_purpose::STANDARD.encode(image_data),
                        },
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: get_classification_schema(self.profile),
            }),
        }
    }

    async fn call_gemini_api(&self, request: GeminiRequest) -> Result<String, CoreError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model_name, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                // the request URL carries the API key
                let e = e.without_url();
                tracing::error!("Gemini API request failed: {}", e);
                CoreError::ExternalServiceError(format!("LLM API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error: {} - {}", status, error_text);
            return Err(CoreError::ExternalServiceError(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            CoreError::ExternalServiceError(format!("Failed to parse LLM response: {}", e))
        })?;

        gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| CoreError::ExternalServiceError("No response from LLM".to_string()))
    }
}

impl FoodClassifier for GeminiFoodClassifier {
    #[instrument(
        skip(self, image_data),
        fields(model = %self.model_name, image_bytes = image_data.len())
    )]
    async fn classify(&self, image_data: Vec<u8>) -> Result<ClassifiedFood, CoreError> {
        let request = self.build_request(&image_data);
        let raw_response = self.call_gemini_api(request).await?;

        parse_classification(&raw_response)
    }
}

pub fn parse_classification(raw_response: &str) -> Result<ClassifiedFood, CoreError> {
    serde_json::from_str(raw_response.trim()).map_err(|e| {
        tracing::error!("Invalid classification format: {}", e);
        CoreError::ExternalServiceError(format!("Invalid classification format: {}", e))
    })
}

/// Picks the MIME type from the file signature, defaulting to JPEG.
fn sniff_image_mime_type(image_data: &[u8]) -> &'static str {
    match image_data {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::nutrition::value_objects::NutrientValue;

    #[test]
    fn test_sniff_image_mime_type() {
        assert_eq!(sniff_image_mime_type(&[0x89, b'P', b'N', b'G', 0x0D]), "image/png");
        assert_eq!(sniff_image_mime_type(b"GIF89a"), "image/gif");
        assert_eq!(sniff_image_mime_type(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(sniff_image_mime_type(&[0xFF, 0xD8, 0xFF]), "image/jpeg");
        assert_eq!(sniff_image_mime_type(&[]), "image/jpeg");
    }

    #[test]
    fn test_parse_classification_reads_model_answer() {
        let food = parse_classification(
            r#"{"food_name": "김치찌개", "confidence": 87.5,
                "nutrients": {"calories": "250kcal", "sodium": "1200mg", "protein": 14}}"#,
        )
        .unwrap();

        assert_eq!(food.food_name, "김치찌개");
        assert_eq!(food.confidence, 87.5);
        assert_eq!(food.nutrients["sodium"], NutrientValue::from("1200mg"));
        assert_eq!(food.nutrients["protein"], NutrientValue::from(14));
    }

    #[test]
    fn test_parse_classification_rejects_non_json() {
        let result = parse_classification("I think this is a sandwich.");

        assert!(matches!(result, Err(CoreError::ExternalServiceError(_))));
    }

    #[test]
    fn test_request_carries_prompt_image_and_schema() {
        let classifier = GeminiFoodClassifier::new(
            "key".to_string(),
            "gemini-2.0-flash".to_string(),
            NutrientProfile::FiberSodium,
        );

        let request = serde_json::to_value(classifier.build_request(&[0xFF, 0xD8])).unwrap();
        let parts = &request["contents"][0]["parts"];

        assert!(parts[0]["text"].as_str().unwrap().contains("sodium"));
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(parts[1]["inline_data"]["data"], "/9g=");
        assert!(
            request["generation_config"]["response_schema"]["properties"]["nutrients"]
                ["properties"]["fiber"]
                .is_object()
        );
    }
}
