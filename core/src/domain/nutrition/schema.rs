use serde_json::json;

use crate::domain::nutrition::value_objects::NutrientProfile;

/// Returns the JSON schema a vision model must answer with for one image
pub fn get_classification_schema(profile: NutrientProfile) -> serde_json::Value {
    let nutrient_properties: serde_json::Map<String, serde_json::Value> = profile
        .keys()
        .map(|key| (key.as_str().to_string(), json!({ "type": "string" })))
        .collect();
    let nutrient_names: Vec<&str> = profile.keys().map(|key| key.as_str()).collect();

    json!({
        "type": "object",
        "properties": {
            "food_name": { "type": "string" },
            "confidence": { "type": "number" },
            "nutrients": {
                "type": "object",
                "properties": nutrient_properties,
                "required": nutrient_names
            }
        },
        "required": ["food_name", "confidence", "nutrients"]
    })
}

pub fn build_classification_prompt(profile: NutrientProfile) -> String {
    let nutrient_lines: Vec<String> = profile
        .keys()
        .map(|key| format!("- {} ({}, in {})", key.as_str(), key.label(), key.unit()))
        .collect();

    format!(
        "Identify the single main food in this image and estimate the nutrients of one serving.\n\
         Answer with food_name (Korean dish name), confidence (0 to 100) and these nutrients, \
         each as a number followed by its unit, for example \"180kcal\":\n{}",
        nutrient_lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_profile_nutrients() {
        let schema = get_classification_schema(NutrientProfile::FiberSodium);
        let nutrients = &schema["properties"]["nutrients"];

        assert!(nutrients["properties"]["fiber"].is_object());
        assert!(nutrients["properties"]["sodium"].is_object());
        assert!(nutrients["properties"]["water"].is_null());
        assert_eq!(nutrients["required"].as_array().map(Vec::len), Some(6));
    }

    #[test]
    fn test_prompt_names_every_nutrient_with_unit() {
        let prompt = build_classification_prompt(NutrientProfile::WaterSugar);

        assert!(prompt.contains("- water (수분, in ml)"));
        assert!(prompt.contains("- sugar (당류, in g)"));
    }
}
