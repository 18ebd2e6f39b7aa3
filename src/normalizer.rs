//! Turns raw model replies into JSON values.
//!
//! Text models frequently wrap JSON in markdown code fences, sometimes more than
//! once per reply. Every fence marker is removed before parsing.

use crate::detection::DetectionResult;
use crate::error::{PetlensError, Result};
use serde::Deserialize;
use serde_json::Value;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Strip code fences and parse the remainder as JSON.
pub fn normalize(raw: &str) -> Result<Value> {
    let text = if raw.contains(FENCE) {
        raw.replace(JSON_FENCE, "").replace(FENCE, "")
    } else {
        raw.to_string()
    };

    serde_json::from_str(text.trim()).map_err(|e| PetlensError::Normalization(e.to_string()))
}

/// Normalize a detection reply and check it has the full [`DetectionResult`] shape.
///
/// The parsed value is returned as-is so fields the model adds beyond the
/// documented schema still reach the client.
pub fn normalize_detection(raw: &str) -> Result<Value> {
    let value = normalize(raw)?;

    let result = DetectionResult::deserialize(&value)
        .map_err(|e| PetlensError::Normalization(format!("detection shape: {}", e)))?;
    result.check().map_err(PetlensError::Normalization)?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detection_json() -> Value {
        json!({
            "success": true,
            "animal": "cat",
            "breed": "Siamese",
            "confidence": 0.98,
            "breed_confidence": 0.96,
            "info": {
                "origin": "Thailand",
                "price_range": "$600 - $1,200",
                "description": "Vocal and social",
                "special_traits": "Blue almond eyes",
                "vaccinations": ["FVRCP", "Rabies"],
                "special_food": ["Wet food"],
                "care_tips": ["Interactive play"]
            }
        })
    }

    #[test]
    fn test_normalize_fenced_json() {
        let value = normalize("```json\n{\"a\":1}\n```").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_normalize_plain_json() {
        let value = normalize("  {\"a\": [1, 2]}  ").unwrap();
        assert_eq!(value, json!({"a": [1, 2]}));
    }

    #[test]
    fn test_normalize_bare_fence() {
        let value = normalize("```\n{\"a\":1}\n```").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_normalize_strips_repeated_fences() {
        let raw = "```json\n```json\n{\"a\":1}\n```\n```";
        assert_eq!(normalize(raw).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_normalize_not_json() {
        let result = normalize("not json");
        assert!(matches!(result, Err(PetlensError::Normalization(_))));
    }

    #[test]
    fn test_normalize_prose_around_json_fails() {
        let result = normalize("Here you go:\n```json\n{\"a\":1}\n```");
        assert!(matches!(result, Err(PetlensError::Normalization(_))));
    }

    #[test]
    fn test_normalize_detection_returns_value_verbatim() {
        let mut expected = detection_json();
        expected["extra"] = json!("kept");
        let raw = format!("```json\n{}\n```", expected);

        let value = normalize_detection(&raw).unwrap();

        assert_eq!(value, expected);
    }

    #[test]
    fn test_normalize_detection_missing_field() {
        let mut value = detection_json();
        value["info"].as_object_mut().unwrap().remove("care_tips");

        let result = normalize_detection(&value.to_string());

        assert!(matches!(result, Err(PetlensError::Normalization(_))));
    }

    #[test]
    fn test_normalize_detection_wrong_type() {
        let mut value = detection_json();
        value["confidence"] = json!("high");

        let result = normalize_detection(&value.to_string());

        assert!(matches!(result, Err(PetlensError::Normalization(_))));
    }

    #[test]
    fn test_normalize_detection_confidence_out_of_range() {
        let mut value = detection_json();
        value["breed_confidence"] = json!(96);

        let result = normalize_detection(&value.to_string());

        assert!(matches!(result, Err(PetlensError::Normalization(_))));
    }
}
