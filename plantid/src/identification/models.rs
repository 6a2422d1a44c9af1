//! Wire types for the plant.id v2 `identify` endpoint.
//!
//! Only the fields rendered by [`crate::format`] are modelled; everything else in the upstream
//! response is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// Body of the identification POST
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IdentifyRequest {
    /// Base64-encoded images (standard alphabet, padded)
    pub images: Vec<String>,
    /// Which part of the plant is pictured, e.g. "leaf"
    pub organs: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct IdentificationResult {
    pub suggestions: Vec<Suggestion>,
}

/// One candidate identification
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Suggestion {
    pub plant_name: String,
    /// Confidence in `[0, 1]`
    pub probability: f64,
    #[serde(default)]
    pub plant_details: PlantDetails,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PlantDetails {
    #[serde(default)]
    pub wiki_description: Option<WikiDescription>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WikiDescription {
    pub value: String,
}

impl Suggestion {
    pub fn description(&self) -> Option<&str> {
        self.plant_details.wiki_description.as_ref().map(|d| d.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_upstream_response_ignoring_extra_fields() {
        let body = json!({
            "id": 12345,
            "is_plant": true,
            "suggestions": [
                {
                    "id": 1,
                    "plant_name": "Monstera deliciosa",
                    "probability": 0.9731,
                    "confirmed": false,
                    "plant_details": {
                        "common_names": ["Swiss cheese plant"],
                        "wiki_description": {
                            "value": "A species of flowering plant.",
                            "citation": "https://en.wikipedia.org/wiki/Monstera_deliciosa"
                        }
                    }
                },
                {
                    "plant_name": "Philodendron",
                    "probability": 0.02,
                    "plant_details": {}
                },
                {
                    "plant_name": "Epipremnum aureum",
                    "probability": 0.001
                }
            ]
        });

        let result: IdentificationResult = serde_json::from_value(body).unwrap();

        assert_eq!(result.suggestions.len(), 3);
        assert_eq!(result.suggestions[0].plant_name, "Monstera deliciosa");
        assert_eq!(result.suggestions[0].description(), Some("A species of flowering plant."));
        assert_eq!(result.suggestions[1].description(), None);
        assert_eq!(result.suggestions[2].description(), None);
    }

    #[test]
    fn test_missing_required_fields_fail() {
        assert!(serde_json::from_value::<IdentificationResult>(json!({ "is_plant": true })).is_err());
        assert!(
            serde_json::from_value::<IdentificationResult>(json!({ "suggestions": [{ "probability": 0.5 }] })).is_err()
        );
    }

    #[test]
    fn test_request_shape() {
        let request = IdentifyRequest {
            images: vec!["aGVsbG8=".to_string()],
            organs: vec!["leaf".to_string()],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "images": ["aGVsbG8="], "organs": ["leaf"] })
        );
    }
}
