use serde::{Deserialize, Serialize};

/// Care information about a detected breed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalInfo {
    pub origin: String,
    pub price_range: String,
    pub description: String,
    pub special_traits: String,
    pub vaccinations: Vec<String>,
    pub special_food: Vec<String>,
    pub care_tips: Vec<String>,
}

/// Detection payload returned to the browser
///
/// Field names match the JSON the model is asked to produce, which is also what
/// the front end reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub success: bool,
    pub animal: String,
    pub breed: String,
    pub confidence: f64,
    pub breed_confidence: f64,
    pub info: AnimalInfo,
}

impl DetectionResult {
    /// Check the invariants serde cannot express.
    pub fn check(&self) -> Result<(), String> {
        if !self.success {
            return Err("model reported success=false".to_string());
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!("confidence {} outside [0, 1]", self.confidence));
        }
        if !(0.0..=1.0).contains(&self.breed_confidence) {
            return Err(format!("breed_confidence {} outside [0, 1]", self.breed_confidence));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DetectionResult {
        DetectionResult {
            success: true,
            animal: "dog".to_string(),
            breed: "Beagle".to_string(),
            confidence: 0.97,
            breed_confidence: 0.91,
            info: AnimalInfo {
                origin: "England".to_string(),
                price_range: "$500 - $1,500".to_string(),
                description: "Small scent hound".to_string(),
                special_traits: "Excellent nose".to_string(),
                vaccinations: vec!["Rabies".to_string(), "DHPP".to_string()],
                special_food: vec!["High-protein kibble".to_string()],
                care_tips: vec!["Daily walks".to_string()],
            },
        }
    }

    #[test]
    fn test_check_accepts_valid_result() {
        assert!(sample().check().is_ok());
    }

    #[test]
    fn test_check_rejects_unsuccessful_result() {
        let mut result = sample();
        result.success = false;
        assert!(result.check().is_err());
    }

    #[test]
    fn test_check_rejects_out_of_range_confidence() {
        let mut result = sample();
        result.confidence = 97.0;
        assert!(result.check().unwrap_err().contains("confidence"));

        let mut result = sample();
        result.breed_confidence = -0.1;
        assert!(result.check().unwrap_err().contains("breed_confidence"));
    }

    #[test]
    fn test_serializes_with_wire_field_names() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["breed_confidence"], 0.91);
        assert_eq!(json["info"]["price_range"], "$500 - $1,500");
        assert_eq!(json["info"]["care_tips"][0], "Daily walks");
    }
}
