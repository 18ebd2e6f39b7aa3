/// Instruction sent alongside an uploaded photo.
pub const DETECTION_PROMPT: &str = r#"Analyze this image. Return ONLY a JSON object with this structure:
{
    "success": true,
    "animal": "Animal Name",
    "breed": "Breed Name",
    "confidence": 0.98,
    "breed_confidence": 0.96,
    "info": {
        "origin": "Origin",
        "price_range": "Price",
        "description": "Description",
        "special_traits": "Traits",
        "vaccinations": ["Vaccine1", "Vaccine2"],
        "special_food": ["Food1", "Food2"],
        "care_tips": ["Tip1", "Tip2"]
    }
}
Confidence values are between 0 and 1."#;

/// Build the single-turn chat prompt, optionally grounded in the last detection.
pub fn chat_prompt(message: &str, detected_breed: Option<&str>) -> String {
    let context = match detected_breed.map(str::trim).filter(|b| !b.is_empty()) {
        Some(breed) => format!("The user is currently looking at a photo of a {}. ", breed),
        None => String::new(),
    };

    format!(
        "You are PetCare AI, a veterinary care assistant. {}\
         Answer the user's question about pet care. Keep it short. \
         For anything that sounds like an emergency, recommend seeing a veterinarian.\n\
         User: {}",
        context, message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_prompt_without_breed() {
        let prompt = chat_prompt("How often should I feed him?", None);

        assert!(prompt.starts_with("You are PetCare AI"));
        assert!(!prompt.contains("looking at a photo"));
        assert!(prompt.ends_with("\nUser: How often should I feed him?"));
    }

    #[test]
    fn test_chat_prompt_with_breed() {
        let prompt = chat_prompt("Is it friendly?", Some("Beagle (dog)"));
        assert!(prompt.contains("looking at a photo of a Beagle (dog). "));
    }

    #[test]
    fn test_chat_prompt_blank_breed_is_ignored() {
        let prompt = chat_prompt("Hi", Some("   "));
        assert!(!prompt.contains("looking at a photo"));
    }

    #[test]
    fn test_detection_prompt_names_every_field() {
        for field in [
            "breed_confidence",
            "price_range",
            "special_traits",
            "vaccinations",
            "special_food",
            "care_tips",
        ] {
            assert!(DETECTION_PROMPT.contains(field), "missing {}", field);
        }
    }
}
