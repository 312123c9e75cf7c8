// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phrase {
    pub id: i64,
    pub text: String,
    pub translation: String,
    pub category: Option<String>,
    #[serde(rename = "audioUrl")]
    pub audio_url: Option<String>,
}

impl Phrase {
    pub fn category_display(&self) -> &str {
        self.category.as_deref().unwrap_or("General")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_phrase() {
        let json = r#"{"id": 3, "text": "Hvor er toget?", "translation": "Where is the train?", "category": "travel", "audioUrl": null}"#;
        let phrase: Phrase = serde_json::from_str(json).expect("Failed to parse phrase");
        assert_eq!(phrase.text, "Hvor er toget?");
        assert_eq!(phrase.category_display(), "travel");
    }

    #[test]
    fn test_category_display_default() {
        let phrase = Phrase {
            id: 1,
            text: "Hei".to_string(),
            translation: "Hi".to_string(),
            category: None,
            audio_url: None,
        };
        assert_eq!(phrase.category_display(), "General");
    }
}
