// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarTopic {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub level: Option<String>,
}

impl GrammarTopic {
    pub fn level_display(&self) -> &str {
        self.level.as_deref().unwrap_or("All levels")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grammar_topic() {
        let json = r#"{"id": 9, "title": "Definite articles", "description": "en/ei/et endings", "content": null, "level": "A1"}"#;
        let topic: GrammarTopic =
            serde_json::from_str(json).expect("Failed to parse grammar topic");
        assert_eq!(topic.title, "Definite articles");
        assert_eq!(topic.level_display(), "A1");
    }
}
