// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: i64,
    pub word: String,
    pub translation: String,
    pub transcription: Option<String>,
    pub category: Option<String>,
    pub example: Option<String>,
    #[serde(rename = "audioUrl")]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub learned: bool,
}

impl VocabularyItem {
    /// Word with its transcription when available, e.g. `hund [hʊn]`
    pub fn display_word(&self) -> String {
        match self.transcription {
            Some(ref transcription) => format!("{} [{}]", self.word, transcription),
            None => self.word.clone(),
        }
    }
}
