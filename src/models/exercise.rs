// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    MultipleChoice,
    Translation,
    Listening,
    FillInBlank,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    #[serde(rename = "exerciseType")]
    pub exercise_type: ExerciseType,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(rename = "topicId")]
    pub topic_id: Option<i64>,
}

impl Exercise {
    pub fn is_multiple_choice(&self) -> bool {
        self.exercise_type == ExerciseType::MultipleChoice
    }
}

/// Answer submitted for grading
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseAttempt {
    #[serde(rename = "exerciseId")]
    pub exercise_id: i64,
    pub answer: String,
}

/// Graded result returned by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseResult {
    pub correct: bool,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: Option<String>,
    pub score: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exercise() {
        let json = r#"{
            "id": 41,
            "exerciseType": "multiple_choice",
            "question": "Choose the correct article: ___ hus",
            "options": ["en", "ei", "et"],
            "topicId": 9
        }"#;

        let exercise: Exercise = serde_json::from_str(json).expect("Failed to parse exercise");
        assert!(exercise.is_multiple_choice());
        assert_eq!(exercise.options.len(), 3);
        assert_eq!(exercise.topic_id, Some(9));
    }

    #[test]
    fn test_parse_exercise_without_options() {
        let json = r#"{"id": 5, "exerciseType": "translation", "question": "Translate: god morgen", "topicId": null}"#;
        let exercise: Exercise = serde_json::from_str(json).expect("Failed to parse exercise");
        assert!(!exercise.is_multiple_choice());
        assert!(exercise.options.is_empty());
    }

    #[test]
    fn test_attempt_wire_format() {
        let attempt = ExerciseAttempt {
            exercise_id: 41,
            answer: "et".to_string(),
        };
        let json = serde_json::to_string(&attempt).expect("Failed to serialize attempt");
        assert!(json.contains("exerciseId"));
        assert!(json.contains("\"answer\":\"et\""));
    }

    #[test]
    fn test_parse_exercise_result() {
        let json = r#"{"correct": false, "correctAnswer": "et", "score": 0.0}"#;
        let result: ExerciseResult =
            serde_json::from_str(json).expect("Failed to parse exercise result");
        assert!(!result.correct);
        assert_eq!(result.correct_answer.as_deref(), Some("et"));
    }
}
