//! Data models for the language-learning API.
//!
//! This module contains the data structures used to represent
//! API payloads:
//!
//! - `VocabularyItem`, `Phrase`: word and sentence material
//! - `GrammarTopic`: grammar reference content
//! - `Exercise`, `ExerciseAttempt`, `ExerciseResult`: practice and grading
//! - `UserProfile`, `AuthSession`: account and login payloads

pub mod exercise;
pub mod grammar;
pub mod phrase;
pub mod user;
pub mod vocabulary;

pub use exercise::{Exercise, ExerciseAttempt, ExerciseResult, ExerciseType};
pub use grammar::GrammarTopic;
pub use phrase::Phrase;
pub use user::{AuthSession, UserProfile};
pub use vocabulary::VocabularyItem;
