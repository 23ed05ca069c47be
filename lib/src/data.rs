use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A question in the shape the bulk creation endpoint accepts.
///
/// Built once per accepted row and submitted as-is.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QuestionRecord {
    pub question_type_id: String,
    pub category_id: String,
    pub question_text: String,
    pub concepts: Vec<String>,

    pub difficulty_level: u32,
    pub max_score: f64,
    pub time_limit: u32,

    pub options: Vec<QuestionOption>,
    pub correct_answers: Vec<String>,

    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub media: Vec<Value>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QuestionOption {
    pub text: String,
    pub is_correct: bool,
    /// 1-based position among the row's non-empty options. A blank option
    /// column leaves no gap in the numbering.
    pub order: u32,
}

impl QuestionOption {
    pub fn new(text: String, is_correct: bool, order: u32) -> Self {
        Self {
            text,
            is_correct,
            order,
        }
    }
}
