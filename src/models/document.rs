use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    errors::AppResult,
    models::domain::{Choice, LocalizedText, Question},
};

/// A stored question exactly as the backend returned it.
///
/// `fields` is untrusted: any key may be missing or carry the wrong shape.
#[derive(Clone, Debug, PartialEq)]
pub struct RawQuestionDocument {
    pub id: String,
    pub fields: Value,
}

impl RawQuestionDocument {
    pub fn new(id: impl Into<String>, fields: Value) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// The body written under a question's key. The id is the key, not a field.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionDocument {
    pub text: LocalizedText,
    pub choices: Vec<Choice>,
}

impl QuestionDocument {
    pub fn split(question: Question) -> (String, Self) {
        let Question { id, text, choices } = question;
        (id, QuestionDocument { text, choices })
    }

    pub fn into_question(self, id: &str) -> Question {
        Question {
            id: id.to_string(),
            text: self.text,
            choices: self.choices,
        }
    }

    pub fn to_value(&self) -> AppResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Serialized size in bytes, used for the pre-write size check.
    pub fn encoded_len(&self) -> AppResult<usize> {
        Ok(serde_json::to_vec(self)?.len())
    }
}
