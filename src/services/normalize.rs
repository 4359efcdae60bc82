//! Read-side repair of loosely shaped question documents.
//!
//! Input tolerance:
//! - `text` that is missing or not a map becomes an empty text; non-string
//!   entries are dropped.
//! - `choices` that is missing or not a list becomes an empty list; entries
//!   that are not maps are dropped.
//! - a choice without a string `id` gets a synthesized one.
//! - `media` may be a list, a single legacy object, or missing.
//! - media entries without a known `type` and a non-empty `url` are dropped.

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::{
    document::RawQuestionDocument,
    domain::{localized_text_from_value, Choice, MediaItem, Question},
};

pub fn normalize_document(raw: &RawQuestionDocument) -> Question {
    let fields = raw.fields.as_object();

    let choices = match fields.and_then(|f| f.get("choices")) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item.as_object() {
                Some(choice) => Some(normalize_choice(&raw.id, choice)),
                None => {
                    log::warn!("Dropping malformed choice in question '{}'", raw.id);
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    };

    Question {
        id: raw.id.clone(),
        text: localized_text_from_value(fields.and_then(|f| f.get("text"))),
        choices,
    }
}

fn normalize_choice(question_id: &str, choice: &Map<String, Value>) -> Choice {
    let id = match choice.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => synthesize_choice_id(),
    };

    let media = MediaItem::list_from_value(choice.get("media"));

    let dropped = choice
        .get("media")
        .and_then(Value::as_array)
        .map(|items| items.len().saturating_sub(media.len()))
        .unwrap_or(0);
    if dropped > 0 {
        log::warn!(
            "Dropped {} malformed media item(s) from choice '{}' of question '{}'",
            dropped,
            id,
            question_id
        );
    }

    Choice {
        id,
        text: localized_text_from_value(choice.get("text")),
        media,
    }
}

/// Timestamp plus a random suffix, for choices stored without an id.
pub fn synthesize_choice_id() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("choice-{}-{}", Utc::now().timestamp_millis(), &random[..8])
}
