use std::collections::BTreeMap;

use serde_json::Value;

pub mod media;
pub mod question;
pub use media::{MediaItem, MediaType};
pub use question::{Choice, Question};

/// Language code ("en", "tr", ...) to display string. Missing keys mean no text.
pub type LocalizedText = BTreeMap<String, String>;

/// Reads a language map from loosely shaped JSON, keeping only string entries.
pub fn localized_text_from_value(value: Option<&Value>) -> LocalizedText {
    match value {
        Some(Value::Object(entries)) => entries
            .iter()
            .filter_map(|(lang, text)| text.as_str().map(|t| (lang.clone(), t.to_string())))
            .collect(),
        _ => LocalizedText::new(),
    }
}
