use async_graphql::{Enum, SimpleObject};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::domain::{localized_text_from_value, LocalizedText};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Audio,
    Video,
}

impl MediaType {
    pub const ALL: [MediaType; 3] = [MediaType::Image, MediaType::Audio, MediaType::Video];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Audio => "audio",
            MediaType::Video => "video",
        }
    }

    /// Accepts only the exact lowercase tags stored in documents.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(MediaType::Image),
            "audio" => Some(MediaType::Audio),
            "video" => Some(MediaType::Video),
            _ => None,
        }
    }
}

/// One image, audio clip or video attached to a choice.
///
/// `url` is either an http(s) reference or an embedded `data:` URI.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    #[serde(rename = "type")]
    #[graphql(name = "type")]
    pub media_type: MediaType,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_ai_hint: Option<String>,
}

impl MediaItem {
    pub fn new(media_type: MediaType, url: &str) -> Self {
        MediaItem {
            media_type,
            url: url.to_string(),
            alt_text: None,
            data_ai_hint: None,
        }
    }

    pub fn is_embedded(&self) -> bool {
        self.url.starts_with("data:")
    }

    /// Lenient read of one item. `None` unless it has a known `type` and a non-empty `url`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let item = value.as_object()?;
        let media_type = item.get("type").and_then(Value::as_str).and_then(MediaType::parse)?;
        let url = item.get("url").and_then(Value::as_str).filter(|u| !u.is_empty())?;

        let alt_text = Some(localized_text_from_value(item.get("altText"))).filter(|t| !t.is_empty());
        let data_ai_hint = item
            .get("dataAiHint")
            .and_then(Value::as_str)
            .filter(|h| !h.is_empty())
            .map(str::to_string);

        Some(MediaItem {
            media_type,
            url: url.to_string(),
            alt_text,
            data_ai_hint,
        })
    }

    /// Lenient read of a choice's `media` field: a list, a single legacy object,
    /// or anything else (empty). Unusable entries are skipped.
    pub fn list_from_value(value: Option<&Value>) -> Vec<Self> {
        match value {
            Some(Value::Array(items)) => items.iter().filter_map(Self::from_value).collect(),
            Some(legacy @ Value::Object(_)) => Self::from_value(legacy).into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// `deserialize_with` for `media` fields accepting the same shapes as stored documents.
pub fn deserialize_media_list<'de, D>(deserializer: D) -> Result<Vec<MediaItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(MediaItem::list_from_value(value.as_ref()))
}
