use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{media::deserialize_media_list, LocalizedText, MediaItem, MediaType};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject, Validate)]
pub struct Question {
    #[validate(length(min = 1, message = "A question id is required"))]
    pub id: String,
    #[serde(default)]
    pub text: LocalizedText,
    #[validate(length(min = 1, message = "A question must have at least one choice"))]
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Choice {
    pub id: String,
    #[serde(default)]
    pub text: LocalizedText,
    #[serde(default, deserialize_with = "deserialize_media_list")]
    pub media: Vec<MediaItem>,
}

impl Choice {
    /// First attached item of the given type.
    pub fn media_of_type(&self, media_type: MediaType) -> Option<&MediaItem> {
        self.media.iter().find(|m| m.media_type == media_type)
    }
}

impl Question {
    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }
}
