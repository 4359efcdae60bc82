//! In-memory editing of a question before it is handed to `save_question`.

use std::path::Path;

use base64::Engine;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    constants::languages::empty_localized_text,
    errors::{AppError, AppResult},
    models::domain::{Choice, MediaItem, MediaType, Question},
};

/// A working copy of a question. Nothing here touches the store.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionDraft {
    question: Question,
    is_new: bool,
}

fn new_choice() -> Choice {
    let random = Uuid::new_v4().simple().to_string();
    Choice {
        id: format!("newChoice-{}-{}", Utc::now().timestamp_millis(), &random[..8]),
        text: empty_localized_text(),
        media: Vec::new(),
    }
}

impl QuestionDraft {
    /// A fresh question with a timestamp id and two empty choices.
    pub fn new_question() -> Self {
        Self {
            question: Question {
                id: format!("newQuestion-{}", Utc::now().timestamp_millis()),
                text: empty_localized_text(),
                choices: vec![new_choice(), new_choice()],
            },
            is_new: true,
        }
    }

    pub fn from_question(question: &Question) -> Self {
        Self {
            question: question.clone(),
            is_new: false,
        }
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn into_question(self) -> Question {
        self.question
    }

    pub fn set_text(&mut self, lang: &str, value: &str) {
        self.question.text.insert(lang.to_string(), value.to_string());
    }

    pub fn add_choice(&mut self) -> &Choice {
        self.question.choices.push(new_choice());
        &self.question.choices[self.question.choices.len() - 1]
    }

    /// Removes the choice at `index`; the last remaining choice cannot be removed.
    pub fn remove_choice(&mut self, index: usize) -> AppResult<Choice> {
        if self.question.choices.len() <= 1 {
            return Err(AppError::ValidationError(
                "A question must have at least one choice".to_string(),
            ));
        }
        self.choice_mut(index)?;
        Ok(self.question.choices.remove(index))
    }

    pub fn set_choice_text(&mut self, index: usize, lang: &str, value: &str) -> AppResult<()> {
        self.choice_mut(index)?
            .text
            .insert(lang.to_string(), value.to_string());
        Ok(())
    }

    /// Puts `item` on the choice, replacing an existing item of the same type.
    pub fn set_media(&mut self, index: usize, item: MediaItem) -> AppResult<()> {
        let choice = self.choice_mut(index)?;
        match choice.media.iter_mut().find(|m| m.media_type == item.media_type) {
            Some(existing) => *existing = item,
            None => choice.media.push(item),
        }
        Ok(())
    }

    pub fn set_media_alt_text(
        &mut self,
        index: usize,
        media_type: MediaType,
        lang: &str,
        value: &str,
    ) -> AppResult<()> {
        let choice = self.choice_mut(index)?;
        let item = choice
            .media
            .iter_mut()
            .find(|m| m.media_type == media_type)
            .ok_or_else(|| {
                AppError::ValidationError(format!("Choice has no {} to describe", media_type.as_str()))
            })?;

        item.alt_text
            .get_or_insert_with(empty_localized_text)
            .insert(lang.to_string(), value.to_string());
        Ok(())
    }

    pub fn remove_media(&mut self, index: usize, media_type: MediaType) -> AppResult<()> {
        self.choice_mut(index)?
            .media
            .retain(|m| m.media_type != media_type);
        Ok(())
    }

    /// Reads the file at `path` and stores it inline as a data URI.
    ///
    /// The draft is only modified once the whole file has been read.
    pub async fn attach_file(
        &mut self,
        index: usize,
        media_type: MediaType,
        path: impl AsRef<Path>,
    ) -> AppResult<()> {
        self.choice_mut(index)?;

        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            log::warn!("Could not read media file {}: {}", path.display(), e);
            AppError::ValidationError(format!("Could not read file '{}': {}", path.display(), e))
        })?;

        let url = encode_data_uri(mime_for_path(path, media_type), &bytes);
        let choice = self.choice_mut(index)?;
        match choice.media.iter_mut().find(|m| m.media_type == media_type) {
            Some(existing) => existing.url = url,
            None => choice.media.push(MediaItem::new(media_type, &url)),
        }
        Ok(())
    }

    fn choice_mut(&mut self, index: usize) -> AppResult<&mut Choice> {
        let count = self.question.choices.len();
        self.question.choices.get_mut(index).ok_or_else(|| {
            AppError::ValidationError(format!(
                "Choice index {} is out of range for a question with {} choices",
                index, count
            ))
        })
    }
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// MIME type from the file extension, or a generic one for the media type.
pub fn mime_for_path(path: &Path, media_type: MediaType) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "m4a" => "audio/mp4",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => match media_type {
            MediaType::Image => "image/octet-stream",
            MediaType::Audio => "audio/octet-stream",
            MediaType::Video => "video/octet-stream",
        },
    }
}
