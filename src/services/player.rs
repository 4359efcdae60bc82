use crate::{
    constants::languages::{localize, DEFAULT_LANGUAGE},
    models::domain::{Choice, LocalizedText, MediaItem, MediaType, Question},
};

/// Walks through an ordered list of questions, one selection at a time.
#[derive(Clone, Debug)]
pub struct QuizSession {
    questions: Vec<Question>,
    index: usize,
    selected_choice: Option<String>,
    language: String,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            index: 0,
            selected_choice: None,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_language(mut self, lang: &str) -> Self {
        self.language = lang.to_string();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, lang: &str) {
        self.language = lang.to_string();
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    pub fn selected_choice(&self) -> Option<&Choice> {
        let id = self.selected_choice.as_deref()?;
        self.current()?.choice(id)
    }

    /// Moves forward; returns false when already on the last question.
    pub fn next(&mut self) -> bool {
        if self.index + 1 >= self.questions.len() {
            return false;
        }
        self.index += 1;
        self.selected_choice = None;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.selected_choice = None;
        true
    }

    pub fn restart(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        self.index = 0;
        self.selected_choice = None;
    }

    /// Selects a choice of the current question. Unknown ids are ignored.
    pub fn select_choice(&mut self, choice_id: &str) -> bool {
        let known = self
            .current()
            .map(|q| q.choice(choice_id).is_some())
            .unwrap_or(false);
        if known {
            self.selected_choice = Some(choice_id.to_string());
        }
        known
    }

    pub fn text<'a>(&self, text: &'a LocalizedText) -> &'a str {
        localize(text, &self.language).unwrap_or_default()
    }
}

/// The single item a choice shows: an image first, then audio, then video.
pub fn media_to_display(choice: &Choice) -> Option<&MediaItem> {
    MediaType::ALL
        .iter()
        .find_map(|media_type| choice.media_of_type(*media_type))
        .or_else(|| choice.media.first())
}

pub fn accessible_name(media: &MediaItem, lang: &str) -> String {
    media
        .alt_text
        .as_ref()
        .and_then(|alt| localize(alt, lang))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Media content for {}", media.media_type.as_str()))
}
