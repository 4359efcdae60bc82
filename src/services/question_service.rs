use std::sync::Arc;

use validator::Validate;

use crate::{
    constants::default_questions::default_questions,
    errors::{AppError, AppResult},
    models::{document::QuestionDocument, domain::Question},
    repositories::QuestionRepository,
    services::{normalize::normalize_document, ordering::sort_questions, sanitize::sanitize_question},
};

/// Rejects ids a document store cannot address as a single document.
fn check_id(id: &str, action: &str) -> AppResult<()> {
    if id.trim().is_empty() {
        return Err(AppError::ValidationError(format!(
            "A question id is required to {}",
            action
        )));
    }
    if id.contains('/') || id == "." || id == ".." {
        return Err(AppError::ValidationError(format!(
            "Question id '{}' cannot contain '/' or be '.' or '..'",
            id
        )));
    }
    Ok(())
}

/// The question store: list, save and delete over a document backend.
pub struct QuestionService {
    repository: Arc<dyn QuestionRepository>,
    default_questions: Vec<Question>,
    max_document_bytes: usize,
}

impl QuestionService {
    pub fn new(repository: Arc<dyn QuestionRepository>, max_document_bytes: usize) -> Self {
        Self {
            repository,
            default_questions: default_questions(),
            max_document_bytes,
        }
    }

    /// Replaces the built-in set written into an empty collection.
    pub fn with_default_questions(mut self, questions: Vec<Question>) -> Self {
        self.default_questions = questions;
        self
    }

    /// All questions, normalized and in numeric-aware id order.
    ///
    /// An empty collection is seeded with the default set, which is then
    /// returned as-is without a second read.
    pub async fn list_questions(&self) -> AppResult<Vec<Question>> {
        let raw = self.repository.find_all().await?;
        let mut questions: Vec<Question> = raw.iter().map(normalize_document).collect();

        if questions.is_empty() && !self.default_questions.is_empty() {
            return self.seed().await;
        }

        sort_questions(&mut questions);
        Ok(questions)
    }

    async fn seed(&self) -> AppResult<Vec<Question>> {
        log::info!(
            "No questions found, writing {} default questions",
            self.default_questions.len()
        );

        let documents = self
            .default_questions
            .iter()
            .map(|question| QuestionDocument::split(sanitize_question(question)))
            .collect();

        if let Err(err) = self.repository.insert_batch(documents).await {
            log::error!("Default questions could not be written: {}", err);
            return Err(AppError::SeedWriteError(format!(
                "the question collection is empty and the default questions could not be written: {}. \
                 Check the database security rules and server logs.",
                err
            )));
        }

        log::info!("Default questions written");
        Ok(self.default_questions.clone())
    }

    /// Validates, sanitizes and writes `question` as a whole-record upsert.
    ///
    /// Returns the value as it was stored.
    pub async fn save_question(&self, question: &Question) -> AppResult<Question> {
        check_id(&question.id, "save")?;
        question.validate()?;

        let sanitized = sanitize_question(question);
        let (id, document) = QuestionDocument::split(sanitized);

        let size = document.encoded_len()?;
        if size > self.max_document_bytes {
            return Err(AppError::SizeLimitError(format!(
                "question '{}' is {} bytes, over the {} byte limit of a stored record. \
                 Inline media (embedded data URIs) is the usual cause; use smaller or fewer embedded files.",
                id, size, self.max_document_bytes
            )));
        }

        self.repository.replace(&id, document.clone()).await?;
        Ok(document.into_question(&id))
    }

    /// Removes the question stored under `id`. Remote media it referenced is left alone.
    pub async fn delete_question(&self, id: &str) -> AppResult<()> {
        check_id(id, "delete")?;
        self.repository.delete(id).await
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.repository.health_check().await
    }
}
