use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use yanitmatik_server::{
    config::FIRESTORE_MAX_DOCUMENT_BYTES,
    constants::default_questions::default_questions,
    errors::{AppError, AppResult},
    models::{
        document::{QuestionDocument, RawQuestionDocument},
        domain::{Choice, LocalizedText, MediaItem, MediaType, Question},
    },
    repositories::QuestionRepository,
    services::{editor::QuestionDraft, QuestionService},
};

#[derive(Default)]
struct InMemoryQuestionRepository {
    documents: RwLock<HashMap<String, Value>>,
    replace_calls: AtomicUsize,
    batch_calls: AtomicUsize,
}

impl InMemoryQuestionRepository {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    async fn put_raw(&self, id: &str, fields: Value) {
        self.documents.write().await.insert(id.to_string(), fields);
    }

    async fn get_raw(&self, id: &str) -> Option<Value> {
        self.documents.read().await.get(id).cloned()
    }

    async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    fn writes(&self) -> usize {
        self.replace_calls.load(Ordering::SeqCst) + self.batch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn find_all(&self) -> AppResult<Vec<RawQuestionDocument>> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .map(|(id, fields)| RawQuestionDocument::new(id.clone(), fields.clone()))
            .collect())
    }

    async fn replace(&self, id: &str, document: QuestionDocument) -> AppResult<()> {
        self.replace_calls.fetch_add(1, Ordering::SeqCst);
        let fields = document.to_value()?;
        self.documents.write().await.insert(id.to_string(), fields);
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.documents.write().await.remove(id);
        Ok(())
    }

    async fn insert_batch(&self, documents: Vec<(String, QuestionDocument)>) -> AppResult<()> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        let mut encoded = Vec::with_capacity(documents.len());
        for (id, document) in documents {
            encoded.push((id, document.to_value()?));
        }
        self.documents.write().await.extend(encoded);
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

fn service(repository: Arc<InMemoryQuestionRepository>) -> QuestionService {
    QuestionService::new(repository, FIRESTORE_MAX_DOCUMENT_BYTES)
}

fn text(pairs: &[(&str, &str)]) -> LocalizedText {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn question_with_media(id: &str, media: Vec<MediaItem>) -> Question {
    Question {
        id: id.to_string(),
        text: text(&[("en", "Which one?"), ("tr", "Hangisi?")]),
        choices: vec![Choice {
            id: format!("{}-a", id),
            text: text(&[("en", "This"), ("tr", "Bu")]),
            media,
        }],
    }
}

#[tokio::test]
async fn listed_media_is_always_a_clean_array() {
    let repository = InMemoryQuestionRepository::new();
    repository
        .put_raw(
            "legacy",
            json!({
                "text": { "tr": "Eski" },
                "choices": [
                    { "id": "single", "media": { "type": "image", "url": "https://e.com/a.png" } },
                    { "id": "null", "media": null },
                    { "id": "none" },
                    { "id": "mixed", "media": [
                        { "type": "audio", "url": "" },
                        { "type": "gif", "url": "https://e.com/x.gif" },
                        { "url": "https://e.com/no-type.png" },
                        "not an object",
                        { "type": "video", "url": "https://e.com/v.mp4" }
                    ] },
                    "not a choice"
                ]
            }),
        )
        .await;

    let questions = service(repository.clone()).list_questions().await.unwrap();
    assert_eq!(questions.len(), 1);

    let choices = &questions[0].choices;
    assert_eq!(choices.len(), 4);
    for choice in choices {
        for item in &choice.media {
            assert!(!item.url.is_empty());
            assert!(MediaType::ALL.contains(&item.media_type));
        }
    }
    assert_eq!(choices[0].media.len(), 1);
    assert!(choices[1].media.is_empty());
    assert!(choices[2].media.is_empty());
    assert_eq!(choices[3].media.len(), 1);
    assert_eq!(choices[3].media[0].media_type, MediaType::Video);
}

#[tokio::test]
async fn empty_store_is_seeded_exactly_once() {
    let repository = InMemoryQuestionRepository::new();
    let service = service(repository.clone());

    let first = service.list_questions().await.unwrap();
    assert_eq!(repository.len().await, 3);

    let second = service.list_questions().await.unwrap();
    assert_eq!(repository.batch_calls.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn first_listing_of_empty_store_returns_defaults_in_order() {
    let repository = InMemoryQuestionRepository::new();

    let questions = service(repository.clone()).list_questions().await.unwrap();
    let ids: Vec<_> = questions.iter().map(|q| q.id.as_str()).collect();

    assert_eq!(ids, vec!["q1", "q2", "q3"]);
    assert_eq!(questions, default_questions());
    assert!(repository.len().await > 0);
}

#[tokio::test]
async fn saved_question_is_listed_unchanged() {
    let repository = InMemoryQuestionRepository::new();
    let service = service(repository.clone());

    let mut image = MediaItem::new(MediaType::Image, "data:image/png;base64,iVBORw==");
    image.alt_text = Some(text(&[("en", "A dot"), ("tr", "Bir nokta")]));
    image.data_ai_hint = Some("dot".to_string());
    let question = question_with_media(
        "q5",
        vec![image, MediaItem::new(MediaType::Audio, "https://e.com/a.mp3")],
    );

    let stored = service.save_question(&question).await.unwrap();
    let listed = service.list_questions().await.unwrap();

    assert_eq!(stored, question);
    assert_eq!(listed, vec![question]);
}

#[tokio::test]
async fn blank_alt_text_is_not_stored() {
    let repository = InMemoryQuestionRepository::new();
    let mut image = MediaItem::new(MediaType::Image, "https://e.com/a.png");
    image.alt_text = Some(text(&[("en", ""), ("tr", "   ")]));

    service(repository.clone())
        .save_question(&question_with_media("q6", vec![image]))
        .await
        .unwrap();

    let stored = repository.get_raw("q6").await.unwrap();
    let item = &stored["choices"][0]["media"][0];
    assert_eq!(item["url"], "https://e.com/a.png");
    assert!(item.get("altText").is_none());
}

#[tokio::test]
async fn save_without_id_makes_no_writes() {
    let repository = InMemoryQuestionRepository::new();

    let result = service(repository.clone())
        .save_question(&question_with_media("", vec![]))
        .await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert_eq!(repository.writes(), 0);
}

#[tokio::test]
async fn media_without_url_is_dropped_on_save() {
    let repository = InMemoryQuestionRepository::new();

    service(repository.clone())
        .save_question(&question_with_media(
            "q8",
            vec![MediaItem::new(MediaType::Image, "")],
        ))
        .await
        .unwrap();

    let stored = repository.get_raw("q8").await.unwrap();
    assert_eq!(stored["choices"][0]["media"], json!([]));
}

#[tokio::test]
async fn deleted_question_is_no_longer_listed() {
    let repository = InMemoryQuestionRepository::new();
    let service = service(repository.clone());
    service.list_questions().await.unwrap();

    service.delete_question("q2").await.unwrap();

    let ids: Vec<_> = service
        .list_questions()
        .await
        .unwrap()
        .into_iter()
        .map(|q| q.id)
        .collect();
    assert_eq!(ids, vec!["q1".to_string(), "q3".to_string()]);
}

#[tokio::test]
async fn ids_are_listed_in_numeric_order() {
    let repository = InMemoryQuestionRepository::new();
    for id in ["q2", "q10", "q1"] {
        repository.put_raw(id, json!({ "text": {}, "choices": [] })).await;
    }

    let ids: Vec<_> = service(repository)
        .list_questions()
        .await
        .unwrap()
        .into_iter()
        .map(|q| q.id)
        .collect();
    assert_eq!(ids, vec!["q1", "q2", "q10"]);
}

#[tokio::test]
async fn oversized_question_is_rejected_without_writing() {
    let repository = InMemoryQuestionRepository::new();
    let payload = "A".repeat(FIRESTORE_MAX_DOCUMENT_BYTES);
    let question = question_with_media(
        "big",
        vec![MediaItem::new(
            MediaType::Video,
            &format!("data:video/mp4;base64,{}", payload),
        )],
    );

    let result = service(repository.clone()).save_question(&question).await;

    assert!(matches!(result, Err(AppError::SizeLimitError(_))));
    assert_eq!(repository.writes(), 0);
}

#[tokio::test]
async fn only_choice_cannot_be_removed_from_draft() {
    let question = question_with_media("q9", vec![]);
    let mut draft = QuestionDraft::from_question(&question);

    let result = draft.remove_choice(0);

    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert_eq!(draft.question(), &question);
}

#[tokio::test]
async fn new_draft_saves_and_lists() {
    let repository = InMemoryQuestionRepository::new();
    let service = service(repository.clone()).with_default_questions(vec![]);

    let mut draft = QuestionDraft::new_question();
    draft.set_text("tr", "Yeni soru");
    draft.set_choice_text(0, "tr", "Evet").unwrap();
    draft.set_choice_text(1, "tr", "Hayır").unwrap();
    draft
        .set_media(1, MediaItem::new(MediaType::Image, ""))
        .unwrap();
    let question = draft.into_question();

    service.save_question(&question).await.unwrap();
    let listed = service.list_questions().await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, question.id);
    assert_eq!(listed[0].choices.len(), 2);
    assert!(listed[0].choices[1].media.is_empty());
}
