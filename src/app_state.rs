use std::sync::Arc;

use crate::{
    config::{Config, StoreBackend},
    db::{Database, FirestoreClient},
    errors::AppResult,
    repositories::{FirestoreQuestionRepository, MongoQuestionRepository, QuestionRepository},
    services::QuestionService,
};

#[derive(Clone)]
pub struct AppState {
    pub question_service: Arc<QuestionService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let repository: Arc<dyn QuestionRepository> = match config.backend {
            StoreBackend::Firestore => {
                let client = FirestoreClient::connect(&config)?;
                Arc::new(FirestoreQuestionRepository::new(
                    client,
                    &config.questions_collection,
                ))
            }
            StoreBackend::Mongo => {
                let db = Database::connect(&config).await?;
                Arc::new(MongoQuestionRepository::new(&db, &config.questions_collection))
            }
        };

        let question_service = Arc::new(QuestionService::new(
            repository,
            config.max_document_bytes,
        ));

        Ok(Self::from_service(question_service, config))
    }

    pub fn from_service(question_service: Arc<QuestionService>, config: Config) -> Self {
        Self {
            question_service,
            config: Arc::new(config),
        }
    }
}
