use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    error::ErrorKind,
    options::ReplaceOptions,
    Collection,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::document::{QuestionDocument, RawQuestionDocument},
};

/// Storage of question documents keyed by question id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Every stored document, in no particular order.
    async fn find_all(&self) -> AppResult<Vec<RawQuestionDocument>>;
    /// Writes `document` under `id`, replacing whatever was there.
    async fn replace(&self, id: &str, document: QuestionDocument) -> AppResult<()>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    /// Writes all documents or none of them.
    async fn insert_batch(&self, documents: Vec<(String, QuestionDocument)>) -> AppResult<()>;
    async fn health_check(&self) -> AppResult<()>;
}

pub struct MongoQuestionRepository {
    db: Database,
    collection: Collection<Document>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection(collection_name);
        Self {
            db: db.clone(),
            collection,
        }
    }

    fn to_bson(id: &str, document: &QuestionDocument) -> AppResult<Document> {
        let mut body = mongodb::bson::to_document(document)?;
        body.insert("_id", id);
        Ok(body)
    }
}

fn raw_from_bson(mut document: Document) -> AppResult<RawQuestionDocument> {
    let id = match document.remove("_id") {
        Some(Bson::String(id)) => id,
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(other) => other.to_string(),
        None => {
            return Err(AppError::MalformedResponseError(
                "a question document has no _id".to_string(),
            ))
        }
    };

    Ok(RawQuestionDocument::new(
        id,
        Bson::Document(document).into_relaxed_extjson(),
    ))
}

enum TransactionOutcome {
    Unsupported(String),
    Failed(AppError),
}

impl MongoQuestionRepository {
    async fn insert_in_transaction(&self, bodies: Vec<Document>) -> Result<(), TransactionOutcome> {
        let mut session = self
            .db
            .client()
            .start_session()
            .await
            .map_err(|e| TransactionOutcome::Unsupported(e.to_string()))?;
        session
            .start_transaction()
            .await
            .map_err(|e| TransactionOutcome::Unsupported(e.to_string()))?;

        let inserted = self.collection.insert_many(bodies).session(&mut session).await;
        match inserted {
            Ok(_) => session.commit_transaction().await.map_err(|e| {
                TransactionOutcome::Failed(AppError::from_backend_message(
                    "Writing question batch",
                    &e.to_string(),
                ))
            }),
            Err(e) if is_transaction_unsupported(&e) => {
                Err(TransactionOutcome::Unsupported(e.to_string()))
            }
            Err(e) => {
                if let Err(abort) = session.abort_transaction().await {
                    log::error!("Could not abort batch transaction: {}", abort);
                }
                Err(TransactionOutcome::Failed(AppError::from_backend_message(
                    "Writing question batch",
                    &e.to_string(),
                )))
            }
        }
    }

    /// Standalone servers have no transactions; documents this insert wrote are removed by id.
    async fn insert_with_cleanup(&self, bodies: Vec<Document>, ids: &[String]) -> AppResult<()> {
        if let Err(err) = self.collection.insert_many(bodies).await {
            let written = ids_written_before(ids, first_failed_index(&err));
            log::error!(
                "Batch insert failed, removing {} partially written document(s): {}",
                written.len(),
                err
            );
            if !written.is_empty() {
                if let Err(cleanup) = self
                    .collection
                    .delete_many(doc! { "_id": { "$in": written.to_vec() } })
                    .await
                {
                    log::error!("Could not remove partially written documents: {}", cleanup);
                }
            }
            return Err(AppError::from_backend_message("Writing question batch", &err.to_string()));
        }
        Ok(())
    }
}

/// Index of the first rejected document of an ordered `insert_many`, when the server reported one.
fn first_failed_index(err: &mongodb::error::Error) -> Option<usize> {
    match err.kind.as_ref() {
        ErrorKind::InsertMany(failure) => failure
            .write_errors
            .as_ref()
            .and_then(|errors| errors.iter().map(|e| e.index).min()),
        _ => None,
    }
}

/// Ids an ordered insert wrote before stopping at `first_failed`.
///
/// The rejected document and everything after it were never written by this
/// insert, so they may belong to a concurrent writer. Without an index the
/// whole batch is assumed written.
fn ids_written_before(ids: &[String], first_failed: Option<usize>) -> &[String] {
    let end = first_failed.unwrap_or(ids.len()).min(ids.len());
    &ids[..end]
}

fn is_transaction_unsupported(err: &mongodb::error::Error) -> bool {
    let message = err.to_string();
    message.contains("Transaction numbers are only allowed")
        || message.contains("Transactions are not supported")
        || message.contains("IllegalOperation")
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn find_all(&self) -> AppResult<Vec<RawQuestionDocument>> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|e| AppError::from_backend_message("Loading questions", &e.to_string()))?;
        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| AppError::from_backend_message("Loading questions", &e.to_string()))?;

        documents.into_iter().map(raw_from_bson).collect()
    }

    async fn replace(&self, id: &str, document: QuestionDocument) -> AppResult<()> {
        let body = Self::to_bson(id, &document)?;
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(doc! { "_id": id }, body)
            .with_options(options)
            .await
            .map_err(|e| {
                AppError::from_backend_message(&format!("Saving question '{}'", id), &e.to_string())
            })?;

        log::info!("Question '{}' saved", id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.collection
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| {
                AppError::from_backend_message(&format!("Deleting question '{}'", id), &e.to_string())
            })?;

        log::info!("Question '{}' deleted", id);
        Ok(())
    }

    async fn insert_batch(&self, documents: Vec<(String, QuestionDocument)>) -> AppResult<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let ids: Vec<String> = documents.iter().map(|(id, _)| id.clone()).collect();
        let bodies = documents
            .iter()
            .map(|(id, document)| Self::to_bson(id, document))
            .collect::<AppResult<Vec<Document>>>()?;

        match self.insert_in_transaction(bodies.clone()).await {
            Ok(()) => {}
            Err(TransactionOutcome::Unsupported(reason)) => {
                log::warn!("Transactions unavailable ({}), inserting without one", reason);
                self.insert_with_cleanup(bodies, &ids).await?;
            }
            Err(TransactionOutcome::Failed(err)) => return Err(err),
        }

        log::info!("Wrote {} questions in one batch", ids.len());
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        self.db.health_check().await
    }
}
