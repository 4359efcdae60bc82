use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    db::{firestore::value, FirestoreClient},
    errors::{AppError, AppResult},
    models::document::{QuestionDocument, RawQuestionDocument},
    repositories::QuestionRepository,
};

const PAGE_SIZE: &str = "300";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    fields: Option<Value>,
}

pub struct FirestoreQuestionRepository {
    client: FirestoreClient,
    collection: String,
}

impl FirestoreQuestionRepository {
    pub fn new(client: FirestoreClient, collection: &str) -> Self {
        Self {
            client,
            collection: collection.to_string(),
        }
    }

    fn encode_body(document: &QuestionDocument) -> AppResult<Value> {
        match document.to_value()? {
            Value::Object(entries) => Ok(Value::Object(value::encode_fields(&entries))),
            _ => Err(AppError::InternalError(
                "question document did not serialize to a map".to_string(),
            )),
        }
    }
}

fn raw_from_firestore(document: FirestoreDocument) -> RawQuestionDocument {
    let id = document
        .name
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();
    RawQuestionDocument::new(id, value::decode_fields(document.fields.as_ref()))
}

#[async_trait]
impl QuestionRepository for FirestoreQuestionRepository {
    async fn find_all(&self) -> AppResult<Vec<RawQuestionDocument>> {
        let url = self.client.collection_url(&self.collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.client.get(&url).query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let page: ListDocumentsResponse = self.client.send_json("Loading questions", request).await?;
            documents.extend(page.documents.into_iter().map(raw_from_firestore));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }

    async fn replace(&self, id: &str, document: QuestionDocument) -> AppResult<()> {
        let body = json!({ "fields": Self::encode_body(&document)? });
        // No updateMask: Firestore replaces the whole document and creates it if missing.
        let request = self
            .client
            .patch(self.client.document_url(&self.collection, id)?)
            .json(&body);

        self.client
            .send(&format!("Saving question '{}'", id), request)
            .await?;

        log::info!("Question '{}' saved", id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let request = self
            .client
            .delete(self.client.document_url(&self.collection, id)?);

        self.client
            .send(&format!("Deleting question '{}'", id), request)
            .await?;

        log::info!("Question '{}' deleted", id);
        Ok(())
    }

    async fn insert_batch(&self, documents: Vec<(String, QuestionDocument)>) -> AppResult<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let writes = documents
            .iter()
            .map(|(id, document)| -> AppResult<Value> {
                Ok(json!({
                    "update": {
                        "name": self.client.document_name(&self.collection, id),
                        "fields": Self::encode_body(document)?,
                    }
                }))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let request = self
            .client
            .post(&self.client.commit_url())
            .json(&json!({ "writes": writes }));

        self.client.send("Writing question batch", request).await?;

        log::info!("Wrote {} questions in one batch", documents.len());
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        let request = self
            .client
            .get(&self.client.collection_url(&self.collection))
            .query(&[("pageSize", "1")]);
        let _: ListDocumentsResponse = self.client.send_json("Checking database", request).await?;
        Ok(())
    }
}
