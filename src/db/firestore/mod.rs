pub mod value;

use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Client, IntoUrl, RequestBuilder, Response, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Handle on one project's default Firestore database, over the REST API.
#[derive(Clone)]
pub struct FirestoreClient {
    http: Client,
    base_url: String,
    project_id: String,
    api_key: SecretString,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl FirestoreClient {
    pub fn connect(config: &Config) -> AppResult<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::ConfigurationError(format!("could not build HTTP client: {}", e)))?;

        let base_url = match &config.firestore_emulator_host {
            Some(host) => {
                log::info!("Using Firestore emulator at {}", host);
                format!("http://{}/v1", host)
            }
            None => FIRESTORE_BASE_URL.to_string(),
        };

        Ok(Self {
            http,
            base_url,
            project_id: config.firebase.project_id.clone(),
            api_key: config.firebase.api_key.clone(),
        })
    }

    /// Points the client at another endpoint, e.g. an emulator or a test server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Resource name of the database root, as used inside commit requests.
    pub fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    pub fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.database_path(), collection, id)
    }

    pub fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.database_path(), collection)
    }

    /// URL of one document. `id` is percent-encoded as a single path segment.
    pub fn document_url(&self, collection: &str, id: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.collection_url(collection)).map_err(|e| {
            AppError::ConfigurationError(format!("invalid Firestore base URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                AppError::ConfigurationError(format!("Firestore base URL '{}' cannot take a path", self.base_url))
            })?
            .push(id);
        Ok(url)
    }

    pub fn commit_url(&self) -> String {
        format!("{}/{}:commit", self.base_url, self.database_path())
    }

    pub fn get<U: IntoUrl>(&self, url: U) -> RequestBuilder {
        self.authorize(self.http.get(url))
    }

    pub fn patch<U: IntoUrl>(&self, url: U) -> RequestBuilder {
        self.authorize(self.http.patch(url))
    }

    pub fn post<U: IntoUrl>(&self, url: U) -> RequestBuilder {
        self.authorize(self.http.post(url))
    }

    pub fn delete<U: IntoUrl>(&self, url: U) -> RequestBuilder {
        self.authorize(self.http.delete(url))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.query(&[("key", self.api_key.expose_secret())])
    }

    /// Sends `request` and decodes a JSON body, classifying every failure.
    pub async fn send_json<T: DeserializeOwned>(&self, context: &str, request: RequestBuilder) -> AppResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::from_backend_message(context, &e.to_string()))?;
        let body = read_checked_body(context, response).await?;

        serde_json::from_value(body).map_err(|e| {
            AppError::MalformedResponseError(format!(
                "{}: unexpected response shape ({}). Check server-side logs and configuration.",
                context, e
            ))
        })
    }

    /// Sends `request` and discards the body once the status is known to be a success.
    pub async fn send(&self, context: &str, request: RequestBuilder) -> AppResult<()> {
        let _: Value = self.send_json(context, request).await?;
        Ok(())
    }
}

async fn read_checked_body(context: &str, response: Response) -> AppResult<Value> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("json"))
        .unwrap_or(false);

    let text = response
        .text()
        .await
        .map_err(|e| AppError::from_backend_message(context, &e.to_string()))?;

    if !is_json {
        log::error!(
            "{}: expected a JSON response, got status {} with body {:.200}",
            context,
            status,
            text
        );
        return Err(AppError::MalformedResponseError(format!(
            "{}: the database answered with a non-JSON response (status {}). \
             Check server-side logs and configuration.",
            context, status
        )));
    }

    if !status.is_success() {
        let message = match serde_json::from_str::<ErrorEnvelope>(&text) {
            Ok(envelope) => format!("{} {}: {}", status.as_u16(), envelope.error.status, envelope.error.message),
            Err(_) => format!("{}: {}", status, text),
        };
        log::error!("{}: {}", context, message);
        return Err(AppError::from_backend_message(context, &message));
    }

    if text.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_str(&text).map_err(|e| {
        AppError::MalformedResponseError(format!(
            "{}: could not parse the database response ({}). Check server-side logs and configuration.",
            context, e
        ))
    })
}
