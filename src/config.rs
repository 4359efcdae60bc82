use std::{env, fmt, str::FromStr};

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

/// Firestore's per-document ceiling (1 MiB) minus the fixed overhead it reserves.
pub const FIRESTORE_MAX_DOCUMENT_BYTES: usize = 1_048_487;
/// MongoDB's BSON document ceiling.
pub const MONGO_MAX_DOCUMENT_BYTES: usize = 16 * 1024 * 1024;

pub const DEFAULT_FIREBASE_PREFIX: &str = "FIREBASE";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    Mongo,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "firestore" | "firebase" => Ok(StoreBackend::Firestore),
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            other => Err(AppError::ConfigurationError(format!(
                "STORE_BACKEND must be 'firestore' or 'mongo', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Firestore => write!(f, "firestore"),
            StoreBackend::Mongo => write!(f, "mongo"),
        }
    }
}

/// Connection parameters of the hosted document database.
#[derive(Clone, Debug)]
pub struct FirebaseConfig {
    pub prefix: String,
    pub api_key: SecretString,
    pub project_id: String,
    pub auth_domain: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
}

impl FirebaseConfig {
    fn from_source<F>(prefix: &str, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| lookup(&format!("{}_{}", prefix, suffix)).unwrap_or_default();
        Self {
            prefix: prefix.to_string(),
            api_key: SecretString::from(var("API_KEY")),
            project_id: var("PROJECT_ID"),
            auth_domain: var("AUTH_DOMAIN"),
            storage_bucket: var("STORAGE_BUCKET"),
            messaging_sender_id: var("MESSAGING_SENDER_ID"),
            app_id: var("APP_ID"),
        }
    }

    /// Names of the variables that are empty or still hold placeholder text.
    pub fn invalid_variables(&self) -> Vec<String> {
        let fields: [(&str, &str); 6] = [
            ("API_KEY", self.api_key.expose_secret()),
            ("PROJECT_ID", self.project_id.as_str()),
            ("AUTH_DOMAIN", self.auth_domain.as_str()),
            ("STORAGE_BUCKET", self.storage_bucket.as_str()),
            ("MESSAGING_SENDER_ID", self.messaging_sender_id.as_str()),
            ("APP_ID", self.app_id.as_str()),
        ];

        fields
            .iter()
            .filter(|(_, value)| is_missing_or_placeholder(value))
            .map(|(suffix, _)| format!("{}_{}", self.prefix, suffix))
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub backend: StoreBackend,
    pub firebase: FirebaseConfig,
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub questions_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub max_document_bytes: usize,
    pub cors_allowed_origin: Option<String>,
    pub firestore_emulator_host: Option<String>,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_source(|key| env::var(key).ok())
    }

    pub fn from_source<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_source_with_prefix(DEFAULT_FIREBASE_PREFIX, lookup)
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_source_with_prefix<F>(prefix: &str, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("STORE_BACKEND") {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => StoreBackend::Firestore,
        };

        let default_max = match backend {
            StoreBackend::Firestore => FIRESTORE_MAX_DOCUMENT_BYTES,
            StoreBackend::Mongo => MONGO_MAX_DOCUMENT_BYTES,
        };

        Ok(Self {
            backend,
            firebase: FirebaseConfig::from_source(prefix, &lookup),
            mongo_conn_string: lookup("MONGO_CONN_STRING")
                .unwrap_or_else(|| "mongodb://localhost:27017".to_string()),
            mongo_db_name: lookup("MONGO_DB_NAME").unwrap_or_else(|| "yanitmatik".to_string()),
            questions_collection: lookup("QUESTIONS_COLLECTION")
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| "questions".to_string()),
            web_server_host: lookup("WEB_SERVER_HOST").unwrap_or_else(|| "localhost".to_string()),
            web_server_port: lookup("WEB_SERVER_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            max_document_bytes: lookup("MAX_DOCUMENT_BYTES")
                .and_then(|b| b.parse().ok())
                .unwrap_or(default_max),
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN").filter(|o| !o.trim().is_empty()),
            firestore_emulator_host: lookup("FIRESTORE_EMULATOR_HOST").filter(|h| !h.trim().is_empty()),
        })
    }

    /// Checks the connection parameters of the selected backend.
    ///
    /// Fails with a `ConfigurationError` listing every variable that is
    /// missing or still holds placeholder text.
    pub fn validate(&self) -> AppResult<()> {
        let invalid = match self.backend {
            StoreBackend::Firestore => self.firebase.invalid_variables(),
            StoreBackend::Mongo => {
                let mut invalid = Vec::new();
                if is_missing_or_placeholder(&self.mongo_conn_string) {
                    invalid.push("MONGO_CONN_STRING".to_string());
                }
                if is_missing_or_placeholder(&self.mongo_db_name) {
                    invalid.push("MONGO_DB_NAME".to_string());
                }
                invalid
            }
        };

        if invalid.is_empty() {
            return Ok(());
        }

        Err(AppError::ConfigurationError(format!(
            "the {} backend is not configured; missing or placeholder values for: {}",
            self.backend,
            invalid.join(", ")
        )))
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            backend: StoreBackend::Firestore,
            firebase: FirebaseConfig {
                prefix: DEFAULT_FIREBASE_PREFIX.to_string(),
                api_key: SecretString::from("test-api-key".to_string()),
                project_id: "yanitmatik-test".to_string(),
                auth_domain: "yanitmatik-test.firebaseapp.com".to_string(),
                storage_bucket: "yanitmatik-test.appspot.com".to_string(),
                messaging_sender_id: "1234567890".to_string(),
                app_id: "1:1234567890:web:abcdef".to_string(),
            },
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "yanitmatik-test".to_string(),
            questions_collection: "questions".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            max_document_bytes: FIRESTORE_MAX_DOCUMENT_BYTES,
            cors_allowed_origin: None,
            firestore_emulator_host: None,
        }
    }
}

/// True for empty values and for the stock placeholders of setup guides.
pub fn is_missing_or_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty()
        || value.starts_with("YOUR_")
        || value.starts_with("AIzaSyYOUR_")
        || value.contains("PASTE_YOUR_")
        || value.contains("YOUR_PROJECT_ID")
        || value.contains("YOUR_APP_ID")
}
