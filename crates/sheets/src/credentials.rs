//! Service-account key material.

use std::path::Path;

use emolabel_core::CredentialSource;
use serde::Deserialize;

use crate::error::SheetsError;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Fields of a Google service-account JSON key that token exchange needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"***")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_owned()
}

impl ServiceAccountKey {
    /// # Errors
    /// Returns [`SheetsError::Credentials`] if the file is unreadable or not a key.
    pub fn from_file(path: &Path) -> Result<Self, SheetsError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SheetsError::Credentials(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            SheetsError::Credentials(format!("{} is not a service account key: {e}", path.display()))
        })
    }

    /// # Errors
    /// Returns [`SheetsError::Credentials`] if required fields are missing.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SheetsError> {
        serde_json::from_value(value)
            .map_err(|e| SheetsError::Credentials(format!("secret payload is not a service account key: {e}")))
    }

    /// # Errors
    /// Returns [`SheetsError::Credentials`] if the source cannot be turned into a key.
    pub fn from_source(source: &CredentialSource) -> Result<Self, SheetsError> {
        match source {
            CredentialSource::File(path) => Self::from_file(path),
            CredentialSource::Inline(value) => Self::from_value(value.clone()),
        }
    }
}
