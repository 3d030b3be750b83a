//! Typed error enum for the Sheets crate.

use thiserror::Error;

/// Errors from Google Sheets API and token operations.
#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid service account credential: {0}")]
    Credentials(String),
    #[error("token signing failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("worksheet not found: {0}")]
    WorksheetNotFound(String),
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl SheetsError {
    /// Whether the remote service refused the call for lack of permission.
    #[must_use]
    pub const fn is_permission_denied(&self) -> bool {
        matches!(self, Self::HttpStatus { code: 401 | 403, .. })
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::HttpStatus { code: 404, .. } | Self::WorksheetNotFound(_))
    }
}
