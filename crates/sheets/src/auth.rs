//! OAuth2 access tokens for the Sheets API.
//!
//! Service accounts sign a short-lived JWT assertion (RS256) and exchange it
//! at the key's `token_uri` for a bearer token, which is cached until shortly
//! before it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::client::truncate;
use crate::credentials::ServiceAccountKey;
use crate::error::SheetsError;

/// Read/write access to spreadsheets.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Where bearer tokens come from.
pub enum TokenSource {
    ServiceAccount(ServiceAccountAuth),
    /// Fixed token, for pre-authorized callers and tests.
    Static(String),
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ServiceAccount(auth) => {
                f.debug_tuple("ServiceAccount").field(&auth.key.client_email).finish()
            },
            Self::Static(_) => f.debug_tuple("Static").field(&"***").finish(),
        }
    }
}

impl TokenSource {
    /// # Errors
    /// Returns an error if a service-account token cannot be obtained.
    pub async fn bearer(&self) -> Result<String, SheetsError> {
        match self {
            Self::ServiceAccount(auth) => auth.access_token().await,
            Self::Static(token) => Ok(token.clone()),
        }
    }
}

/// Service-account token exchange with an in-memory token cache.
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    #[must_use]
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Self {
        Self { key, http, cached: Mutex::new(None) }
    }

    /// Builds the signed JWT assertion for the token request.
    ///
    /// # Errors
    /// Returns [`SheetsError::Jwt`] if the private key is not a valid RSA PEM.
    pub fn signed_assertion(&self, now: DateTime<Utc>) -> Result<String, SheetsError> {
        let iat = now.timestamp();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat,
            exp: iat.saturating_add(ASSERTION_LIFETIME_SECS),
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.key.private_key_id);
        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(&header, &claims, &encoding_key)?)
    }

    /// Returns a cached token or exchanges a fresh assertion for one.
    ///
    /// # Errors
    /// Returns an error if signing, the HTTP call, or response parsing fails.
    pub async fn access_token(&self) -> Result<String, SheetsError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref().filter(|t| t.expires_at > now) {
            return Ok(token.token.clone());
        }

        let assertion = self.signed_assertion(now)?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SheetsError::HttpStatus { code: status.as_u16(), body });
        }
        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| SheetsError::JsonParse {
                context: format!("token response (body: {})", truncate(&body, 200)),
                source: e,
            })?;

        let lifetime = parsed.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        let expires_at = now + Duration::seconds(lifetime.saturating_sub(REFRESH_MARGIN_SECS));
        tracing::debug!(client_email = %self.key.client_email, lifetime, "obtained access token");
        *cached = Some(CachedToken { token: parsed.access_token.clone(), expires_at });
        Ok(parsed.access_token)
    }
}
