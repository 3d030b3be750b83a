//! Session settings resolved from the environment and the hosted secrets file.
//!
//! Each setting is looked up in the process environment first (a `.env`
//! file is loaded into it by the binary), then in the hosted secrets TOML.
//! The credential follows the same order: a local key file wins over a key
//! embedded in the secrets file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::{DEFAULT_CREDENTIALS_PATH, DEFAULT_WORKSHEET_NAME};
use crate::env_config::env_non_empty;
use crate::{CoreError, Result};

pub const SPREADSHEET_ID_VAR: &str = "SPREADSHEET_ID";
pub const WORKSHEET_NAME_VAR: &str = "WORKSHEET_NAME";
pub const CREDENTIALS_PATH_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const SECRETS_PATH_VAR: &str = "EMOLABEL_SECRETS";

/// Where the service-account key comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialSource {
    /// Path to a local service-account JSON key.
    File(PathBuf),
    /// Key payload taken from the hosted secrets store.
    Inline(serde_json::Value),
}

/// Contents of the hosted secrets file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostedSecrets {
    #[serde(rename = "SPREADSHEET_ID")]
    pub spreadsheet_id: Option<String>,
    #[serde(rename = "WORKSHEET_NAME")]
    pub worksheet_name: Option<String>,
    pub gcp_service_account: Option<toml::Table>,
    /// Older table name; used only when `[gcp_service_account]` is absent.
    pub service_account: Option<toml::Table>,
}

impl HostedSecrets {
    /// # Errors
    /// Returns [`CoreError::Secrets`] if the text is not valid TOML of the expected shape.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads the secrets file, treating a missing file as "no secrets".
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)?;
        let secrets = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded hosted secrets");
        Ok(Some(secrets))
    }

    /// Resolves the secrets file from `EMOLABEL_SECRETS` or the default location.
    ///
    /// # Errors
    /// Returns an error if the file exists but is malformed.
    pub fn load_default() -> Result<Option<Self>> {
        let path = env_non_empty(SECRETS_PATH_VAR)
            .map_or_else(|| PathBuf::from(crate::constants::DEFAULT_SECRETS_PATH), PathBuf::from);
        Self::load(&path)
    }

    fn service_account_json(&self) -> Result<Option<serde_json::Value>> {
        self.gcp_service_account
            .as_ref()
            .or(self.service_account.as_ref())
            .map(|table| serde_json::to_value(table).map_err(CoreError::from))
            .transpose()
    }
}

/// Resolved settings for one labeling session.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub spreadsheet_id: String,
    pub worksheet_name: String,
    pub credentials: CredentialSource,
}

impl Settings {
    /// Resolves settings from the process environment, then `secrets`.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] when no spreadsheet id or credential is available.
    pub fn resolve(secrets: Option<&HostedSecrets>) -> Result<Self> {
        Self::resolve_with(env_non_empty, secrets)
    }

    /// Same as [`Settings::resolve`] with an injectable variable lookup.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] when no spreadsheet id or credential is available.
    pub fn resolve_with(
        lookup: impl Fn(&str) -> Option<String>,
        secrets: Option<&HostedSecrets>,
    ) -> Result<Self> {
        let from_secrets = |pick: fn(&HostedSecrets) -> Option<&String>| {
            secrets.and_then(pick).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
        };

        let spreadsheet_id = lookup(SPREADSHEET_ID_VAR)
            .or_else(|| from_secrets(|s| s.spreadsheet_id.as_ref()))
            .ok_or_else(|| {
                CoreError::Config(format!("{SPREADSHEET_ID_VAR} not set (env or secrets)"))
            })?;

        let worksheet_name = lookup(WORKSHEET_NAME_VAR)
            .or_else(|| from_secrets(|s| s.worksheet_name.as_ref()))
            .unwrap_or_else(|| DEFAULT_WORKSHEET_NAME.to_owned());

        let credentials = resolve_credentials(lookup(CREDENTIALS_PATH_VAR), secrets)?;

        Ok(Self { spreadsheet_id, worksheet_name, credentials })
    }
}

fn resolve_credentials(
    explicit_path: Option<String>,
    secrets: Option<&HostedSecrets>,
) -> Result<CredentialSource> {
    let path = PathBuf::from(explicit_path.as_deref().unwrap_or(DEFAULT_CREDENTIALS_PATH));
    if path.is_file() {
        return Ok(CredentialSource::File(path));
    }
    if let Some(payload) = secrets.map(HostedSecrets::service_account_json).transpose()?.flatten() {
        return Ok(CredentialSource::Inline(payload));
    }
    Err(CoreError::Config(format!(
        "service account not found: no key file at {} and no [gcp_service_account] in secrets",
        path.display()
    )))
}
