//! Typed error enum for the service layer.
//!
//! Unifies core (configuration, validation) and Sheets API failures so
//! callers can tell a rejected submission from a failed remote call.

use emolabel_core::CoreError;
use emolabel_sheets::SheetsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration, template or form validation failure.
    #[error("{0}")]
    Core(#[from] CoreError),

    /// Remote spreadsheet call failed; nothing was written by this call.
    #[error("sheets: {0}")]
    Sheets(#[from] SheetsError),
}

impl ServiceError {
    /// Whether the caller supplied bad input (no remote call was made).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_validation())
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_config())
            || matches!(self, Self::Sheets(SheetsError::Credentials(_)))
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Sheets(e) if e.is_permission_denied())
    }
}
