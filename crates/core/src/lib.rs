//! Core types for emolabel
//!
//! Schema derivation from the template workbooks, row building, the label
//! form, per-session context and settings resolution. Shared by all other crates.

pub mod constants;
pub mod env_config;
mod error;
mod form;
mod row;
mod schema;
mod session;
pub mod settings;
mod table;

pub use error::*;
pub use form::LabelForm;
pub use row::{build_row, build_row_at, format_timestamp};
pub use schema::*;
pub use session::*;
pub use settings::{CredentialSource, HostedSecrets, Settings};
pub use table::{Table, cell_to_string};
