//! Google Sheets access for emolabel
//!
//! A small Sheets v4 client authenticated as a service account, behind the
//! [`SpreadsheetApi`] trait the synchronizer is written against.

pub mod api;
mod api_types;
pub mod auth;
pub mod client;
pub mod credentials;
pub mod error;

pub use api::{SpreadsheetApi, ValueInputOption, WorksheetInfo, WorksheetRef};
pub use auth::{ServiceAccountAuth, TokenSource};
pub use client::SheetsClient;
pub use credentials::ServiceAccountKey;
pub use error::SheetsError;
