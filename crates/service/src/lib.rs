//! Service layer for emolabel
//!
//! Worksheet synchronization and label submission on top of the Sheets client.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

mod error;
mod labeling;
mod sync;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod worksheet;

pub use error::ServiceError;
pub use labeling::LabelService;
pub use sync::{CapacityStatus, MigrationReport, SheetSynchronizer, SyncReport, migrate_legacy_headers};
pub use worksheet::WorksheetHandle;
