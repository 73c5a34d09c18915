#![deny(missing_docs)]
//! The pdfjson binary's library half.
//!
//! Wires the extraction core to the filesystem: CLI parsing, API-key
//! loading, PDF text reading, and the sequential batch driver that writes
//! one JSON file per input PDF.

/// Folder-level batch driver.
pub mod batch;
/// Command-line interface.
pub mod cli;
/// API-key loading.
pub mod credentials;
/// Error types for the binary.
pub mod errors;
/// Atomic output writes.
pub mod output;
/// PDF text extraction.
pub mod reader;

pub use batch::{BatchDriver, BatchJob, BatchSummary, DocumentError};
pub use cli::{Cli, TemplateChoice};
pub use errors::AppError;
pub use reader::{DocumentReader, PdfTextReader};

/// Exit code: every document produced a JSON file.
pub const EXIT_OK: u8 = 0;
/// Exit code: at least one document failed.
pub const EXIT_DOCUMENT_FAILED: u8 = 1;
/// Exit code: the run was aborted by a configuration error.
pub const EXIT_CONFIG_ERROR: u8 = 2;
