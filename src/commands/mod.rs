//! CLI command implementations.
//!
//! Commands orchestrate the library components to perform user tasks.

pub mod import;
pub mod models;

// Re-export main command functions
pub use import::{execute_import, validate_args, Importer};
pub use models::{CompletionOutcome, ImportArgs, ImportReport, ImportState};
