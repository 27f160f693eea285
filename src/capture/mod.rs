//! Local capture of recorded request transactions.
//!
//! The instrumented test command appends transactions to a capture file,
//! delimiting them with a per-run separator token. The import workflow
//! never parses the file; it only checks it is non-empty and uploads it.

pub mod file;
pub mod separator;

pub use file::CaptureFile;
pub use separator::{generate_separator, generate_separator_with, is_separator};
