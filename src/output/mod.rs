//! Terminal presentation of import progress.
//!
//! The workflow itself never writes to the terminal; it emits events
//! which the reporter here renders.

pub mod console;

// Re-export main types
pub use console::ConsoleReporter;
