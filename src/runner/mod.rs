//! Execution of the user's test command.

pub mod subprocess;

pub use subprocess::{CommandRunner, ShellRunner};
