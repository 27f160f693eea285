//! Cassette CLI
//!
//! Records the HTTP traffic of an integration test run and imports it
//! into cassette as a new revision of a branch.
//!
//! The `import` workflow lives in [`commands::import`]; it talks to the
//! service through [`api::CassetteApi`], runs the test command through
//! [`runner::CommandRunner`], and reports progress to an
//! [`events::EventSink`].
//!
//! ```bash
//! cassette import --project-id 42 --project-access-token $TOKEN \
//!     --branch-name main --command "npm test"
//! ```

pub mod api;
pub mod capture;
pub mod commands;
pub mod events;
pub mod output;
pub mod runner;
pub mod utils;
