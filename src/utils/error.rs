//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level plumbing in main.rs.

use super::config::MAX_ERROR_DETAIL_CHARS;
use crate::api::ResourceId;
use thiserror::Error;

/// Errors that can occur while talking to the cassette API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// HTTP status code, if the server answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidResponse(_) => None,
        }
    }
}

/// Errors that can occur while running the user's command
#[derive(Error, Debug)]
pub enum SubprocessError {
    #[error("Failed to run command \"{command}\": {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command \"{command}\" returned with {}.", describe_exit(.exit_code))]
    Failed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Errors around the local capture file
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Capture file IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No request transactions were recorded")]
    Empty,
}

/// Fatal conditions of an import run, one per workflow step
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("You do not have permission to import revisions to project {project_id}")]
    PermissionDenied {
        project_id: u64,
        #[source]
        source: Option<ApiError>,
    },

    #[error("Failed to initialize API client")]
    Client(#[source] ApiError),

    #[error("Failed to create capture file")]
    CaptureSetup(#[source] CaptureError),

    #[error(transparent)]
    Subprocess(#[from] SubprocessError),

    #[error("Couldn't find any request transactions after test run. Make sure you have selected a test suite with integration tests.")]
    CaptureEmpty,

    #[error("Failed to read capture file")]
    CaptureRead(#[source] CaptureError),

    #[error("Failed to get project with id {project_id}")]
    ProjectLookup {
        project_id: u64,
        #[source]
        source: ApiError,
    },

    #[error("Failed to get or create branch in project {project_name}")]
    BranchResolution {
        project_name: String,
        #[source]
        source: ApiError,
    },

    #[error("Failed to create new revision in branch {branch_name}")]
    RevisionCreation {
        branch_name: String,
        #[source]
        source: ApiError,
    },

    #[error("Failed to upload recordings to revision {revision_id} on branch {branch_name}.")]
    Upload {
        revision_id: ResourceId,
        branch_name: String,
        #[source]
        source: ApiError,
    },

    #[error("Failed to complete revision {revision_id} on branch {branch_name}.")]
    Completion {
        revision_id: ResourceId,
        branch_name: String,
        #[source]
        source: ApiError,
    },
}

impl ImportError {
    /// The remote error behind this failure, if any
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ImportError::PermissionDenied { source, .. } => source.as_ref(),
            ImportError::Client(source) => Some(source),
            ImportError::ProjectLookup { source, .. }
            | ImportError::BranchResolution { source, .. }
            | ImportError::RevisionCreation { source, .. }
            | ImportError::Upload { source, .. }
            | ImportError::Completion { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Buffered stderr of a failed command; always shown to the user
    pub fn command_stderr(&self) -> Option<&str> {
        match self {
            ImportError::Subprocess(SubprocessError::Failed { stderr, .. }) => Some(stderr.as_str()),
            _ => None,
        }
    }

    /// Status code and truncated error text, shown only in verbose mode
    pub fn verbose_detail(&self) -> Option<String> {
        let (status, text) = match self {
            ImportError::Subprocess(SubprocessError::Io { source, .. }) => {
                (None, source.to_string())
            }
            ImportError::CaptureSetup(e) | ImportError::CaptureRead(e) => (None, e.to_string()),
            ImportError::Subprocess(_) | ImportError::CaptureEmpty => return None,
            other => {
                let api = other.api_error()?;
                (api.status_code(), api.to_string())
            }
        };

        let status = status.map_or_else(|| "-".to_string(), |s| s.to_string());
        Some(format!("[Error {}]: {}", status, truncate_chars(&text, MAX_ERROR_DETAIL_CHARS)))
    }
}

/// Cut `text` to at most `max` characters, respecting char boundaries
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
