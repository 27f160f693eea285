use crate::api::{Branch, Revision};
use crate::utils::config::DEFAULT_API_URL;

/// Arguments for the import command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ImportArgs {
    /// Cassette API base URL
    pub api_url: String,

    /// Numeric id of the target project
    pub project_id: u64,

    /// Project access token sent as `authorization: Project <token>`
    pub project_access_token: String,

    /// Branch to import into, created if missing
    pub branch_name: String,

    /// Optional name for the new revision
    pub revision_name: Option<String>,

    /// Shell command running the integration tests
    pub command: String,

    /// Echo command output and show error details
    pub verbose: bool,
}

impl Default for ImportArgs {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            project_id: 0,
            project_access_token: String::new(),
            branch_name: String::new(),
            revision_name: None,
            command: String::new(),
            verbose: false,
        }
    }
}

/// How far an import run got
///
/// Steps run strictly in this order; a failed run stays at the last
/// state it reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportState {
    Init,
    PermissionChecked,
    CaptureReady,
    SubprocessDone,
    CaptureValidated,
    BranchResolved,
    RevisionCreated,
    Uploaded,
    Completed,
}

/// What the service did with a completed revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// A new revision was materialized
    Created,
    /// Uploaded content matched the branch head; nothing new was created
    Unchanged,
    /// Completion was queued without saying whether anything changed
    Queued,
}

/// Result of a successful import run
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub project_id: u64,
    pub branch: Branch,
    pub revision: Revision,
    pub bytes_uploaded: u64,
    pub outcome: CompletionOutcome,
}

impl ImportReport {
    /// Path identifying the revision within the service
    pub fn revision_path(&self) -> String {
        format!(
            "projects/{}/branches/{}/revisions/{}",
            self.project_id, self.branch.id, self.revision.id
        )
    }
}
