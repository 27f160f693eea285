//! Lifecycle events emitted by the import workflow.
//!
//! The workflow reports progress only through an `EventSink`, so it has
//! no knowledge of terminals or spinners. The console reporter in
//! `output` is one sink; tests collect events into a `Vec`.

/// Workflow step an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    PermissionCheck,
    CaptureSetup,
    RunCommand,
    ValidateCapture,
    ResolveBranch,
    CreateRevision,
    Upload,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Started,
    Succeeded,
    Failed,
    /// Neither success nor failure, e.g. a revision with no changes
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEvent {
    pub step: Step,
    pub status: Status,
    pub message: String,
}

impl ImportEvent {
    pub fn new(step: Step, status: Status, message: impl Into<String>) -> Self {
        Self {
            step,
            status,
            message: message.into(),
        }
    }
}

/// Receiver of workflow progress
pub trait EventSink {
    fn event(&mut self, event: ImportEvent);

    /// Raw stdout chunk of the running command (verbose runs only)
    fn output(&mut self, _chunk: &[u8]) {}
}

impl EventSink for Vec<ImportEvent> {
    fn event(&mut self, event: ImportEvent) {
        self.push(event);
    }
}
