//! Ephemeral capture file written by the test command.

use crate::utils::error::CaptureError;
use log::debug;
use std::path::Path;
use tempfile::NamedTempFile;

/// Temporary file receiving recorded transactions for one run
///
/// Removed from disk when dropped.
#[derive(Debug)]
pub struct CaptureFile {
    file: NamedTempFile,
}

impl CaptureFile {
    /// Allocate a new, empty capture file in the system temp directory
    pub fn create() -> Result<Self, CaptureError> {
        let file = tempfile::Builder::new()
            .prefix("cassette-")
            .suffix(".txt")
            .tempfile()?;

        debug!("Created capture file: {}", file.path().display());

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Current size on disk in bytes
    pub fn size(&self) -> Result<u64, CaptureError> {
        Ok(std::fs::metadata(self.path())?.len())
    }

    /// Fail with `CaptureError::Empty` when nothing was recorded
    ///
    /// Only meaningful once the writing process has exited.
    pub fn validate_non_empty(&self) -> Result<u64, CaptureError> {
        match self.size()? {
            0 => Err(CaptureError::Empty),
            size => Ok(size),
        }
    }

    /// Whole file contents, read by path since the writer may have reopened it
    pub fn read_contents(&self) -> Result<Vec<u8>, CaptureError> {
        Ok(std::fs::read(self.path())?)
    }
}
