//! Client for the cassette revision API.
//!
//! `ApiClient` speaks raw authenticated JSON/multipart HTTP. The
//! `CassetteApi` trait is the typed surface the import workflow needs;
//! `ApiClient` implements it and tests swap in in-memory stubs.

pub mod client;
mod endpoints;
pub mod types;

pub use client::{ApiClient, ApiResponse, RequestBody};
pub use types::{Branch, CompletedRevision, Project, ResourceId, Revision};

use crate::utils::error::ApiError;

/// Remote operations used by an import run
pub trait CassetteApi {
    /// `GET /projects/{id}`
    fn fetch_project(&self, project_id: u64) -> Result<Project, ApiError>;

    /// `GET /projects/{id}/import-sanity-check`; true only for `can_import: true`
    fn can_import(&self, project_id: u64) -> Result<bool, ApiError>;

    /// `PUT /projects/{id}/branches`, returns the existing branch when the name is taken
    fn upsert_branch(&self, project_id: u64, name: &str) -> Result<Branch, ApiError>;

    /// `POST /branches/{id}/revisions`
    fn create_revision(&self, branch_id: &ResourceId, name: Option<&str>)
        -> Result<Revision, ApiError>;

    /// `POST /revisions/{id}/request-transactions` as multipart upload
    fn upload_request_transactions(
        &self,
        revision_id: &ResourceId,
        contents: Vec<u8>,
    ) -> Result<(), ApiError>;

    /// `POST /revisions/{id}/complete`
    fn complete_revision(&self, revision_id: &ResourceId) -> Result<CompletedRevision, ApiError>;
}
