//! Typed cassette endpoints on top of `ApiClient`.

use super::client::{ApiClient, RequestBody};
use super::types::{
    Branch, BranchEnvelope, BranchRequest, CompletedRevision, Project, ProjectEnvelope,
    ResourceId, Revision, RevisionEnvelope,
};
use super::CassetteApi;
use crate::utils::config::{UPLOAD_CONTENT_TYPE, UPLOAD_FIELD_NAME, UPLOAD_FILE_NAME};
use crate::utils::error::ApiError;
use reqwest::blocking::multipart::{Form, Part};
use serde_json::{json, Value};

impl CassetteApi for ApiClient {
    fn fetch_project(&self, project_id: u64) -> Result<Project, ApiError> {
        let envelope: ProjectEnvelope = self.get(&format!("projects/{}", project_id))?.decode()?;
        Ok(envelope.project)
    }

    fn can_import(&self, project_id: u64) -> Result<bool, ApiError> {
        let response = self.get(&format!("projects/{}/import-sanity-check", project_id))?;
        Ok(grants_import(&response.body))
    }

    fn upsert_branch(&self, project_id: u64, name: &str) -> Result<Branch, ApiError> {
        let envelope: BranchEnvelope = self
            .put(&format!("projects/{}/branches", project_id), &BranchRequest { name })?
            .decode()?;
        Ok(envelope.branch)
    }

    fn create_revision(
        &self,
        branch_id: &ResourceId,
        name: Option<&str>,
    ) -> Result<Revision, ApiError> {
        let body = match name {
            Some(name) => json!({ "name": name }),
            None => json!({}),
        };
        let envelope: RevisionEnvelope = self
            .post(&format!("branches/{}/revisions", branch_id), RequestBody::Json(body))?
            .decode()?;
        Ok(envelope.revision)
    }

    fn upload_request_transactions(
        &self,
        revision_id: &ResourceId,
        contents: Vec<u8>,
    ) -> Result<(), ApiError> {
        let part = Part::bytes(contents)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(UPLOAD_CONTENT_TYPE)?;
        let form = Form::new().part(UPLOAD_FIELD_NAME, part);

        self.post(
            &format!("revisions/{}/request-transactions", revision_id),
            RequestBody::Multipart(form),
        )?;
        Ok(())
    }

    fn complete_revision(&self, revision_id: &ResourceId) -> Result<CompletedRevision, ApiError> {
        let response = self.post(&format!("revisions/{}/complete", revision_id), RequestBody::Empty)?;

        // An empty or non-object answer means the completion was only queued
        if !response.body.is_object() {
            return Ok(CompletedRevision::default());
        }
        response.decode()
    }
}

/// Only an explicit `"can_import": true` grants permission
pub(crate) fn grants_import(body: &Value) -> bool {
    matches!(body.get("can_import"), Some(Value::Bool(true)))
}
