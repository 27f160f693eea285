//! Wire types of the cassette REST API.
//!
//! Every resource comes wrapped in an envelope named after it
//! (`{"branch": {...}}`), so each one has a small envelope struct.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a remote resource
///
/// The API hands out numeric ids today; strings are accepted so a
/// change of id scheme server-side does not break imports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{}", n),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        ResourceId::Number(id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Branch {
    pub id: ResourceId,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Revision {
    pub id: ResourceId,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectEnvelope {
    pub project: Project,
}

#[derive(Debug, Deserialize)]
pub struct BranchEnvelope {
    pub branch: Branch,
}

#[derive(Debug, Deserialize)]
pub struct RevisionEnvelope {
    pub revision: Revision,
}

/// Body of `PUT /projects/{id}/branches`
#[derive(Debug, Serialize)]
pub struct BranchRequest<'a> {
    pub name: &'a str,
}

/// Body of `POST /revisions/{id}/complete`
///
/// `created_new_revision` is `None` when the service only queued the
/// completion and did not say whether anything changed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompletedRevision {
    #[serde(default)]
    pub created_new_revision: Option<bool>,
}
