//! HTTP client for the cassette API.
//!
//! Thin wrapper over a blocking reqwest client: builds URLs from the base
//! URL, attaches the project token, and turns non-2xx answers into
//! `ApiError::Status`. No retries happen here.

use crate::utils::error::ApiError;
use log::debug;
use reqwest::blocking::{multipart::Form, Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Body of a POST request
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Form),
}

/// Status and parsed body of a successful response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Deserialize the body into a typed envelope
    pub fn decode<T: serde::de::DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.body)
            .map_err(|e| ApiError::InvalidResponse(format!("Unexpected response body: {}", e)))
    }
}

/// Authenticated client for one project access token
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    /// Create a client against `base_url`
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ApiError> {
        // A stalled call blocks the run; imports have no deadline
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(ApiError::RequestFailed)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send("GET", path, self.client.get(self.url(path)))
    }

    pub fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse, ApiError> {
        self.send("PUT", path, self.client.put(self.url(path)).json(body))
    }

    pub fn post(&self, path: &str, body: RequestBody) -> Result<ApiResponse, ApiError> {
        let builder = self.client.post(self.url(path));
        let builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form),
        };
        self.send("POST", path, builder)
    }

    fn send(&self, method: &str, path: &str, builder: RequestBuilder) -> Result<ApiResponse, ApiError> {
        debug!("{} {}", method, self.url(path));

        let response = builder
            .header(AUTHORIZATION, format!("Project {}", self.token))
            .header(ACCEPT, "application/json")
            .send()
            .map_err(ApiError::RequestFailed)?;

        let status = response.status();
        let text = response.text().map_err(ApiError::RequestFailed)?;

        debug!("{} {} -> {}", method, path, status);

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            body: parse_body(text),
        })
    }
}

/// Parse a response body as JSON, keeping non-JSON text as a string value
fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }

    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => Value::String(text),
    }
}
