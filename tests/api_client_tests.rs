use cassette_cli::api::{ApiClient, CassetteApi, RequestBody, ResourceId};
use cassette_cli::utils::error::ApiError;
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(server.base_url(), "tok").unwrap()
}

#[test]
fn test_get_sends_project_authorization() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/projects/42")
            .header("authorization", "Project tok");
        then.status(200)
            .json_body(json!({"project": {"id": 42, "name": "shop"}}));
    });

    let response = client(&server).get("projects/42").unwrap();

    mock.assert();
    assert_eq!(response.status, 200);
    assert_eq!(response.body["project"]["name"], "shop");
}

#[test]
fn test_non_success_status_is_remote_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/projects/42");
        then.status(404).body("{\"error\":\"not found\"}");
    });

    let err = client(&server).get("projects/42").unwrap_err();

    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "{\"error\":\"not found\"}");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[test]
fn test_transport_failure_is_request_failed() {
    // Nothing listens on port 9 of localhost
    let client = ApiClient::new("http://127.0.0.1:9", "tok").unwrap();

    let err = client.post("revisions/1/complete", RequestBody::Empty).unwrap_err();

    assert!(matches!(err, ApiError::RequestFailed(_)));
    assert_eq!(err.status_code(), None);
}

#[test]
fn test_sanity_check_requires_true_flag() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/projects/1/import-sanity-check");
        then.status(200).json_body(json!({"can_import": true}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/projects/2/import-sanity-check");
        then.status(200).json_body(json!({"can_import": false}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/projects/3/import-sanity-check");
        then.status(200).json_body(json!({"allowed": true}));
    });

    let client = client(&server);

    assert!(client.can_import(1).unwrap());
    assert!(!client.can_import(2).unwrap());
    assert!(!client.can_import(3).unwrap());
}

#[test]
fn test_upsert_branch_is_idempotent() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/projects/42/branches")
            .json_body(json!({"name": "main"}));
        then.status(200)
            .json_body(json!({"branch": {"id": 7, "name": "main"}}));
    });

    let client = client(&server);
    let first = client.upsert_branch(42, "main").unwrap();
    let second = client.upsert_branch(42, "main").unwrap();

    mock.assert_hits(2);
    assert_eq!(first.id, ResourceId::Number(7));
    assert_eq!(first.id, second.id);
}

#[test]
fn test_create_revision_with_and_without_name() {
    let server = MockServer::start();
    let named = server.mock(|when, then| {
        when.method(POST)
            .path("/branches/7/revisions")
            .json_body(json!({"name": "v2"}));
        then.status(201)
            .json_body(json!({"revision": {"id": 9, "name": "v2"}}));
    });
    let unnamed = server.mock(|when, then| {
        when.method(POST)
            .path("/branches/7/revisions")
            .json_body(json!({}));
        then.status(201).json_body(json!({"revision": {"id": 10}}));
    });

    let client = client(&server);
    let branch_id = ResourceId::Number(7);

    let revision = client.create_revision(&branch_id, Some("v2")).unwrap();
    assert_eq!(revision.id, ResourceId::Number(9));
    assert_eq!(revision.name.as_deref(), Some("v2"));

    let revision = client.create_revision(&branch_id, None).unwrap();
    assert_eq!(revision.id, ResourceId::Number(10));
    assert_eq!(revision.name, None);

    named.assert();
    unnamed.assert();
}

#[test]
fn test_upload_sends_multipart_text_file() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/revisions/9/request-transactions")
            .header("authorization", "Project tok")
            .body_contains("name=\"request-transactions\"")
            .body_contains("filename=\"request-transactions.txt\"")
            .body_contains("separator--abc");
        then.status(200).json_body(json!({}));
    });

    client(&server)
        .upload_request_transactions(&ResourceId::Number(9), b"separator--abc{}".to_vec())
        .unwrap();

    mock.assert();
}

#[test]
fn test_complete_revision_outcomes() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/revisions/1/complete");
        then.status(200).json_body(json!({"created_new_revision": true}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/revisions/2/complete");
        then.status(200).json_body(json!({"created_new_revision": false}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/revisions/3/complete");
        then.status(202);
    });

    let client = client(&server);

    assert_eq!(
        client.complete_revision(&ResourceId::Number(1)).unwrap().created_new_revision,
        Some(true)
    );
    assert_eq!(
        client.complete_revision(&ResourceId::Number(2)).unwrap().created_new_revision,
        Some(false)
    );
    assert_eq!(
        client.complete_revision(&ResourceId::Number(3)).unwrap().created_new_revision,
        None
    );
}

#[test]
fn test_unexpected_envelope_is_invalid_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path("/projects/42/branches");
        then.status(200).json_body(json!({"id": 7}));
    });

    let err = client(&server).upsert_branch(42, "main").unwrap_err();

    assert!(matches!(err, ApiError::InvalidResponse(_)));
}
