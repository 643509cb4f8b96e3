mod common;
use crate::common::{init_tracing, with_timeout, TestResult};

use pedigree::errors::PedigreeError;
use pedigree::gateway::{remote_status_error, Response};
use pedigree::person::PersonsPayload;
use pedigree::workflow::resolve_current_person;
use pedigree_test_utils::builders::{current_user_response, person_json, persons_response};
use pedigree_test_utils::fake_gateway::FakeGateway;
use serde_json::json;

#[test]
fn test_headers_are_case_insensitive() {
    let response = Response::new(307).with_header("Location", "https://img/1.jpg");

    assert_eq!(response.header("location"), Some("https://img/1.jpg"));
    assert_eq!(response.header("LOCATION"), Some("https://img/1.jpg"));
    assert_eq!(response.location(), Some("https://img/1.jpg"));
    assert!(!response.is_success());
}

#[test]
fn test_empty_location_is_not_a_redirect_target() {
    let response = Response::new(200).with_header("location", "");
    assert_eq!(response.location(), None);
}

#[test]
fn test_status_text_uses_canonical_reason() {
    assert_eq!(Response::new(404).status_text, "Not Found");
    assert_eq!(Response::new(204).status_text, "No Content");
    assert!(Response::new(204).is_success());
}

#[test]
fn test_remote_status_error_carries_status_text_and_body() {
    let response = Response::new(500).with_data(json!({ "message": "down" }));

    match remote_status_error(&response) {
        PedigreeError::RemoteStatus {
            status,
            status_text,
            body,
        } => {
            assert_eq!(status, 500);
            assert_eq!(status_text, "Internal Server Error");
            assert!(body.contains("down"));
        }
        other => panic!("Expected RemoteStatus, got: {:?}", other),
    }

    match remote_status_error(&Response::new(503)) {
        PedigreeError::RemoteStatus { body, .. } => assert!(body.is_empty()),
        other => panic!("Expected RemoteStatus, got: {:?}", other),
    }
}

#[test]
fn test_parse_data_reports_wrong_shape() {
    let ok = persons_response(vec![person_json("P1", "One")]);
    let payload: PersonsPayload = ok.parse_data("/x").unwrap().unwrap();
    assert_eq!(payload.persons[0].id, "P1");

    let empty = Response::new(204);
    assert!(empty.parse_data::<PersonsPayload>("/x").unwrap().is_none());

    let wrong = Response::new(200).with_data(json!({ "persons": "nope" }));
    match wrong.parse_data::<PersonsPayload>("/x") {
        Err(PedigreeError::UnexpectedPayload { path, .. }) => assert_eq!(path, "/x"),
        other => panic!("Expected UnexpectedPayload, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_current_user_resolves_person_id() -> TestResult {
    with_timeout(async {
        init_tracing();

        let gateway = FakeGateway::new();
        gateway.respond("/platform/users/current", current_user_response("KWQ7-123"));

        let person = resolve_current_person(&gateway).await?;
        assert_eq!(person, "KWQ7-123");
        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_current_user_failures() {
    with_timeout(async {
        init_tracing();

        let unauthorized = FakeGateway::new();
        unauthorized.respond("/platform/users/current", Response::new(401));
        let err = resolve_current_person(&unauthorized).await.unwrap_err();
        assert_eq!(err.status(), Some(401));

        let no_person = FakeGateway::new();
        no_person.respond(
            "/platform/users/current",
            Response::new(200).with_data(json!({ "users": [] })),
        );
        let err = resolve_current_person(&no_person).await.unwrap_err();
        assert!(matches!(err, PedigreeError::UnexpectedPayload { .. }));

        let offline = FakeGateway::new();
        offline.fail("/platform/users/current", "connection refused");
        let err = resolve_current_person(&offline).await.unwrap_err();
        assert!(matches!(err, PedigreeError::Transport(_)));
    })
    .await
}
