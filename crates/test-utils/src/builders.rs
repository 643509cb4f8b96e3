//! JSON payload and response builders for gateway tests.

use pedigree::gateway::Response;
use serde_json::{json, Value};

/// Bare person record.
pub fn person_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "display": { "name": name }
    })
}

/// Person record as returned by the ancestry endpoint.
pub fn ancestor_json(id: &str, ascendancy_number: &str) -> Value {
    json!({
        "id": id,
        "display": {
            "name": format!("Ancestor {id}"),
            "ascendancyNumber": ascendancy_number
        }
    })
}

/// Person record as returned by the descendancy endpoint.
pub fn descendant_json(id: &str, descendancy_number: &str) -> Value {
    json!({
        "id": id,
        "display": {
            "name": format!("Descendant {id}"),
            "descendancyNumber": descendancy_number
        }
    })
}

/// `200 OK` carrying `{"persons": [...]}`.
pub fn persons_response(persons: Vec<Value>) -> Response {
    Response::new(200).with_data(json!({ "persons": persons }))
}

/// `307` portrait redirect pointing at `url`.
pub fn portrait_redirect(url: &str) -> Response {
    Response::new(307).with_header("Location", url)
}

/// `204 No Content`.
pub fn no_content() -> Response {
    Response::new(204)
}

/// Response with `status` and no body.
pub fn status(status: u16) -> Response {
    Response::new(status)
}

/// `200 OK` from the current-user endpoint.
pub fn current_user_response(person_id: &str) -> Response {
    Response::new(200).with_data(json!({
        "users": [{ "id": "user-1", "personId": person_id }]
    }))
}
