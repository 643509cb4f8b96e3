// src/workflow/paths.rs

//! Remote API paths used by the workflow.

pub fn ancestry(person_id: &str, generations: u8) -> String {
    format!("/platform/tree/ancestry?generations={generations}&person={person_id}")
}

pub fn children(person_id: &str) -> String {
    format!("/platform/tree/persons/{person_id}/children")
}

pub fn descendancy(person_id: &str) -> String {
    format!("/platform/tree/descendancy?generations=1&person={person_id}")
}

pub fn portrait(person_id: &str) -> String {
    format!("/platform/tree/persons/{person_id}/portrait")
}

pub const CURRENT_USER: &str = "/platform/users/current";
