// src/person/mod.rs

//! Person records as returned by the genealogy API, and the per-request
//! [`PersonArena`] that owns them.

pub mod arena;

use serde::{Deserialize, Serialize};

pub use arena::{lock_arena, PersonArena, PersonKey, SharedArena};

/// A person record. Identity is [`Person::id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub display: DisplayProperties,
}

/// Display metadata of a person.
///
/// `ascendancy_number` / `descendancy_number` are the pedigree position
/// numbers the API assigns relative to the requested person; they are kept
/// as the raw strings the API sends and parsed by the indexer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifespan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascendancy_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descendancy_number: Option<String>,
    /// Filled in by portrait enrichment after the record was fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait_url: Option<String>,
}

impl Person {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display: DisplayProperties::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display.name = Some(name.into());
        self
    }

    pub fn with_ascendancy_number(mut self, number: impl Into<String>) -> Self {
        self.display.ascendancy_number = Some(number.into());
        self
    }

    pub fn with_descendancy_number(mut self, number: impl Into<String>) -> Self {
        self.display.descendancy_number = Some(number.into());
        self
    }

    pub fn ascendancy_number(&self) -> Option<&str> {
        self.display.ascendancy_number.as_deref()
    }

    pub fn descendancy_number(&self) -> Option<&str> {
        self.display.descendancy_number.as_deref()
    }

    pub fn portrait_url(&self) -> Option<&str> {
        self.display.portrait_url.as_deref()
    }

    pub fn attach_portrait(&mut self, url: impl Into<String>) {
        self.display.portrait_url = Some(url.into());
    }

    /// Fill display fields this record lacks from another record of the
    /// same person.
    pub(crate) fn absorb(&mut self, other: Person) {
        let mine = &mut self.display;
        let theirs = other.display;
        fill(&mut mine.name, theirs.name);
        fill(&mut mine.gender, theirs.gender);
        fill(&mut mine.lifespan, theirs.lifespan);
        fill(&mut mine.birth_date, theirs.birth_date);
        fill(&mut mine.birth_place, theirs.birth_place);
        fill(&mut mine.death_date, theirs.death_date);
        fill(&mut mine.death_place, theirs.death_place);
        fill(&mut mine.ascendancy_number, theirs.ascendancy_number);
        fill(&mut mine.descendancy_number, theirs.descendancy_number);
        fill(&mut mine.portrait_url, theirs.portrait_url);
    }
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value;
    }
}

/// Body shape shared by the ancestry, descendancy and children endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonsPayload {
    #[serde(default)]
    pub persons: Vec<Person>,
}
