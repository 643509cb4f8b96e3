// src/indexer.rs

//! Ahnentafel Indexer.
//!
//! Turns flat person lists into position-keyed structures:
//! - ancestry: ahnentafel number (root 1, father `2n`, mother `2n + 1`) to
//!   person;
//! - descendancy: the root's spouse (`1-S`) and generation-one children
//!   (`1.<n>`, ordered by `n`).
//!
//! Records with a missing or unparseable position number are skipped and
//! logged at debug level; they never fail the aggregation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::errors::{PedigreeError, Result};
use crate::person::{Person, PersonArena, PersonKey};

/// Sparse ahnentafel number -> person mapping.
pub type AncestryIndex = BTreeMap<u32, PersonKey>;

/// Descendancy number of the root person's spouse.
pub const SPOUSE_SENTINEL: &str = "1-S";

static CHILD_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1\.([1-9][0-9]*)$").expect("child pattern is valid"));

static DESCENDANCY_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[1-9][0-9]*(\.[1-9][0-9]*)*(-S)?$").expect("descendancy pattern is valid")
});

/// Parse an ahnentafel number. Positions start at 1.
pub fn parse_ascendancy_number(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(PedigreeError::MalformedPosition(raw.to_string())),
    }
}

/// Father's ahnentafel number, `None` past the representable range.
pub fn father_of(n: u32) -> Option<u32> {
    n.checked_mul(2)
}

/// Mother's ahnentafel number, `None` past the representable range.
pub fn mother_of(n: u32) -> Option<u32> {
    n.checked_mul(2)?.checked_add(1)
}

/// Generation of an ahnentafel number (root = 0, parents = 1, ...).
pub fn generation_of(n: u32) -> u32 {
    n.max(1).ilog2()
}

/// Where a descendancy number places a person relative to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescendancyPosition {
    /// `1`
    Root,
    /// `1-S`
    Spouse,
    /// `1.<n>`
    Child(u32),
    /// Well-formed but outside the root's immediate family (`1.2.1`, `1.3-S`).
    Other,
}

pub fn parse_descendancy_number(raw: &str) -> Result<DescendancyPosition> {
    let raw = raw.trim();

    if raw == "1" {
        return Ok(DescendancyPosition::Root);
    }
    if raw == SPOUSE_SENTINEL {
        return Ok(DescendancyPosition::Spouse);
    }
    if let Some(caps) = CHILD_NUMBER.captures(raw) {
        return caps[1]
            .parse::<u32>()
            .map(DescendancyPosition::Child)
            .map_err(|_| PedigreeError::MalformedPosition(raw.to_string()));
    }
    if DESCENDANCY_NUMBER.is_match(raw) {
        return Ok(DescendancyPosition::Other);
    }

    Err(PedigreeError::MalformedPosition(raw.to_string()))
}

/// Insert ancestors into `arena` and index them by ahnentafel number.
///
/// Positions are read from each incoming record before it is merged, so a
/// person appearing at several positions (pedigree collapse) is indexed at
/// all of them. If two records share a number, the later one wins.
pub fn index_ancestry(
    arena: &mut PersonArena,
    persons: impl IntoIterator<Item = Person>,
) -> AncestryIndex {
    let mut index = AncestryIndex::new();

    for person in persons {
        let raw = person.display.ascendancy_number.clone();
        let id = person.id.clone();
        let key = arena.insert(person);

        let Some(raw) = raw else {
            debug!(person = %id, "ancestor without ascendancy number; skipping");
            continue;
        };

        match parse_ascendancy_number(&raw) {
            Ok(n) => {
                index.insert(n, key);
            }
            Err(err) => {
                debug!(person = %id, error = %err, "skipping ancestor");
            }
        }
    }

    index
}

/// Root's spouse and children, split out of a descendancy listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descendancy {
    pub spouse: Option<PersonKey>,
    /// Generation-one children, ordered by child number.
    pub children: Vec<PersonKey>,
}

impl Descendancy {
    /// Every person referenced, spouse first.
    pub fn people(&self) -> impl Iterator<Item = PersonKey> + '_ {
        self.spouse.iter().copied().chain(self.children.iter().copied())
    }
}

/// Insert descendancy records into `arena` and split out spouse and
/// children.
///
/// With `include_spouse = false` the spouse record is ignored.
pub fn partition_descendancy(
    arena: &mut PersonArena,
    persons: impl IntoIterator<Item = Person>,
    include_spouse: bool,
) -> Descendancy {
    let mut spouse = None;
    let mut children: BTreeMap<u32, PersonKey> = BTreeMap::new();

    for person in persons {
        let raw = person.display.descendancy_number.clone();
        let id = person.id.clone();
        let key = arena.insert(person);

        let Some(raw) = raw else {
            debug!(person = %id, "descendant without descendancy number; skipping");
            continue;
        };

        match parse_descendancy_number(&raw) {
            Ok(DescendancyPosition::Spouse) if include_spouse => spouse = Some(key),
            Ok(DescendancyPosition::Child(n)) => {
                children.insert(n, key);
            }
            Ok(_) => {}
            Err(err) => {
                debug!(person = %id, error = %err, "skipping descendant");
            }
        }
    }

    Descendancy {
        spouse,
        children: children.into_values().collect(),
    }
}
