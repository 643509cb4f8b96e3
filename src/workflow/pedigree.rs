// src/workflow/pedigree.rs

//! Render-ready result of one workflow run.

use serde_json::{json, Map, Value};

use crate::indexer::{father_of, mother_of, AncestryIndex, Descendancy};
use crate::person::{Person, PersonArena, PersonKey};
use crate::types::DescendantMode;

/// Result of the descendant task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descendants {
    Children(Vec<PersonKey>),
    Descendancy(Descendancy),
}

impl Descendants {
    pub fn mode(&self) -> DescendantMode {
        match self {
            Descendants::Children(_) => DescendantMode::Children,
            Descendants::Descendancy(_) => DescendantMode::Descendancy,
        }
    }

    pub fn children(&self) -> &[PersonKey] {
        match self {
            Descendants::Children(children) => children,
            Descendants::Descendancy(d) => &d.children,
        }
    }

    pub fn spouse(&self) -> Option<PersonKey> {
        match self {
            Descendants::Children(_) => None,
            Descendants::Descendancy(d) => d.spouse,
        }
    }
}

/// Aggregate result: every fetched person plus the ancestry and descendant
/// structures that point into them.
#[derive(Debug, Clone)]
pub struct Pedigree {
    /// Identifier the pedigree was built for.
    pub root: String,
    pub persons: PersonArena,
    pub ancestry: AncestryIndex,
    pub descendants: Descendants,
}

impl Pedigree {
    pub fn person(&self, key: PersonKey) -> Option<&Person> {
        self.persons.get(key)
    }

    /// Ancestor at ahnentafel position `n`.
    pub fn ancestor(&self, n: u32) -> Option<&Person> {
        self.ancestry.get(&n).and_then(|&key| self.persons.get(key))
    }

    pub fn father_of(&self, n: u32) -> Option<&Person> {
        father_of(n).and_then(|f| self.ancestor(f))
    }

    pub fn mother_of(&self, n: u32) -> Option<&Person> {
        mother_of(n).and_then(|m| self.ancestor(m))
    }

    pub fn children(&self) -> Vec<&Person> {
        self.resolve(self.descendants.children())
    }

    pub fn spouse(&self) -> Option<&Person> {
        self.descendants.spouse().and_then(|key| self.persons.get(key))
    }

    fn resolve(&self, keys: &[PersonKey]) -> Vec<&Person> {
        keys.iter().filter_map(|&key| self.persons.get(key)).collect()
    }

    /// JSON view keyed by task name: `ancestry` (ahnentafel number -> person)
    /// plus either `children` (list) or `descendancy` (spouse + children).
    pub fn to_view(&self) -> Value {
        let mut ancestry = Map::new();
        for (n, &key) in self.ancestry.iter() {
            if let Some(person) = self.persons.get(key) {
                ancestry.insert(n.to_string(), person_value(person));
            }
        }

        let mut view = Map::new();
        view.insert("person".to_string(), Value::String(self.root.clone()));
        view.insert("ancestry".to_string(), Value::Object(ancestry));

        let children: Vec<Value> = self.children().into_iter().map(person_value).collect();
        let descendants = match &self.descendants {
            Descendants::Children(_) => Value::Array(children),
            Descendants::Descendancy(_) => json!({
                "spouse": self.spouse().map(person_value),
                "children": children,
            }),
        };
        view.insert(self.descendants.mode().task_name().to_string(), descendants);

        Value::Object(view)
    }
}

fn person_value(person: &Person) -> Value {
    serde_json::to_value(person).unwrap_or(Value::Null)
}
