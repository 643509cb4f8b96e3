// src/person/arena.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::person::Person;

/// Stable handle to a person stored in a [`PersonArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersonKey(usize);

impl PersonKey {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Single owner of every [`Person`] fetched for one request.
///
/// Indexes and the portrait queue refer to people by [`PersonKey`], so a
/// portrait attached through one key is visible through every structure
/// holding that key. People are deduplicated by id: inserting a person that
/// is already present merges the records and returns the existing key.
#[derive(Debug, Clone, Default)]
pub struct PersonArena {
    people: Vec<Person>,
    by_id: HashMap<String, PersonKey>,
}

/// Arena shared between the tasks of one workflow run.
pub type SharedArena = Arc<Mutex<PersonArena>>;

/// Lock a shared arena, recovering the data if a holder panicked.
pub fn lock_arena(arena: &SharedArena) -> MutexGuard<'_, PersonArena> {
    arena.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PersonArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedArena {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn insert(&mut self, person: Person) -> PersonKey {
        if let Some(&key) = self.by_id.get(&person.id) {
            self.people[key.0].absorb(person);
            return key;
        }

        let key = PersonKey(self.people.len());
        self.by_id.insert(person.id.clone(), key);
        self.people.push(person);
        key
    }

    /// Insert in order, returning one key per input record.
    pub fn insert_all(&mut self, persons: impl IntoIterator<Item = Person>) -> Vec<PersonKey> {
        persons.into_iter().map(|p| self.insert(p)).collect()
    }

    pub fn get(&self, key: PersonKey) -> Option<&Person> {
        self.people.get(key.0)
    }

    pub fn get_mut(&mut self, key: PersonKey) -> Option<&mut Person> {
        self.people.get_mut(key.0)
    }

    pub fn key_of(&self, id: &str) -> Option<PersonKey> {
        self.by_id.get(id).copied()
    }

    pub fn by_id(&self, id: &str) -> Option<&Person> {
        self.key_of(id).and_then(|key| self.get(key))
    }

    /// Attach a portrait URL; returns `false` for an unknown key.
    pub fn attach_portrait(&mut self, key: PersonKey, url: impl Into<String>) -> bool {
        match self.get_mut(key) {
            Some(person) => {
                person.attach_portrait(url);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}
