//! # Preference Store
//!
//! [`PreferenceStore`] is the seam between the theme controller and the
//! platform storage. The browser backend implements it on
//! `window.localStorage`; [`MemoryStore`] keeps entries in memory and is what
//! the tests use.

use anyhow::{bail, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Persistent string key/value storage.
pub trait PreferenceStore {
    /// Read a value. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store. Clones share the same entries, the way every script on
/// a page shares one `localStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `entries`.
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().extend(
            entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
        );
        store
    }

    /// A store that rejects writes, like storage with an exhausted quota.
    pub fn read_only(entries: &[(&str, &str)]) -> Self {
        Self {
            read_only: true,
            ..Self::with_entries(entries)
        }
    }

    /// Raw snapshot of an entry, bypassing the trait.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.peek(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.read_only {
            bail!("Preference storage is read-only, cannot write {key}");
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
