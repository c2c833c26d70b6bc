//! `window.localStorage` as a [`PreferenceStore`].

use super::js_error;
use crate::prefs::PreferenceStore;
use anyhow::{Context, Result};
use web_sys::{Storage, Window};

/// Local storage, or nothing when the browser denies access (some privacy
/// modes). Reads then report "no preference" and writes fail.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn from_window(window: &Window) -> Self {
        Self {
            storage: window.local_storage().ok().flatten(),
        }
    }
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(storage) = &self.storage else {
            return Ok(None);
        };
        storage
            .get_item(key)
            .map_err(js_error)
            .with_context(|| format!("Failed to read local storage key {key}"))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let storage = self
            .storage
            .as_ref()
            .context("Local storage is not available")?;
        storage
            .set_item(key, value)
            .map_err(js_error)
            .with_context(|| format!("Failed to write local storage key {key}"))
    }
}
