//! # Preference Storage
//!
//! A single string preference (the colour theme) survives reloads by living
//! in the browser's local key/value storage.
//!
//! ## Data Format
//!
//! ```text
//! theme-preference = "dark" | "light"     (absent when never toggled)
//! ```
//!
//! Values are stored raw, not JSON-encoded, so pages written before this
//! crate keep their saved preference.

mod storage;

pub use storage::{MemoryStore, PreferenceStore};
