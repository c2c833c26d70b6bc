//! Folio - accessible client-side behavior for a static portfolio page
//!
//! This library provides the interactive layer of the page: theme
//! persistence, the mobile navigation menu, smooth in-page scrolling, modal
//! dialogs with focus trapping, contact form validation, the scroll-to-top
//! button, reveal-on-scroll, and image slideshows.
//!
//! The behaviors are written against the [`page::Page`] abstraction so they
//! run unchanged in the browser (the `web` module, wasm32 only) and in tests
//! (the in-memory [`page::MemoryPage`]).

pub mod page;
pub mod prefs;
pub mod ui;

#[cfg(target_arch = "wasm32")]
pub mod web;
