//! # UI Module
//!
//! The behaviors layered on top of the static portfolio markup.
//!
//! ## Components
//!
//! - [`Portfolio`] - mounts every component present on the page and fans
//!   events out to them
//! - [`theme::ThemeController`] - dark/light theme with persistence
//! - [`nav::NavToggle`] - collapsible navigation panel
//! - [`scroll::SmoothScroll`] / [`scroll::ScrollTop`] - anchor scrolling and
//!   the back-to-top button
//! - [`modal::ModalManager`] - dialogs with focus trapping
//! - [`form::ContactForm`] - contact form validation
//! - [`reveal::RevealAnimator`] - one-shot reveal on scroll
//! - [`slideshow::Slideshow`] - image carousels
//!
//! Components share no state. Each is mounted once, only when its markup is
//! present, and afterwards only sees [`PageEvent`]s.

pub mod app;
pub mod config;
pub mod form;
pub mod modal;
pub mod nav;
pub mod reveal;
pub mod scroll;
pub mod slideshow;
pub mod theme;

pub use app::Portfolio;
pub use config::SiteConfig;

use crate::page::{Outcome, Page, PageEvent};

/// A mounted component that reacts to page events.
pub trait Behavior<P: Page> {
    /// Handle one event. Return [`Outcome::PreventDefault`] to cancel the
    /// platform's default action for it.
    fn handle(&mut self, page: &mut P, event: &PageEvent<P::Element>) -> Outcome;
}
