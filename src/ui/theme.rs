//! # Theme System
//!
//! Light/dark theme persistence for the portfolio page.
//!
//! ## Overview
//!
//! The active theme lives in one attribute on the document root
//! (`data-theme` by default). CSS keys off that attribute; when it is absent
//! the page follows the system colour scheme. The [`ThemeController`] is the
//! only writer of the attribute and of the stored preference.
//!
//! ## Startup
//!
//! The stored preference, if any, is applied when the controller mounts.
//! Unrecognised stored values are ignored rather than copied into the DOM.

use super::config::SiteConfig;
use super::Behavior;
use crate::page::{Outcome, Page, PageEvent};
use crate::prefs::PreferenceStore;
use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// An explicitly chosen theme. "No preference" is `Option::<Theme>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn opposite(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// The theme a toggle switches to from `current`. With no (or an
    /// unrecognised) current theme the toggle goes dark.
    pub fn toggled_from(current: Option<Theme>) -> Theme {
        current.map_or(Theme::Dark, Theme::opposite)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(anyhow!("Unknown theme: {other:?}")),
        }
    }
}

/// Applies, toggles and persists the page theme.
pub struct ThemeController<E> {
    root: E,
    toggle: Option<E>,
    attribute: String,
    storage_key: String,
    store: Box<dyn PreferenceStore>,
}

impl<E: Clone + PartialEq + fmt::Debug> ThemeController<E> {
    /// Build the controller and apply the stored preference.
    pub fn mount<P: Page<Element = E>>(
        page: &mut P,
        store: Box<dyn PreferenceStore>,
        config: &SiteConfig,
    ) -> Self {
        let controller = Self {
            root: page.root(),
            toggle: page.element_by_id(&config.markup.theme_toggle_id),
            attribute: config.theme_attribute.clone(),
            storage_key: config.storage_key.clone(),
            store,
        };
        let stored = controller.stored();
        controller.apply(page, stored);
        controller
    }

    /// The persisted preference. Read errors and unknown values count as
    /// "no preference".
    pub fn stored(&self) -> Option<Theme> {
        match self.store.get(&self.storage_key) {
            Ok(Some(raw)) => match raw.parse() {
                Ok(theme) => Some(theme),
                Err(e) => {
                    debug!("Ignoring stored theme: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Could not read theme preference: {e:#}");
                None
            }
        }
    }

    /// The theme currently on the document root.
    pub fn current<P: Page<Element = E>>(&self, page: &P) -> Option<Theme> {
        page.attribute(&self.root, &self.attribute)
            .and_then(|v| v.parse().ok())
    }

    /// Put `theme` on the document root. `None` removes the attribute and
    /// leaves the toggle's pressed state alone.
    pub fn apply<P: Page<Element = E>>(&self, page: &mut P, theme: Option<Theme>) {
        let Some(theme) = theme else {
            page.remove_attribute(&self.root, &self.attribute);
            return;
        };
        page.set_attribute(&self.root, &self.attribute, theme.as_str());
        if let Some(toggle) = &self.toggle {
            let pressed = if theme == Theme::Dark { "true" } else { "false" };
            page.set_attribute(toggle, "aria-pressed", pressed);
        }
    }

    /// Switch between dark and light, apply and persist. Returns the new
    /// theme.
    pub fn toggle<P: Page<Element = E>>(&mut self, page: &mut P) -> Theme {
        let next = Theme::toggled_from(self.current(&*page));
        self.apply(page, Some(next));
        if let Err(e) = self.store.set(&self.storage_key, next.as_str()) {
            warn!("Could not persist theme preference: {e:#}");
        }
        debug!("Theme switched to {next}");
        next
    }
}

impl<P: Page> Behavior<P> for ThemeController<P::Element> {
    fn handle(&mut self, page: &mut P, event: &PageEvent<P::Element>) -> Outcome {
        if let PageEvent::Click { target } = event {
            let on_toggle = self
                .toggle
                .as_ref()
                .is_some_and(|toggle| page.contains(toggle, target));
            if on_toggle {
                self.toggle(page);
            }
        }
        Outcome::Proceed
    }
}
