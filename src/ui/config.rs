//! # Site Configuration
//!
//! The markup contract between the page and the controllers: element ids,
//! class names, attribute names, the storage key, and the numeric
//! thresholds. Defaults match the portfolio page's markup, so most pages
//! need no configuration at all.
//!
//! ## Overriding
//!
//! A page can embed a JSON object in an element with id `folio-config`:
//!
//! ```text
//! <script type="application/json" id="folio-config">
//!   { "scroll_top_threshold": 400, "slideshow": { "autoplay_ms": 5000 } }
//! </script>
//! ```
//!
//! Missing fields keep their defaults; unknown fields are rejected.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Id of the element whose text holds the JSON configuration.
pub const CONFIG_ELEMENT_ID: &str = "folio-config";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Local-storage key holding the theme preference.
    pub storage_key: String,
    /// Attribute on the document root that carries the theme.
    pub theme_attribute: String,
    /// Scroll offset above which the scroll-to-top control is shown.
    pub scroll_top_threshold: f64,
    /// Visible fraction (0..=1) at which a reveal element is shown.
    pub reveal_threshold: f64,
    /// `tracing` filter directive used by the browser console logger.
    pub log_level: String,
    pub markup: Markup,
    pub slideshow: SlideshowConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme-preference".to_string(),
            theme_attribute: "data-theme".to_string(),
            scroll_top_threshold: 200.0,
            reveal_threshold: 0.15,
            log_level: "info".to_string(),
            markup: Markup::default(),
            slideshow: SlideshowConfig::default(),
        }
    }
}

/// Ids and class names the controllers look for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Markup {
    pub year_id: String,
    pub theme_toggle_id: String,
    pub nav_toggle_id: String,
    pub nav_panel_id: String,
    pub nav_open_class: String,
    pub modal_class: String,
    pub modal_open_attr: String,
    pub modal_close_attr: String,
    pub modal_backdrop_class: String,
    pub contact_form_id: String,
    pub name_field_id: String,
    pub email_field_id: String,
    pub message_field_id: String,
    /// Appended to a field id to find its error element (`name-error`).
    pub error_suffix: String,
    pub scroll_top_id: String,
    pub reveal_class: String,
    pub visible_class: String,
    pub slideshow_class: String,
    pub slideshow_container_class: String,
    pub slideshow_prev_class: String,
    pub slideshow_next_class: String,
    pub dot_class: String,
    pub active_class: String,
}

impl Default for Markup {
    fn default() -> Self {
        Self {
            year_id: "year".to_string(),
            theme_toggle_id: "themeToggle".to_string(),
            nav_toggle_id: "navToggle".to_string(),
            nav_panel_id: "primaryNav".to_string(),
            nav_open_class: "open".to_string(),
            modal_class: "modal".to_string(),
            modal_open_attr: "data-modal-open".to_string(),
            modal_close_attr: "data-modal-close".to_string(),
            modal_backdrop_class: "modal-backdrop".to_string(),
            contact_form_id: "contactForm".to_string(),
            name_field_id: "name".to_string(),
            email_field_id: "email".to_string(),
            message_field_id: "message".to_string(),
            error_suffix: "-error".to_string(),
            scroll_top_id: "scrollTop".to_string(),
            reveal_class: "reveal".to_string(),
            visible_class: "is-visible".to_string(),
            slideshow_class: "slideshow".to_string(),
            slideshow_container_class: "slideshow-container".to_string(),
            slideshow_prev_class: "slideshow-prev".to_string(),
            slideshow_next_class: "slideshow-next".to_string(),
            dot_class: "dot".to_string(),
            active_class: "active".to_string(),
        }
    }
}

/// Slideshow options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlideshowConfig {
    /// Advance every slideshow on this interval. Off when `None`.
    pub autoplay_ms: Option<u32>,
}

impl SiteConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).context("Failed to parse site configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Parse `json` when present, falling back to defaults (with a warning)
    /// when it is missing or invalid.
    pub fn load_from(json: Option<&str>) -> Self {
        let Some(json) = json.filter(|j| !j.trim().is_empty()) else {
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring site configuration: {e:#}");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            bail!(
                "reveal_threshold must be between 0 and 1, got {}",
                self.reveal_threshold
            );
        }
        if !self.scroll_top_threshold.is_finite() || self.scroll_top_threshold < 0.0 {
            bail!(
                "scroll_top_threshold must be a non-negative number, got {}",
                self.scroll_top_threshold
            );
        }
        if self.slideshow.autoplay_ms == Some(0) {
            bail!("slideshow.autoplay_ms must be greater than zero");
        }
        Ok(())
    }
}
