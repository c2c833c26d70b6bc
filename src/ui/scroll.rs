//! In-page anchor scrolling and the scroll-to-top button.

use super::config::SiteConfig;
use super::Behavior;
use crate::page::{Outcome, Page, PageEvent, Selector};
use tracing::trace;

/// Smooth scrolling for same-page `#fragment` links.
///
/// Clicks on (or inside) such a link are taken over only when the fragment
/// names an element on the page; otherwise the browser handles them.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    link: Selector,
}

impl Default for SmoothScroll {
    fn default() -> Self {
        Self {
            link: Selector::All(vec![Selector::tag("a"), Selector::attr_prefix("href", "#")]),
        }
    }
}

impl SmoothScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scroll to the section a clicked link points at. Returns whether the
    /// click was taken over.
    pub fn follow<P: Page>(&self, page: &mut P, target: &P::Element) -> bool {
        let Some(link) = page.closest(target, &self.link) else {
            return false;
        };
        let Some(section) = page
            .attribute(&link, "href")
            .and_then(|href| fragment_id(&href).map(str::to_string))
            .and_then(|id| page.element_by_id(&id))
        else {
            return false;
        };
        trace!("Scrolling to {section:?}");
        page.scroll_into_view(&section);
        page.focus(&section, true);
        true
    }
}

/// The element id named by an in-page `href`, if any. Bare `#` names
/// nothing.
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

impl<P: Page> Behavior<P> for SmoothScroll {
    fn handle(&mut self, page: &mut P, event: &PageEvent<P::Element>) -> Outcome {
        if let PageEvent::Click { target } = event {
            if self.follow(page, target) {
                return Outcome::PreventDefault;
            }
        }
        Outcome::Proceed
    }
}

/// Shows a "back to top" button once the page has scrolled past a threshold.
#[derive(Debug, Clone)]
pub struct ScrollTop<E> {
    button: E,
    threshold: f64,
}

impl<E: Clone + PartialEq> ScrollTop<E> {
    pub fn mount<P: Page<Element = E>>(page: &P, config: &SiteConfig) -> Option<Self> {
        Some(Self {
            button: page.element_by_id(&config.markup.scroll_top_id)?,
            threshold: config.scroll_top_threshold,
        })
    }

    /// Visible strictly above the threshold.
    pub fn should_show(&self, offset: f64) -> bool {
        offset > self.threshold
    }

    pub fn sync<P: Page<Element = E>>(&self, page: &mut P, offset: f64) {
        page.set_hidden(&self.button, !self.should_show(offset));
    }
}

impl<P: Page> Behavior<P> for ScrollTop<P::Element> {
    fn handle(&mut self, page: &mut P, event: &PageEvent<P::Element>) -> Outcome {
        match event {
            PageEvent::Scroll { offset } => self.sync(page, *offset),
            PageEvent::Click { target } if page.contains(&self.button, target) => {
                page.scroll_to_top();
            }
            _ => {}
        }
        Outcome::Proceed
    }
}
