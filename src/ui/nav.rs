//! Collapsible primary navigation for narrow viewports.

use super::config::SiteConfig;
use super::Behavior;
use crate::page::{Key, Outcome, Page, PageEvent, Selector};

/// The nav toggle button and the panel it controls.
#[derive(Debug, Clone)]
pub struct NavToggle<E> {
    toggle: E,
    panel: E,
    open_class: String,
}

impl<E: Clone + PartialEq> NavToggle<E> {
    /// Mounts only when both the toggle and the panel are on the page.
    pub fn mount<P: Page<Element = E>>(page: &P, config: &SiteConfig) -> Option<Self> {
        let markup = &config.markup;
        Some(Self {
            toggle: page.element_by_id(&markup.nav_toggle_id)?,
            panel: page.element_by_id(&markup.nav_panel_id)?,
            open_class: markup.nav_open_class.clone(),
        })
    }

    pub fn is_open<P: Page<Element = E>>(&self, page: &P) -> bool {
        page.has_class(&self.panel, &self.open_class)
    }

    /// Flip the panel and mirror the result into `aria-expanded`.
    pub fn toggle<P: Page<Element = E>>(&self, page: &mut P) -> bool {
        let open = page.toggle_class(&self.panel, &self.open_class);
        page.set_attribute(&self.toggle, "aria-expanded", if open { "true" } else { "false" });
        open
    }

    pub fn close<P: Page<Element = E>>(&self, page: &mut P) {
        page.remove_class(&self.panel, &self.open_class);
        page.set_attribute(&self.toggle, "aria-expanded", "false");
    }
}

impl<P: Page> Behavior<P> for NavToggle<P::Element> {
    fn handle(&mut self, page: &mut P, event: &PageEvent<P::Element>) -> Outcome {
        match event {
            PageEvent::Click { target } => {
                if page.contains(&self.toggle, target) {
                    self.toggle(page);
                } else if page.contains(&self.panel, target)
                    && page.matches(target, &Selector::tag("a"))
                {
                    self.close(page);
                }
            }
            PageEvent::KeyDown {
                key: Key::Escape, ..
            } => self.close(page),
            _ => {}
        }
        Outcome::Proceed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{MemoryPage, NodeId};

    struct Fixture {
        page: MemoryPage,
        toggle: NodeId,
        panel: NodeId,
        link: NodeId,
    }

    fn fixture() -> Fixture {
        let mut page = MemoryPage::new();
        let body = page.body();
        let toggle = page.append(
            body,
            "button",
            &[("id", "navToggle"), ("aria-expanded", "false")],
        );
        let panel = page.append(body, "nav", &[("id", "primaryNav")]);
        let link = page.append(panel, "a", &[("href", "#about")]);
        Fixture {
            page,
            toggle,
            panel,
            link,
        }
    }

    #[test]
    fn test_mount_requires_both_elements() {
        let mut page = MemoryPage::new();
        let body = page.body();
        page.append(body, "button", &[("id", "navToggle")]);
        assert!(NavToggle::mount(&page, &SiteConfig::default()).is_none());
    }

    #[test]
    fn test_toggle_click_opens_and_closes() {
        let mut f = fixture();
        let mut nav = NavToggle::mount(&f.page, &SiteConfig::default()).expect("nav");

        nav.handle(&mut f.page, &PageEvent::Click { target: f.toggle });
        assert!(f.page.has_class(&f.panel, "open"));
        assert_eq!(
            f.page.attribute(&f.toggle, "aria-expanded").as_deref(),
            Some("true")
        );

        nav.handle(&mut f.page, &PageEvent::Click { target: f.toggle });
        assert!(!nav.is_open(&f.page));
        assert_eq!(
            f.page.attribute(&f.toggle, "aria-expanded").as_deref(),
            Some("false")
        );
    }

    #[test]
    fn test_link_click_closes_menu() {
        let mut f = fixture();
        let mut nav = NavToggle::mount(&f.page, &SiteConfig::default()).expect("nav");
        nav.toggle(&mut f.page);

        nav.handle(&mut f.page, &PageEvent::Click { target: f.link });
        assert!(!nav.is_open(&f.page));
    }

    #[test]
    fn test_click_on_panel_background_keeps_menu_open() {
        let mut f = fixture();
        let mut nav = NavToggle::mount(&f.page, &SiteConfig::default()).expect("nav");
        nav.toggle(&mut f.page);

        nav.handle(&mut f.page, &PageEvent::Click { target: f.panel });
        assert!(nav.is_open(&f.page));
    }

    #[test]
    fn test_escape_closes_and_is_idempotent() {
        let mut f = fixture();
        let mut nav = NavToggle::mount(&f.page, &SiteConfig::default()).expect("nav");
        nav.toggle(&mut f.page);

        let escape = PageEvent::KeyDown {
            key: Key::Escape,
            shift: false,
            target: f.page.body(),
        };
        nav.handle(&mut f.page, &escape);
        assert!(!nav.is_open(&f.page));

        nav.handle(&mut f.page, &escape);
        assert!(!nav.is_open(&f.page));
        assert_eq!(
            f.page.attribute(&f.toggle, "aria-expanded").as_deref(),
            Some("false")
        );
    }
}
