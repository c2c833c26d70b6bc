//! # Modal Dialogs
//!
//! Project-detail dialogs that open from trigger buttons and keep keyboard
//! focus inside while visible.
//!
//! ## Markup
//!
//! ```text
//! <button data-modal-open="project-1">Details</button>
//! <div class="modal" id="project-1" hidden>
//!   <div class="modal-backdrop"></div>
//!   <div role="document"> ... <button data-modal-close>Close</button> </div>
//! </div>
//! ```
//!
//! ## Focus handling
//!
//! Each modal remembers the element that had focus right before it opened
//! and hands focus back on close. While open, Tab and Shift+Tab wrap around
//! the modal's focusable elements (see [`FocusTrap`]). The focusable set is
//! recomputed on every open since dialog content may change.

use super::config::SiteConfig;
use super::Behavior;
use crate::page::{Key, Outcome, Page, PageEvent, Selector};
use tracing::debug;

const INTERACTIVE_TAGS: [&str; 5] = ["a", "button", "input", "textarea", "select"];

/// Circular Tab order over a modal's focusable elements.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusTrap<E> {
    first: E,
    last: E,
}

impl<E: Clone + PartialEq> FocusTrap<E> {
    /// `None` when there is nothing to trap.
    pub fn new(focusables: &[E]) -> Option<Self> {
        Some(Self {
            first: focusables.first()?.clone(),
            last: focusables.last()?.clone(),
        })
    }

    /// Where focus must jump for a Tab press, or `None` to let the browser
    /// move it natively.
    pub fn redirect(&self, active: Option<&E>, shift: bool) -> Option<&E> {
        match (shift, active) {
            (true, Some(el)) if *el == self.first => Some(&self.last),
            (false, Some(el)) if *el == self.last => Some(&self.first),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Modal<E> {
    element: E,
    restore_to: Option<E>,
    trap: Option<FocusTrap<E>>,
}

/// Opens, closes and focus-traps every modal on the page.
#[derive(Debug, Clone)]
pub struct ModalManager<E> {
    modals: Vec<Modal<E>>,
    modal: Selector,
    open_trigger: Selector,
    close_trigger: Selector,
    backdrop: Selector,
    open_attr: String,
}

impl<E: Clone + PartialEq + std::fmt::Debug> ModalManager<E> {
    pub fn mount<P: Page<Element = E>>(page: &P, config: &SiteConfig) -> Self {
        let markup = &config.markup;
        let modal = Selector::class(&markup.modal_class);
        let modals = page
            .query_all(None, &modal)
            .into_iter()
            .map(|element| Modal {
                element,
                restore_to: None,
                trap: None,
            })
            .collect();
        Self {
            modals,
            modal,
            open_trigger: Selector::attr(&markup.modal_open_attr),
            close_trigger: Selector::attr(&markup.modal_close_attr),
            backdrop: Selector::class(&markup.modal_backdrop_class),
            open_attr: markup.modal_open_attr.clone(),
        }
    }

    /// Show the modal with this id. Unknown ids are ignored.
    pub fn open<P: Page<Element = E>>(&mut self, page: &mut P, id: &str) -> bool {
        let Some(element) = page.element_by_id(id) else {
            debug!("No modal with id {id:?}");
            return false;
        };
        let was_hidden = page.is_hidden(&element);
        let active = page.active_element();

        let document = page.query(Some(&element), &Selector::attr_eq("role", "document"));
        let focusables = focusable_descendants(&*page, &element);

        let index = self.record_for(&element);
        let modal = &mut self.modals[index];
        if was_hidden {
            modal.restore_to = active;
        }
        modal.trap = FocusTrap::new(&focusables);

        page.set_hidden(&element, false);
        match &document {
            Some(region) => {
                page.set_attribute(region, "tabindex", "-1");
                page.focus(region, false);
            }
            None => {
                page.focus(&element, false);
            }
        }
        debug!("Opened modal {id:?} with {} focusable elements", focusables.len());
        true
    }

    /// Hide `element` and hand focus back to whatever had it before.
    pub fn close<P: Page<Element = E>>(&mut self, page: &mut P, element: &E) {
        page.set_hidden(element, true);
        let index = self.record_for(element);
        let modal = &mut self.modals[index];
        modal.trap = None;
        if let Some(previous) = modal.restore_to.take() {
            page.focus(&previous, false);
        }
    }

    /// Close every modal that is currently visible.
    pub fn close_all<P: Page<Element = E>>(&mut self, page: &mut P) {
        let visible: Vec<E> = self
            .modals
            .iter()
            .filter(|m| !page.is_hidden(&m.element))
            .map(|m| m.element.clone())
            .collect();
        for element in &visible {
            self.close(page, element);
        }
    }

    pub fn is_open<P: Page<Element = E>>(&self, page: &P, id: &str) -> bool {
        page.element_by_id(id)
            .is_some_and(|element| !page.is_hidden(&element))
    }

    /// Whether the modal currently has a Tab trap installed.
    pub fn is_trapping(&self, element: &E) -> bool {
        self.modals
            .iter()
            .any(|m| m.element == *element && m.trap.is_some())
    }

    fn record_for(&mut self, element: &E) -> usize {
        if let Some(index) = self.modals.iter().position(|m| m.element == *element) {
            return index;
        }
        self.modals.push(Modal {
            element: element.clone(),
            restore_to: None,
            trap: None,
        });
        self.modals.len() - 1
    }

    fn on_click<P: Page<Element = E>>(&mut self, page: &mut P, target: &E) {
        if let Some(trigger) = page.closest(target, &self.open_trigger) {
            if let Some(id) = page
                .attribute(&trigger, &self.open_attr)
                .filter(|id| !id.is_empty())
            {
                self.open(page, &id);
            }
        }

        let dismiss = page.closest(target, &self.close_trigger).is_some()
            || page.matches(target, &self.backdrop);
        if dismiss {
            if let Some(modal) = page.closest(target, &self.modal) {
                self.close(page, &modal);
            }
        }
    }

    fn on_tab<P: Page<Element = E>>(&self, page: &mut P, target: &E, shift: bool) -> Outcome {
        let active = page.active_element();
        let destination = self
            .modals
            .iter()
            .filter(|m| page.contains(&m.element, target))
            .find_map(|m| m.trap.as_ref()?.redirect(active.as_ref(), shift).cloned());
        match destination {
            Some(element) => {
                page.focus(&element, false);
                Outcome::PreventDefault
            }
            None => Outcome::Proceed,
        }
    }
}

/// Interactive descendants and anything whose `tabindex` is not `-1`,
/// minus disabled elements, in document order.
pub fn focusable_descendants<P: Page>(page: &P, scope: &P::Element) -> Vec<P::Element> {
    let interactive = Selector::AnyOf(INTERACTIVE_TAGS.iter().map(|t| Selector::tag(*t)).collect());
    let candidates = Selector::AnyOf(vec![interactive.clone(), Selector::attr("tabindex")]);
    page.query_all(Some(scope), &candidates)
        .into_iter()
        .filter(|el| !page.has_attribute(el, "disabled"))
        .filter(|el| {
            page.matches(el, &interactive) || page.attribute(el, "tabindex").as_deref() != Some("-1")
        })
        .collect()
}

impl<P: Page> Behavior<P> for ModalManager<P::Element> {
    fn handle(&mut self, page: &mut P, event: &PageEvent<P::Element>) -> Outcome {
        match event {
            PageEvent::Click { target } => {
                self.on_click(page, target);
                Outcome::Proceed
            }
            PageEvent::KeyDown {
                key: Key::Escape, ..
            } => {
                self.close_all(page);
                Outcome::Proceed
            }
            PageEvent::KeyDown {
                key: Key::Tab,
                shift,
                target,
            } => self.on_tab(page, target, *shift),
            _ => Outcome::Proceed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{MemoryPage, NodeId};

    struct Fixture {
        page: MemoryPage,
        opener: NodeId,
        modal: NodeId,
        document: NodeId,
        backdrop: NodeId,
        close: NodeId,
        link: NodeId,
        submit: NodeId,
    }

    fn fixture() -> Fixture {
        let mut page = MemoryPage::new();
        let body = page.body();
        let opener = page.append(body, "button", &[("data-modal-open", "project-1")]);
        let modal = page.append(
            body,
            "div",
            &[("class", "modal"), ("id", "project-1"), ("hidden", "")],
        );
        let backdrop = page.append(modal, "div", &[("class", "modal-backdrop")]);
        let document = page.append(modal, "div", &[("role", "document")]);
        let close = page.append(document, "button", &[("data-modal-close", "")]);
        let link = page.append(document, "a", &[("href", "https://example.com")]);
        page.append(document, "button", &[("disabled", "")]);
        let submit = page.append(document, "button", &[]);
        Fixture {
            page,
            opener,
            modal,
            document,
            backdrop,
            close,
            link,
            submit,
        }
    }

    fn tab(target: NodeId, shift: bool) -> PageEvent<NodeId> {
        PageEvent::KeyDown {
            key: Key::Tab,
            shift,
            target,
        }
    }

    #[test]
    fn test_focus_trap_redirect() {
        let trap = FocusTrap::new(&[1, 2, 3]).expect("trap");
        assert_eq!(trap.redirect(Some(&3), false), Some(&1));
        assert_eq!(trap.redirect(Some(&1), true), Some(&3));
        assert_eq!(trap.redirect(Some(&2), false), None);
        assert_eq!(trap.redirect(Some(&2), true), None);
        assert_eq!(trap.redirect(None, false), None);
    }

    #[test]
    fn test_focus_trap_empty() {
        assert!(FocusTrap::<u8>::new(&[]).is_none());
    }

    #[test]
    fn test_focusable_descendants_skip_disabled_and_negative_tabindex() {
        let mut f = fixture();
        let extra = f.page.append(f.document, "div", &[("tabindex", "0")]);
        f.page.set_attribute(&f.document, "tabindex", "-1");

        let found = focusable_descendants(&f.page, &f.modal);
        assert_eq!(found, vec![f.close, f.link, f.submit, extra]);
    }

    #[test]
    fn test_open_focuses_document_region() {
        let mut f = fixture();
        let mut manager = ModalManager::mount(&f.page, &SiteConfig::default());
        f.page.focus(&f.opener, false);

        manager.handle(&mut f.page, &PageEvent::Click { target: f.opener });

        assert!(manager.is_open(&f.page, "project-1"));
        assert_eq!(
            f.page.attribute(&f.document, "tabindex").as_deref(),
            Some("-1")
        );
        assert_eq!(f.page.active_element(), Some(f.document));
        assert!(manager.is_trapping(&f.modal));
    }

    #[test]
    fn test_open_unknown_id_is_noop() {
        let mut f = fixture();
        let mut manager = ModalManager::mount(&f.page, &SiteConfig::default());
        assert!(!manager.open(&mut f.page, "missing"));
        assert!(f.page.is_hidden(&f.modal));
    }

    #[test]
    fn test_tab_wraps_inside_modal() {
        let mut f = fixture();
        let mut manager = ModalManager::mount(&f.page, &SiteConfig::default());
        manager.open(&mut f.page, "project-1");

        f.page.focus(&f.submit, false);
        let outcome = manager.handle(&mut f.page, &tab(f.submit, false));
        assert_eq!(outcome, Outcome::PreventDefault);
        assert_eq!(f.page.active_element(), Some(f.close));

        let outcome = manager.handle(&mut f.page, &tab(f.close, true));
        assert_eq!(outcome, Outcome::PreventDefault);
        assert_eq!(f.page.active_element(), Some(f.submit));

        f.page.focus(&f.link, false);
        let outcome = manager.handle(&mut f.page, &tab(f.link, false));
        assert_eq!(outcome, Outcome::Proceed);
        assert_eq!(f.page.active_element(), Some(f.link));
    }

    #[test]
    fn test_modal_without_focusables_has_no_trap() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let modal = page.append(body, "div", &[("class", "modal"), ("id", "empty"), ("hidden", "")]);
        let text = page.append(modal, "p", &[]);
        let mut manager = ModalManager::mount(&page, &SiteConfig::default());

        manager.open(&mut page, "empty");
        assert!(!manager.is_trapping(&modal));
        let outcome = manager.handle(&mut page, &tab(text, false));
        assert_eq!(outcome, Outcome::Proceed);
    }

    #[test]
    fn test_close_button_restores_focus() {
        let mut f = fixture();
        let mut manager = ModalManager::mount(&f.page, &SiteConfig::default());
        f.page.focus(&f.opener, false);
        manager.handle(&mut f.page, &PageEvent::Click { target: f.opener });

        manager.handle(&mut f.page, &PageEvent::Click { target: f.close });

        assert!(f.page.is_hidden(&f.modal));
        assert_eq!(f.page.active_element(), Some(f.opener));
        assert!(!manager.is_trapping(&f.modal));
    }

    #[test]
    fn test_backdrop_click_closes() {
        let mut f = fixture();
        let mut manager = ModalManager::mount(&f.page, &SiteConfig::default());
        manager.open(&mut f.page, "project-1");

        manager.handle(&mut f.page, &PageEvent::Click { target: f.backdrop });
        assert!(f.page.is_hidden(&f.modal));
    }

    #[test]
    fn test_click_inside_document_keeps_modal_open() {
        let mut f = fixture();
        let mut manager = ModalManager::mount(&f.page, &SiteConfig::default());
        manager.open(&mut f.page, "project-1");

        manager.handle(&mut f.page, &PageEvent::Click { target: f.document });
        assert!(!f.page.is_hidden(&f.modal));
    }

    #[test]
    fn test_escape_closes_every_visible_modal() {
        let mut f = fixture();
        let body = f.page.body();
        let second = f.page.append(
            body,
            "div",
            &[("class", "modal"), ("id", "project-2"), ("hidden", "")],
        );
        let mut manager = ModalManager::mount(&f.page, &SiteConfig::default());
        f.page.focus(&f.opener, false);
        manager.open(&mut f.page, "project-1");
        manager.open(&mut f.page, "project-2");

        let escape = PageEvent::KeyDown {
            key: Key::Escape,
            shift: false,
            target: body,
        };
        manager.handle(&mut f.page, &escape);

        assert!(f.page.is_hidden(&f.modal));
        assert!(f.page.is_hidden(&second));
        // The second modal's saved target sits inside the first, now hidden
        assert_eq!(f.page.active_element(), Some(f.opener));
    }

    #[test]
    fn test_reopen_keeps_original_restore_target() {
        let mut f = fixture();
        let mut manager = ModalManager::mount(&f.page, &SiteConfig::default());
        f.page.focus(&f.opener, false);
        manager.open(&mut f.page, "project-1");
        manager.open(&mut f.page, "project-1");

        manager.close(&mut f.page, &f.modal);
        assert_eq!(f.page.active_element(), Some(f.opener));
    }
}
