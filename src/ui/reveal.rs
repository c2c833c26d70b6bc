//! One-shot reveal-on-scroll animation.
//!
//! Elements flagged with the reveal class get the visible class the first
//! time enough of them enters the viewport, and are unobserved right away so
//! they are never revealed twice. Without intersection support every
//! element is revealed at mount.

use super::config::SiteConfig;
use super::Behavior;
use crate::page::{Outcome, Page, PageEvent, Selector};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RevealAnimator<E> {
    pending: Vec<E>,
    threshold: f64,
    visible_class: String,
}

impl<E: Clone + PartialEq> RevealAnimator<E> {
    pub fn mount<P: Page<Element = E>>(page: &mut P, config: &SiteConfig) -> Self {
        let markup = &config.markup;
        let candidates = page.query_all(None, &Selector::class(&markup.reveal_class));
        let mut animator = Self {
            pending: Vec::new(),
            threshold: config.reveal_threshold,
            visible_class: markup.visible_class.clone(),
        };
        if page.supports_intersection() {
            for element in &candidates {
                page.observe(element);
            }
            animator.pending = candidates;
        } else {
            debug!("No intersection support, revealing {} elements", candidates.len());
            for element in &candidates {
                page.add_class(element, &animator.visible_class);
            }
        }
        animator
    }

    /// Elements still waiting to be revealed.
    pub fn pending(&self) -> &[E] {
        &self.pending
    }

    /// React to an intersection report. Returns whether `target` was revealed
    /// by this call.
    pub fn intersect<P: Page<Element = E>>(&mut self, page: &mut P, target: &E, ratio: f64) -> bool {
        if ratio < self.threshold {
            return false;
        }
        let Some(index) = self.pending.iter().position(|el| el == target) else {
            return false;
        };
        let element = self.pending.swap_remove(index);
        page.add_class(&element, &self.visible_class);
        page.unobserve(&element);
        true
    }
}

/// The intersection ratio the reveal rule should see. An element so tall
/// that `threshold` of it never fits in the viewport at once counts as fully
/// visible as soon as any of it is on screen; otherwise `ratio` is returned
/// unchanged.
pub fn reveal_ratio(ratio: f64, target_height: f64, viewport_height: f64, threshold: f64) -> f64 {
    if ratio <= 0.0 || target_height <= 0.0 || viewport_height <= 0.0 {
        return ratio;
    }
    if viewport_height / target_height < threshold {
        1.0
    } else {
        ratio
    }
}

impl<P: Page> Behavior<P> for RevealAnimator<P::Element> {
    fn handle(&mut self, page: &mut P, event: &PageEvent<P::Element>) -> Outcome {
        if let PageEvent::Intersection { target, ratio } = event {
            self.intersect(page, target, *ratio);
        }
        Outcome::Proceed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::MemoryPage;

    #[test]
    fn test_mount_observes_candidates() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let a = page.append(body, "section", &[("class", "reveal")]);
        let b = page.append(body, "section", &[("class", "reveal card")]);
        page.append(body, "section", &[]);

        let animator = RevealAnimator::mount(&mut page, &SiteConfig::default());
        assert_eq!(animator.pending(), &[a, b]);
        assert!(page.is_observed(a));
        assert!(!page.has_class(&a, "is-visible"));
    }

    #[test]
    fn test_reveal_at_threshold_then_unobserve() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let section = page.append(body, "section", &[("class", "reveal")]);
        let mut animator = RevealAnimator::mount(&mut page, &SiteConfig::default());

        animator.handle(&mut page, &PageEvent::Intersection { target: section, ratio: 0.1 });
        assert!(!page.has_class(&section, "is-visible"));

        animator.handle(&mut page, &PageEvent::Intersection { target: section, ratio: 0.15 });
        assert!(page.has_class(&section, "is-visible"));
        assert!(!page.is_observed(section));
        assert!(animator.pending().is_empty());
    }

    #[test]
    fn test_reveal_happens_once() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let section = page.append(body, "section", &[("class", "reveal")]);
        let mut animator = RevealAnimator::mount(&mut page, &SiteConfig::default());

        assert!(animator.intersect(&mut page, &section, 1.0));
        page.remove_class(&section, "is-visible");
        assert!(!animator.intersect(&mut page, &section, 1.0));
        assert!(!page.has_class(&section, "is-visible"));
    }

    #[test]
    fn test_reveal_ratio_for_tall_elements() {
        // Ten viewports tall: at most 10% can ever be on screen
        assert_eq!(reveal_ratio(0.01, 8000.0, 800.0, 0.15), 1.0);
        assert_eq!(reveal_ratio(0.0, 8000.0, 800.0, 0.15), 0.0);
        // Short enough to reach the threshold: left alone
        assert_eq!(reveal_ratio(0.05, 1000.0, 800.0, 0.15), 0.05);
        assert_eq!(reveal_ratio(0.3, 0.0, 800.0, 0.15), 0.3);
    }

    #[test]
    fn test_tall_element_revealed_on_entry() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let section = page.append(body, "section", &[("class", "reveal")]);
        let config = SiteConfig::default();
        let mut animator = RevealAnimator::mount(&mut page, &config);

        let ratio = reveal_ratio(0.02, 10_000.0, 900.0, config.reveal_threshold);
        assert!(animator.intersect(&mut page, &section, ratio));
        assert!(page.has_class(&section, "is-visible"));
    }

    #[test]
    fn test_without_intersection_support_reveals_immediately() {
        let mut page = MemoryPage::without_intersection();
        let body = page.body();
        let section = page.append(body, "section", &[("class", "reveal")]);

        let animator = RevealAnimator::mount(&mut page, &SiteConfig::default());
        assert!(page.has_class(&section, "is-visible"));
        assert!(!page.is_observed(section));
        assert!(animator.pending().is_empty());
    }
}
