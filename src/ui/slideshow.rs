//! # Slideshow
//!
//! Image carousels inside project cards. Every `.slideshow` on the page is
//! an independent [`Slideshow`] with its own current index.
//!
//! ## Markup
//!
//! ```text
//! <div class="slideshow">
//!   <div class="slideshow-container"> <img> <img> <img> </div>
//!   <button class="slideshow-prev"> <button class="slideshow-next">
//!   <span class="dot"> <span class="dot"> <span class="dot">
//! </div>
//! ```
//!
//! ## Navigation
//!
//! - prev/next buttons step one slide, wrapping at both ends
//! - dots jump straight to their slide
//! - Left/Right arrows step while focus is inside the slideshow
//! - an optional autoplay tick steps forward

use super::config::SiteConfig;
use super::Behavior;
use crate::page::{Key, Outcome, Page, PageEvent, Selector};
use tracing::debug;

/// A position in a fixed, non-empty ring of slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideIndex {
    current: usize,
    count: usize,
}

impl SlideIndex {
    /// Start at slide 0. `None` for an empty slideshow.
    pub fn new(count: usize) -> Option<Self> {
        (count > 0).then_some(Self { current: 0, count })
    }

    pub fn current(self) -> usize {
        self.current
    }

    pub fn count(self) -> usize {
        self.count
    }

    pub fn next(self) -> usize {
        (self.current + 1) % self.count
    }

    pub fn prev(self) -> usize {
        (self.current + self.count - 1) % self.count
    }

    /// Move to `index`. Out-of-range indexes are rejected.
    pub fn set(&mut self, index: usize) -> bool {
        if index >= self.count {
            return false;
        }
        self.current = index;
        true
    }
}

/// One slideshow instance.
#[derive(Debug, Clone)]
pub struct Slideshow<E> {
    root: E,
    images: Vec<E>,
    dots: Vec<E>,
    prev: Option<E>,
    next: Option<E>,
    index: SlideIndex,
    active_class: String,
}

impl<E: Clone + PartialEq + std::fmt::Debug> Slideshow<E> {
    /// Every slideshow on the page, each showing its first slide.
    pub fn mount_all<P: Page<Element = E>>(page: &mut P, config: &SiteConfig) -> Vec<Self> {
        page.query_all(None, &Selector::class(&config.markup.slideshow_class))
            .into_iter()
            .filter_map(|root| Self::mount(page, root, config))
            .collect()
    }

    /// Mount the slideshow rooted at `root`. Skipped when it has no image
    /// container or no images.
    pub fn mount<P: Page<Element = E>>(page: &mut P, root: E, config: &SiteConfig) -> Option<Self> {
        let markup = &config.markup;
        let Some(container) =
            page.query(Some(&root), &Selector::class(&markup.slideshow_container_class))
        else {
            debug!("Slideshow {root:?} has no image container");
            return None;
        };
        let images = page.query_all(Some(&container), &Selector::tag("img"));
        let index = SlideIndex::new(images.len())?;
        let dots = page.query_all(Some(&root), &Selector::class(&markup.dot_class));
        let prev = page.query(Some(&root), &Selector::class(&markup.slideshow_prev_class));
        let next = page.query(Some(&root), &Selector::class(&markup.slideshow_next_class));
        let mut slideshow = Self {
            root,
            images,
            dots,
            prev,
            next,
            index,
            active_class: markup.active_class.clone(),
        };
        slideshow.show(page, 0);
        debug!("Slideshow {:?} has {} slides", slideshow.root, slideshow.slide_count());
        Some(slideshow)
    }

    pub fn current(&self) -> usize {
        self.index.current()
    }

    pub fn slide_count(&self) -> usize {
        self.index.count()
    }

    /// Make slide `index` (and its dot) the only active one.
    pub fn show<P: Page<Element = E>>(&mut self, page: &mut P, index: usize) {
        if !self.index.set(index) {
            return;
        }
        for (i, image) in self.images.iter().enumerate() {
            page.set_class(image, &self.active_class, i == index);
        }
        for (i, dot) in self.dots.iter().enumerate() {
            page.set_class(dot, &self.active_class, i == index);
        }
    }

    pub fn next_slide<P: Page<Element = E>>(&mut self, page: &mut P) {
        let next = self.index.next();
        self.show(page, next);
    }

    pub fn prev_slide<P: Page<Element = E>>(&mut self, page: &mut P) {
        let prev = self.index.prev();
        self.show(page, prev);
    }

    fn on_click<P: Page<Element = E>>(&mut self, page: &mut P, target: &E) {
        let hit = |control: &Option<E>| control.as_ref().is_some_and(|c| page.contains(c, target));
        let on_next = hit(&self.next);
        let on_prev = hit(&self.prev);
        let dot = self.dots.iter().position(|d| page.contains(d, target));

        if on_next {
            self.next_slide(page);
        } else if on_prev {
            self.prev_slide(page);
        } else if let Some(dot) = dot {
            self.show(page, dot);
        }
    }
}

impl<P: Page> Behavior<P> for Slideshow<P::Element> {
    fn handle(&mut self, page: &mut P, event: &PageEvent<P::Element>) -> Outcome {
        match event {
            PageEvent::Click { target } => self.on_click(page, target),
            PageEvent::KeyDown { key, target, .. } if page.contains(&self.root, target) => {
                match key {
                    Key::ArrowLeft => self.prev_slide(page),
                    Key::ArrowRight => self.next_slide(page),
                    _ => {}
                }
            }
            PageEvent::Tick => self.next_slide(page),
            _ => {}
        }
        Outcome::Proceed
    }
}
