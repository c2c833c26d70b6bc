use super::config::SiteConfig;
use super::form::ContactForm;
use super::modal::ModalManager;
use super::nav::NavToggle;
use super::reveal::RevealAnimator;
use super::scroll::{ScrollTop, SmoothScroll};
use super::slideshow::Slideshow;
use super::theme::ThemeController;
use super::Behavior;
use crate::page::{Outcome, Page, PageEvent};
use crate::prefs::PreferenceStore;
use anyhow::Result;
use chrono::Datelike;
use tracing::{debug, info};

/// Every behavior mounted on one page.
pub struct Portfolio<P: Page> {
    behaviors: Vec<Box<dyn Behavior<P>>>,
    config: SiteConfig,
}

impl<P: Page> Portfolio<P>
where
    P::Element: 'static,
{
    /// Mount everything present on `page`, stamping the current local year.
    pub fn mount(page: &mut P, store: Box<dyn PreferenceStore>, config: SiteConfig) -> Result<Self> {
        let year = chrono::Local::now().year();
        Self::mount_at_year(page, store, config, year)
    }

    /// Same as [`Portfolio::mount`] with an explicit year for the year stamp.
    pub fn mount_at_year(
        page: &mut P,
        store: Box<dyn PreferenceStore>,
        config: SiteConfig,
        year: i32,
    ) -> Result<Self> {
        stamp_year(page, &config, year);

        let mut behaviors: Vec<Box<dyn Behavior<P>>> = Vec::new();
        behaviors.push(Box::new(ThemeController::mount(page, store, &config)));
        if let Some(nav) = NavToggle::mount(&*page, &config) {
            behaviors.push(Box::new(nav));
        }
        behaviors.push(Box::new(SmoothScroll::new()));
        behaviors.push(Box::new(ModalManager::mount(&*page, &config)));
        if let Some(form) = ContactForm::mount(&*page, &config)? {
            behaviors.push(Box::new(form));
        }
        if let Some(button) = ScrollTop::mount(&*page, &config) {
            behaviors.push(Box::new(button));
        }
        behaviors.push(Box::new(RevealAnimator::mount(page, &config)));

        let slideshows = Slideshow::mount_all(page, &config);
        debug!("Mounted {} slideshows", slideshows.len());
        for slideshow in slideshows {
            behaviors.push(Box::new(slideshow));
        }

        info!("Portfolio mounted with {} behaviors", behaviors.len());
        Ok(Self { behaviors, config })
    }

    /// Deliver one event to every behavior. The default action is prevented
    /// if any of them asks for it.
    pub fn handle(&mut self, page: &mut P, event: &PageEvent<P::Element>) -> Outcome {
        self.behaviors
            .iter_mut()
            .fold(Outcome::Proceed, |outcome, behavior| {
                outcome.merge(behavior.handle(page, event))
            })
    }

    /// Interval for [`PageEvent::Tick`] delivery, when autoplay is on.
    pub fn autoplay_ms(&self) -> Option<u32> {
        self.config.slideshow.autoplay_ms
    }
}

/// Write `year` into the year-display element, if the page has one.
pub fn stamp_year<P: Page>(page: &mut P, config: &SiteConfig, year: i32) {
    if let Some(element) = page.element_by_id(&config.markup.year_id) {
        page.set_text(&element, &year.to_string());
    }
}
