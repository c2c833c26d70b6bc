//! # Browser Runtime
//!
//! Wires the portfolio behaviors to the live document. On start the site
//! configuration is read from the `folio-config` element, logging is routed
//! to the console, and once the document is parsed every behavior is
//! mounted and the DOM listeners are attached.
//!
//! Listeners share one [`Runtime`] through `Rc<RefCell<..>>`. The browser
//! delivers events one at a time, so a borrow conflict only happens when a
//! DOM call made by a behavior synchronously dispatches another event; that
//! nested event is dropped.

mod logging;
mod page;
mod storage;

pub use page::WebPage;
pub use storage::LocalStorage;

use crate::page::{Key, Outcome, PageEvent};
use crate::ui::config::CONFIG_ELEMENT_ID;
use crate::ui::reveal::reveal_ratio;
use crate::ui::{Portfolio, SiteConfig};
use anyhow::{anyhow, Context, Result};
use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::timers::callback::Interval;
use page::Observer;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, info};
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, Window,
};

struct Runtime {
    page: WebPage,
    app: Portfolio<WebPage>,
}

type Shared = Rc<RefCell<Option<Runtime>>>;

pub(crate) fn js_error(value: JsValue) -> anyhow::Error {
    match value.as_string() {
        Some(message) => anyhow!(message),
        None => anyhow!("{:?}", value),
    }
}

/// Module entry point, run by the wasm-bindgen glue once the module loads.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    boot().map_err(|err| JsValue::from_str(&format!("{err:#}")))
}

fn boot() -> Result<()> {
    let window = web_sys::window().context("No global window")?;
    let document = window.document().context("Window has no document")?;

    let raw = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content());
    let config = SiteConfig::load_from(raw.as_deref());
    logging::init(&config.log_level);

    if is_loading(&document) {
        debug!("Document still loading, deferring mount");
        let target = document.clone();
        EventListener::once(&target, "DOMContentLoaded", move |_| {
            if let Err(err) = mount(&window, &document, config) {
                error!("Failed to mount portfolio: {:#}", err);
            }
        })
        .forget();
        Ok(())
    } else {
        mount(&window, &document, config)
    }
}

fn is_loading(document: &Document) -> bool {
    document.ready_state() == "loading"
}

fn mount(window: &Window, document: &Document, config: SiteConfig) -> Result<()> {
    let shared: Shared = Rc::new(RefCell::new(None));

    let observer = intersection_observer(window, &shared, config.reveal_threshold)?;
    let mut page = WebPage::new(window.clone(), document.clone(), observer)?;
    let store = LocalStorage::from_window(window);
    let app = Portfolio::mount(&mut page, Box::new(store), config)?;
    let autoplay = app.autoplay_ms();
    *shared.borrow_mut() = Some(Runtime { page, app });

    listen(document, "click", false, &shared, |event| {
        target_element(event).map(|target| PageEvent::Click { target })
    });
    listen(document, "keydown", false, &shared, |event| {
        let keyboard = event.dyn_ref::<KeyboardEvent>()?;
        Some(PageEvent::KeyDown {
            key: Key::from_dom(&keyboard.key()),
            shift: keyboard.shift_key(),
            target: target_element(event)?,
        })
    });
    listen(document, "submit", false, &shared, |event| {
        target_element(event).map(|form| PageEvent::Submit { form })
    });
    let scroll_window = window.clone();
    listen(window, "scroll", true, &shared, move |_| {
        let offset = scroll_window.scroll_y().unwrap_or(0.0);
        Some(PageEvent::Scroll { offset })
    });

    if let Some(ms) = autoplay {
        let shared = shared.clone();
        Interval::new(ms, move || {
            dispatch(&shared, &PageEvent::Tick);
        })
        .forget();
        debug!("Slideshow autoplay every {}ms", ms);
    }

    info!("Portfolio ready");
    Ok(())
}

/// Attach a listener for the page lifetime. `translate` turns the DOM event
/// into a [`PageEvent`]; events it rejects are ignored.
fn listen<F>(
    target: &EventTarget,
    name: &'static str,
    passive: bool,
    shared: &Shared,
    translate: F,
)
where
    F: Fn(&Event) -> Option<PageEvent<Element>> + 'static,
{
    let shared = shared.clone();
    let options = EventListenerOptions {
        phase: EventListenerPhase::Bubble,
        passive,
    };
    EventListener::new_with_options(target, name, options, move |event| {
        let Some(page_event) = translate(event) else {
            return;
        };
        if dispatch(&shared, &page_event).is_prevented() {
            event.prevent_default();
        }
    })
    .forget();
}

fn dispatch(shared: &Shared, event: &PageEvent<Element>) -> Outcome {
    let Ok(mut slot) = shared.try_borrow_mut() else {
        debug!("Runtime busy, dropping {:?}", event);
        return Outcome::Proceed;
    };
    let Some(Runtime { page, app }) = slot.as_mut() else {
        return Outcome::Proceed;
    };
    app.handle(page, event)
}

fn target_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

/// Build the observer that feeds [`PageEvent::Intersection`], or `None` when
/// the browser has no `IntersectionObserver`.
fn intersection_observer(window: &Window, shared: &Shared, threshold: f64) -> Result<Option<Observer>> {
    let supported = js_sys::Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false);
    if !supported {
        info!("IntersectionObserver unavailable, revealing everything at once");
        return Ok(None);
    }

    let shared = shared.clone();
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let ratio = if entry.is_intersecting() {
                    let viewport = entry.root_bounds().map_or(0.0, |bounds| bounds.height());
                    reveal_ratio(
                        entry.intersection_ratio(),
                        entry.bounding_client_rect().height(),
                        viewport,
                        threshold,
                    )
                } else {
                    0.0
                };
                dispatch(
                    &shared,
                    &PageEvent::Intersection {
                        target: entry.target(),
                        ratio,
                    },
                );
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    let inner = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
        .map_err(js_error)
        .context("Failed to create IntersectionObserver")?;

    Ok(Some(Observer {
        inner,
        _callback: callback,
    }))
}
