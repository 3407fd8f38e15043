//! Browser front-end.

use std::{cell::RefCell, rc::Rc};

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;

use crate::{
    app::{Effect, ErrorNotice, Message, Page},
    background,
    cfg::PlatformStore,
    logging,
    site::{self, CONFIG_PATH, ConfigError, Configuration},
};

mod dom;
mod panic_handler;

pub(crate) struct App {
    page: RefCell<Page<PlatformStore>>,
    mounts: RefCell<dom::Mounts>,
}

impl App {
    pub(crate) fn dispatch(self: &Rc<Self>, message: Message) {
        let effects = self.page.borrow_mut().update(message);
        self.render();
        for effect in effects {
            self.run(effect);
        }
    }

    fn render(&self) {
        let view = self.page.borrow().view();
        if let Err(e) = self.mounts.borrow_mut().apply(&view) {
            tracing::error!("failed to update page: {e:?}");
        }
    }

    fn run(self: &Rc<Self>, effect: Effect) {
        let app = Rc::clone(self);
        match effect {
            Effect::FetchBackground { api_url } => {
                wasm_bindgen_futures::spawn_local(async move {
                    let result = background::fetch(&api_url).await;
                    app.dispatch(Message::BackgroundLoaded(result));
                });
            }
            Effect::FadeInAfter(delay) => {
                let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
                wasm_bindgen_futures::spawn_local(async move {
                    TimeoutFuture::new(millis).await;
                    app.dispatch(Message::FadeInElapsed);
                });
            }
        }
    }
}

// Called when the WASM module is instantiated
#[wasm_bindgen(start)]
fn start() {
    panic_handler::init_panic_handler();
    logging::init(tracing::level_filters::LevelFilter::INFO);
    wasm_bindgen_futures::spawn_local(run());
}

async fn run() {
    let document = match dom::document() {
        Ok(d) => d,
        Err(e) => {
            tracing::error!("{e}");
            return;
        }
    };

    let config = match load_config().await {
        Ok(c) => c,
        Err(e) => {
            dom::show_error(&ErrorNotice::for_startup_failure(&e));
            return;
        }
    };

    let mounts = match dom::Mounts::bind(document) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("page markup is incomplete: {e}");
            return;
        }
    };

    let page = Page::new(config, PlatformStore, &mut rand::thread_rng());
    let app = Rc::new(App {
        page: RefCell::new(page),
        mounts: RefCell::new(mounts),
    });
    app.render();
    if let Err(e) = dom::wire(&app) {
        tracing::error!("failed to attach event listeners: {e:?}");
    }

    let effects = app.page.borrow_mut().start();
    app.render();
    for effect in effects {
        app.run(effect);
    }
}

async fn load_config() -> Result<Configuration, ConfigError> {
    let url = resolve_against_page(CONFIG_PATH)?;
    site::fetch(&url).await
}

/// HTTP clients need absolute URLs; resolve a path relative to the page.
fn resolve_against_page(path: &str) -> Result<String, ConfigError> {
    let href = web_sys::window()
        .ok_or_else(|| ConfigError::Fetch("no global `window`".into()))?
        .location()
        .href()
        .map_err(|e| ConfigError::Fetch(format!("{e:?}")))?;
    let url = web_sys::Url::new_with_base(path, &href)
        .map_err(|e| ConfigError::Fetch(format!("{e:?}")))?;
    Ok(url.href())
}
