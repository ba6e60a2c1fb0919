//! Transcript navigator content script
//!
//! Wasm entry point injected into YouTube watch pages. Wires the page-wide key listener,
//! the mutation observer and the URL poll loop to the navigation engine.

#![cfg(target_arch = "wasm32")]

mod dom;
mod keyboard;
mod lifecycle;
mod logger;

use dom::DomPage;
use engine::{NavigatorConfig, PageLifecycleMonitor, ShortcutDispatcher};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

const EMBEDDED_CONFIG: &str = include_str!("../navigator.toml");

/// Everything the listeners and background tasks share.
pub struct ContentScript {
    page: DomPage,
    config: NavigatorConfig,
    shortcuts: ShortcutDispatcher,
    monitor: RefCell<PageLifecycleMonitor>,
}

impl ContentScript {
    fn new(page: DomPage, config: NavigatorConfig) -> Self {
        let shortcuts = ShortcutDispatcher::new(&config.keys);
        let monitor = RefCell::new(PageLifecycleMonitor::new(page.href()));
        Self { page, config, shortcuts, monitor }
    }
}

fn load_config() -> NavigatorConfig {
    match NavigatorConfig::from_toml_str(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(error) => {
            log::error!("{error}; falling back to built-in defaults");
            NavigatorConfig::default()
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    logger::init();

    let Some(page) = DomPage::new() else {
        log::warn!("no window or document, content script idle");
        return;
    };
    let script = Rc::new(ContentScript::new(page, load_config()));

    if let Err(error) = keyboard::install(script.clone()) {
        log::error!("failed to install key listener: {error:?}");
    }
    lifecycle::start(script);
}
