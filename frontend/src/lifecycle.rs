//! Lifecycle wiring: initial load, DOM mutations and URL polling.
//!
//! The engine's [`PageLifecycleMonitor`](engine::PageLifecycleMonitor) decides what to do;
//! this module only feeds it events and spawns the resulting async passes. Monitor
//! borrows never cross an `.await`.

use crate::ContentScript;
use engine::lifecycle::{initialize, self_check};
use engine::MutationResponse;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{DocumentReadyState, MutationObserver, MutationObserverInit, MutationRecord};
use zoon::{Task, Timer};

pub fn start(script: Rc<ContentScript>) {
    if let Err(error) = observe_mutations(script.clone()) {
        log::warn!("mutation observer unavailable: {error:?}");
    }
    Task::start(poll_url(script.clone()));

    if script.page.document().ready_state() == DocumentReadyState::Loading {
        let document = script.page.document().clone();
        let loaded_closure = Closure::once(move || {
            Task::start(run_initialization(script));
        });
        if let Err(error) =
            document.add_event_listener_with_callback("DOMContentLoaded", loaded_closure.as_ref().unchecked_ref())
        {
            log::warn!("could not wait for DOMContentLoaded: {error:?}");
        }
        loaded_closure.forget();
    } else {
        Task::start(run_initialization(script));
    }
}

async fn run_initialization(script: Rc<ContentScript>) {
    if !script.monitor.borrow_mut().begin_initialization() {
        log::debug!("initialization already running");
        return;
    }
    let href = script.page.href();
    let outcome = initialize(&script.page, &script.config).await;
    log::debug!("initialization pass for {href}: {outcome:?}");
    script.monitor.borrow_mut().finish_initialization(&href, &outcome);
}

async fn poll_url(script: Rc<ContentScript>) {
    loop {
        Timer::sleep(script.config.timing.url_poll_ms).await;
        let href = script.page.href();
        let changed = script.monitor.borrow_mut().url_changed(&href);
        if changed {
            let script = script.clone();
            Task::start(async move {
                Timer::sleep(script.config.timing.navigation_settle_ms).await;
                run_initialization(script).await;
            });
        }
    }
}

fn observe_mutations(script: Rc<ContentScript>) -> Result<(), JsValue> {
    let body = script
        .page
        .document()
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    let observe_attributes = script.config.page.observe_attributes;

    let mutation_closure = Closure::wrap(Box::new(move |records: js_sys::Array, _observer: MutationObserver| {
        let relevant = records
            .iter()
            .filter_map(|record| record.dyn_into::<MutationRecord>().ok())
            .any(|record| {
                let kind = record.type_();
                kind == "childList" || (observe_attributes && kind == "attributes")
            });
        if relevant {
            on_mutation(&script);
        }
    }) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);

    let observer = MutationObserver::new(mutation_closure.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    init.set_attributes(observe_attributes);
    observer.observe_with_options(&body, &init)?;
    mutation_closure.forget();
    Ok(())
}

fn on_mutation(script: &Rc<ContentScript>) {
    let response = script
        .monitor
        .borrow_mut()
        .on_mutation(&script.page, &script.config);
    match response {
        MutationResponse::Ignore => {}
        MutationResponse::Initialize => {
            Task::start(run_initialization(script.clone()));
        }
        MutationResponse::Recheck => {
            let script = script.clone();
            Task::start(async move {
                Timer::sleep(script.config.timing.recheck_delay_ms).await;
                self_check(&script.page, &script.config);
                script.monitor.borrow_mut().finish_recheck();
            });
        }
    }
}
