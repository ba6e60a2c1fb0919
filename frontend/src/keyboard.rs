//! Page-wide key listener for the navigation shortcuts.

use crate::ContentScript;
use engine::{FocusContext, KeyPress, NavigationController};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;
use web_sys::{Element, HtmlElement, KeyboardEvent};

pub fn install(script: Rc<ContentScript>) -> Result<(), JsValue> {
    let document = script.page.document().clone();
    let keydown_closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        handle_keydown(&script, &event);
    }) as Box<dyn FnMut(KeyboardEvent)>);

    document.add_event_listener_with_callback("keydown", keydown_closure.as_ref().unchecked_ref())?;
    keydown_closure.forget();
    Ok(())
}

fn handle_keydown(script: &ContentScript, event: &KeyboardEvent) {
    let press = KeyPress {
        key: event.key(),
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
        alt: event.alt_key(),
        focus: focus_context(event),
    };
    let Some(command) = script.shortcuts.command_for(&press) else {
        return;
    };

    event.prevent_default();
    NavigationController::new(&script.page, &script.config).run(command);
}

fn focus_context(event: &KeyboardEvent) -> FocusContext {
    let Some(target) = event.target().and_then(|target| target.dyn_into::<Element>().ok()) else {
        return FocusContext::default();
    };
    FocusContext {
        tag_name: target.tag_name().to_lowercase(),
        is_content_editable: target
            .dyn_ref::<HtmlElement>()
            .is_some_and(|html| html.is_content_editable()),
        inside_content_editable: target
            .closest(r#"[contenteditable="true"]"#)
            .ok()
            .flatten()
            .is_some(),
    }
}
