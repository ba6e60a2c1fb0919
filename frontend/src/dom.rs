//! [`Page`] over the live document via `web_sys`.

use engine::{Page, PageError, PageLocation};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlMediaElement, MouseEvent, MouseEventInit, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

/// Main player first, any video as a fallback.
const MEDIA_SELECTOR: &str = "video.html5-main-video, video";

#[derive(Clone)]
pub struct DomPage {
    window: Window,
    document: Document,
}

impl DomPage {
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn href(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn media(&self) -> Option<HtmlMediaElement> {
        self.document
            .query_selector(MEDIA_SELECTOR)
            .ok()
            .flatten()?
            .dyn_into::<HtmlMediaElement>()
            .ok()
    }

    fn display_none(&self, element: &Element) -> bool {
        match self.window.get_computed_style(element) {
            Ok(Some(style)) => style
                .get_property_value("display")
                .is_ok_and(|display| display == "none"),
            _ => false,
        }
    }
}

fn script_error(value: JsValue) -> PageError {
    PageError::Script(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

impl Page for DomPage {
    type Element = Element;

    fn query_all(&self, scope: Option<&Element>, selector: &str) -> Vec<Element> {
        let result = match scope {
            Some(scope) => scope.query_selector_all(selector),
            None => self.document.query_selector_all(selector),
        };
        let Ok(list) = result else {
            log::debug!("selector rejected by the page: {selector}");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query(&self, scope: Option<&Element>, selector: &str) -> Option<Element> {
        let result = match scope {
            Some(scope) => scope.query_selector(selector),
            None => self.document.query_selector(selector),
        };
        result.ok().flatten()
    }

    fn matches(&self, element: &Element, selector: &str) -> bool {
        element.matches(selector).unwrap_or(false)
    }

    fn is_within(&self, element: &Element, selector: &str) -> bool {
        element.closest(selector).ok().flatten().is_some()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn has_attribute(&self, element: &Element, name: &str) -> bool {
        element.has_attribute(name)
    }

    fn text(&self, element: &Element) -> String {
        element.text_content().unwrap_or_default()
    }

    fn is_rendered(&self, element: &Element) -> bool {
        if !element.is_connected() {
            return false;
        }
        let mut node = Some(element.clone());
        while let Some(current) = node {
            if current.has_attribute("hidden") || self.display_none(&current) {
                return false;
            }
            node = current.parent_element();
        }
        true
    }

    fn click(&self, element: &Element) -> Result<(), PageError> {
        if !element.is_connected() {
            return Err(PageError::Detached);
        }
        match element.dyn_ref::<HtmlElement>() {
            Some(html) => {
                html.click();
                Ok(())
            }
            None => self.dispatch_click(element),
        }
    }

    fn dispatch_click(&self, element: &Element) -> Result<(), PageError> {
        let init = MouseEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        init.set_view(Some(&self.window));
        let event = MouseEvent::new_with_mouse_event_init_dict("click", &init).map_err(script_error)?;
        element.dispatch_event(&event).map_err(script_error)?;
        Ok(())
    }

    fn scroll_into_view(&self, element: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Center);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn playback_position(&self) -> Result<f64, PageError> {
        let media = self.media().ok_or(PageError::MediaUnavailable)?;
        let position = media.current_time();
        if position.is_finite() {
            Ok(position)
        } else {
            Err(PageError::Script(format!("currentTime is {position}")))
        }
    }

    fn seek_to(&self, seconds: f64) -> Result<(), PageError> {
        let media = self.media().ok_or(PageError::MediaUnavailable)?;
        media.set_current_time(seconds);
        Ok(())
    }

    fn media_ready_state(&self) -> Option<u16> {
        self.media().map(|media| media.ready_state())
    }

    fn location(&self) -> Option<PageLocation> {
        let location = self.window.location();
        Some(PageLocation {
            href: location.href().ok()?,
            host: location.hostname().ok()?,
            path: location.pathname().ok()?,
            query: location.search().ok()?,
        })
    }

    async fn sleep(&self, millis: u32) {
        zoon::Timer::sleep(millis).await;
    }
}
