//! Bridge between the engine and the host page
//!
//! The engine never touches a DOM directly. The content script implements [`Page`] over
//! `web_sys`, tests implement it over parsed HTML fixtures.

use std::fmt;

/// Failure reported by the host page for an operation the engine asked for.
///
/// The engine absorbs every one of these; they exist so the bridge can say *why* an
/// operation did nothing and the engine can log it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PageError {
    #[error("no media element on the page")]
    MediaUnavailable,
    #[error("host page raised an exception: {0}")]
    Script(String),
    #[error("element is no longer attached to the document")]
    Detached,
}

/// Current address of the page, split the way `window.location` reports it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageLocation {
    pub href: String,
    pub host: String,
    pub path: String,
    /// Raw query string including the leading `?`, may be empty.
    pub query: String,
}

impl PageLocation {
    /// Returns the first non-empty value of `name` in the query string.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
            .find(|(key, value)| *key == name && !value.is_empty())
            .map(|(_, value)| value)
    }
}

/// Where keyboard focus was when a key event fired.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FocusContext {
    /// Lowercase tag name of the event target.
    pub tag_name: String,
    pub is_content_editable: bool,
    /// Some ancestor carries `contenteditable="true"`.
    pub inside_content_editable: bool,
}

impl FocusContext {
    pub fn is_text_entry(&self) -> bool {
        matches!(self.tag_name.as_str(), "input" | "textarea")
            || self.is_content_editable
            || self.inside_content_editable
    }
}

/// Host page operations needed by the engine.
///
/// Query methods never fail: an invalid selector, a missing scope or a detached node all
/// read as "nothing found". Methods that act on the page return `Result` so callers can
/// tell an attempted action from a failed one.
#[allow(async_fn_in_trait)]
pub trait Page {
    type Element: Clone + PartialEq + fmt::Debug;

    /// All elements matching `selector` in document order, searched inside `scope` (its
    /// descendants only) or the whole document when `scope` is `None`.
    fn query_all(&self, scope: Option<&Self::Element>, selector: &str) -> Vec<Self::Element>;

    fn query(&self, scope: Option<&Self::Element>, selector: &str) -> Option<Self::Element> {
        self.query_all(scope, selector).into_iter().next()
    }

    fn matches(&self, element: &Self::Element, selector: &str) -> bool;

    /// Whether the element itself or one of its ancestors matches `selector`.
    fn is_within(&self, element: &Self::Element, selector: &str) -> bool;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn has_attribute(&self, element: &Self::Element, name: &str) -> bool {
        self.attribute(element, name).is_some()
    }

    /// Visible text of the element and its descendants.
    fn text(&self, element: &Self::Element) -> String;

    /// `false` when the element or any ancestor is hidden or has a computed `display`
    /// of `none`.
    fn is_rendered(&self, element: &Self::Element) -> bool;

    fn click(&self, element: &Self::Element) -> Result<(), PageError>;

    /// Dispatches a synthetic bubbling, cancelable click event on the element.
    fn dispatch_click(&self, element: &Self::Element) -> Result<(), PageError>;

    /// Smooth, center-aligned scroll of the element into view.
    fn scroll_into_view(&self, element: &Self::Element);

    /// Current playback position of the main media element, in seconds.
    fn playback_position(&self) -> Result<f64, PageError>;

    fn seek_to(&self, seconds: f64) -> Result<(), PageError>;

    /// `readyState` of the main media element, `None` when there is no media element.
    fn media_ready_state(&self) -> Option<u16>;

    fn location(&self) -> Option<PageLocation>;

    async fn sleep(&self, millis: u32);
}
