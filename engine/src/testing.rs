//! In-memory [`Page`] over HTML fixtures, for tests.
//!
//! Elements are addressed by their position in document order plus the generation of
//! the document they came from, so handles taken before a scripted page change read as
//! detached afterwards, just like stale nodes on the real page.

use crate::page::{Page, PageError, PageLocation};
use scraper::{ElementRef, Html, Selector};
use std::cell::{Cell, RefCell};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeElement {
    generation: u32,
    index: usize,
}

pub struct FakePage {
    html: RefCell<Html>,
    generation: Cell<u32>,
    playback: Cell<Option<f64>>,
    playback_throws: Cell<bool>,
    ready_state: Cell<Option<u16>>,
    location: RefCell<Option<PageLocation>>,
    clicks_fail: Cell<bool>,
    dispatch_fails: Cell<bool>,
    clicks: RefCell<Vec<String>>,
    dispatched: RefCell<Vec<String>>,
    scrolled: RefCell<Vec<String>>,
    seeks: RefCell<Vec<f64>>,
    sleeps: RefCell<Vec<u32>>,
    click_transitions: RefCell<Vec<(String, String)>>,
    sleep_transitions: RefCell<Vec<(usize, String)>>,
}

impl FakePage {
    pub fn new(markup: &str) -> Self {
        Self {
            html: RefCell::new(Html::parse_document(markup)),
            generation: Cell::new(0),
            playback: Cell::new(None),
            playback_throws: Cell::new(false),
            ready_state: Cell::new(None),
            location: RefCell::new(None),
            clicks_fail: Cell::new(false),
            dispatch_fails: Cell::new(false),
            clicks: RefCell::new(Vec::new()),
            dispatched: RefCell::new(Vec::new()),
            scrolled: RefCell::new(Vec::new()),
            seeks: RefCell::new(Vec::new()),
            sleeps: RefCell::new(Vec::new()),
            click_transitions: RefCell::new(Vec::new()),
            sleep_transitions: RefCell::new(Vec::new()),
        }
    }

    pub fn with_playback(self, seconds: f64) -> Self {
        self.playback.set(Some(seconds));
        self
    }

    pub fn with_throwing_playback(self) -> Self {
        self.playback.set(Some(0.0));
        self.playback_throws.set(true);
        self
    }

    pub fn with_ready_state(self, state: u16) -> Self {
        self.ready_state.set(Some(state));
        self
    }

    pub fn with_failing_clicks(self) -> Self {
        self.clicks_fail.set(true);
        self
    }

    pub fn with_failing_dispatch(self) -> Self {
        self.dispatch_fails.set(true);
        self
    }

    pub fn with_location(self, href: &str) -> Self {
        self.navigate(href);
        self
    }

    pub fn navigate(&self, href: &str) {
        let rest = href.split_once("://").map_or(href, |(_, rest)| rest);
        let (host, path_and_query) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
        let (path, query) = match path_and_query.find('?') {
            Some(at) => path_and_query.split_at(at),
            None => (path_and_query, ""),
        };
        *self.location.borrow_mut() = Some(PageLocation {
            href: href.to_string(),
            host: host.to_string(),
            path: path.to_string(),
            query: query.to_string(),
        });
    }

    /// Replaces the document once an element matching `selector` is clicked.
    pub fn on_click(&self, selector: &str, markup: &str) {
        self.click_transitions
            .borrow_mut()
            .push((selector.to_string(), markup.to_string()));
    }

    /// Replaces the document once `sleeps` sleeps have happened in total.
    pub fn schedule_after_sleeps(&self, sleeps: usize, markup: &str) {
        self.sleep_transitions
            .borrow_mut()
            .push((sleeps, markup.to_string()));
    }

    pub fn element(&self, selector: &str) -> FakeElement {
        self.query(None, selector)
            .unwrap_or_else(|| panic!("fixture has no element matching {selector}"))
    }

    pub fn clicks(&self) -> Vec<String> {
        self.clicks.borrow().clone()
    }

    pub fn dispatched(&self) -> Vec<String> {
        self.dispatched.borrow().clone()
    }

    pub fn scrolled(&self) -> Vec<String> {
        self.scrolled.borrow().clone()
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.seeks.borrow().clone()
    }

    pub fn sleeps(&self) -> Vec<u32> {
        self.sleeps.borrow().clone()
    }

    pub fn label(&self, element: &FakeElement) -> Option<String> {
        self.with_element(element, |el| {
            el.value()
                .attr("id")
                .map(str::to_string)
                .unwrap_or_else(|| el.value().name().to_string())
        })
    }

    fn replace_document(&self, markup: &str) {
        *self.html.borrow_mut() = Html::parse_document(markup);
        self.generation.set(self.generation.get() + 1);
    }

    fn with_element<R>(&self, element: &FakeElement, f: impl FnOnce(ElementRef<'_>) -> R) -> Option<R> {
        if element.generation != self.generation.get() {
            return None;
        }
        let html = self.html.borrow();
        let found = html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .nth(element.index);
        found.map(f)
    }

    fn apply_click_transition(&self, element: &FakeElement) {
        let next = self
            .with_element(element, |el| {
                let mut transitions = self.click_transitions.borrow_mut();
                let position = transitions.iter().position(|(selector, _)| {
                    Selector::parse(selector).is_ok_and(|selector| selector.matches(&el))
                });
                position.map(|at| transitions.remove(at).1)
            })
            .flatten();
        if let Some(markup) = next {
            self.replace_document(&markup);
        }
    }
}

fn is_hidden_by_style(style: Option<&str>) -> bool {
    style.is_some_and(|style| {
        let compact: String = style.chars().filter(|c| !c.is_whitespace()).collect();
        compact.to_lowercase().contains("display:none")
    })
}

impl Page for FakePage {
    type Element = FakeElement;

    fn query_all(&self, scope: Option<&FakeElement>, selector: &str) -> Vec<FakeElement> {
        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        let generation = self.generation.get();
        if scope.is_some_and(|scope| scope.generation != generation) {
            return Vec::new();
        }

        let html = self.html.borrow();
        let all: Vec<ElementRef<'_>> = html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .collect();
        let found: Vec<ElementRef<'_>> = match scope {
            None => html.select(&selector).collect(),
            Some(scope) => match all.get(scope.index) {
                Some(scope) => scope.select(&selector).collect(),
                None => return Vec::new(),
            },
        };

        found
            .into_iter()
            .filter_map(|el| all.iter().position(|candidate| *candidate == el))
            .map(|index| FakeElement { generation, index })
            .collect()
    }

    fn matches(&self, element: &FakeElement, selector: &str) -> bool {
        let Ok(selector) = Selector::parse(selector) else {
            return false;
        };
        self.with_element(element, |el| selector.matches(&el))
            .unwrap_or(false)
    }

    fn is_within(&self, element: &FakeElement, selector: &str) -> bool {
        let Ok(selector) = Selector::parse(selector) else {
            return false;
        };
        self.with_element(element, |el| {
            selector.matches(&el)
                || el
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(|ancestor| selector.matches(&ancestor))
        })
        .unwrap_or(false)
    }

    fn attribute(&self, element: &FakeElement, name: &str) -> Option<String> {
        self.with_element(element, |el| el.value().attr(name).map(str::to_string))
            .flatten()
    }

    fn text(&self, element: &FakeElement) -> String {
        self.with_element(element, |el| el.text().collect::<String>())
            .unwrap_or_default()
    }

    fn is_rendered(&self, element: &FakeElement) -> bool {
        self.with_element(element, |el| {
            std::iter::once(el)
                .chain(el.ancestors().filter_map(ElementRef::wrap))
                .all(|node| node.value().attr("hidden").is_none() && !is_hidden_by_style(node.value().attr("style")))
        })
        .unwrap_or(false)
    }

    fn click(&self, element: &FakeElement) -> Result<(), PageError> {
        let label = self.label(element).ok_or(PageError::Detached)?;
        if self.clicks_fail.get() {
            return Err(PageError::Script(format!("click on {label} threw")));
        }
        self.clicks.borrow_mut().push(label);
        self.apply_click_transition(element);
        Ok(())
    }

    fn dispatch_click(&self, element: &FakeElement) -> Result<(), PageError> {
        let label = self.label(element).ok_or(PageError::Detached)?;
        if self.dispatch_fails.get() {
            return Err(PageError::Script(format!("dispatchEvent on {label} threw")));
        }
        self.dispatched.borrow_mut().push(label);
        Ok(())
    }

    fn scroll_into_view(&self, element: &FakeElement) {
        if let Some(label) = self.label(element) {
            self.scrolled.borrow_mut().push(label);
        }
    }

    fn playback_position(&self) -> Result<f64, PageError> {
        if self.playback_throws.get() {
            return Err(PageError::Script("currentTime getter threw".to_string()));
        }
        self.playback.get().ok_or(PageError::MediaUnavailable)
    }

    fn seek_to(&self, seconds: f64) -> Result<(), PageError> {
        if self.playback.get().is_none() {
            return Err(PageError::MediaUnavailable);
        }
        self.playback.set(Some(seconds));
        self.seeks.borrow_mut().push(seconds);
        Ok(())
    }

    fn media_ready_state(&self) -> Option<u16> {
        self.ready_state.get()
    }

    fn location(&self) -> Option<PageLocation> {
        self.location.borrow().clone()
    }

    async fn sleep(&self, millis: u32) {
        let count = {
            let mut sleeps = self.sleeps.borrow_mut();
            sleeps.push(millis);
            sleeps.len()
        };
        let due = {
            let mut transitions = self.sleep_transitions.borrow_mut();
            transitions
                .iter()
                .position(|(after, _)| *after <= count)
                .map(|at| transitions.remove(at).1)
        };
        if let Some(markup) = due {
            self.replace_document(&markup);
        }
    }
}

/// Standard transcript panel markup with one segment per `(label, extra attributes)`.
pub fn transcript_page(segments: &[(&str, &str)]) -> String {
    let rows: String = segments
        .iter()
        .enumerate()
        .map(|(i, (label, attrs))| {
            format!(
                r#"<ytd-transcript-segment-renderer id="seg{i}" {attrs}><div class="segment-timestamp">{label}</div><yt-formatted-string class="segment-text">line {i}</yt-formatted-string></ytd-transcript-segment-renderer>"#
            )
        })
        .collect();
    format!(
        r#"<html><body>
        <video></video>
        <ytd-engagement-panel-section-list-renderer id="panel" target-id="engagement-panel-searchable-transcript" visibility="ENGAGEMENT_PANEL_VISIBILITY_EXPANDED">
          <ytd-transcript-renderer id="transcript">
            <div id="segments-container">{rows}</div>
          </ytd-transcript-renderer>
        </ytd-engagement-panel-section-list-renderer>
        </body></html>"#
    )
}

/// Segments labelled from plain second offsets.
pub fn timed_page(seconds: &[u32]) -> String {
    let labels: Vec<String> = seconds
        .iter()
        .map(|s| format!("{}:{:02}", s / 60, s % 60))
        .collect();
    let rows: Vec<(&str, &str)> = labels.iter().map(|label| (label.as_str(), "")).collect();
    transcript_page(&rows)
}
