//! Revealing the transcript panel.
//!
//! The "Show transcript" control lives in different places depending on layout and
//! locale: in the expanded video description, behind the overflow menu, or as a plain
//! labelled button. [`PanelOpener`] walks those places in order and retries a bounded
//! number of times.

use crate::config::NavigatorConfig;
use crate::page::Page;

/// Whether the transcript panel and its content are both showing.
pub fn is_open<P: Page>(page: &P, config: &NavigatorConfig) -> bool {
    let container = page.query(None, &config.panel.container);
    if container
        .as_ref()
        .is_some_and(|container| !container_visible(page, container, config))
    {
        return false;
    }

    page.query(container.as_ref(), &config.selectors.transcript_panel)
        .is_some_and(|content| page.is_rendered(&content))
}

/// The panel container exists but is collapsed or hidden.
pub fn is_collapsed<P: Page>(page: &P, config: &NavigatorConfig) -> bool {
    page.query(None, &config.panel.container)
        .is_some_and(|container| !container_visible(page, &container, config))
}

/// The panel container is present in the document, open or not.
pub fn container_present<P: Page>(page: &P, config: &NavigatorConfig) -> bool {
    page.query(None, &config.panel.container).is_some()
        || page.query(None, &config.selectors.transcript_panel).is_some()
}

fn container_visible<P: Page>(page: &P, container: &P::Element, config: &NavigatorConfig) -> bool {
    page.is_rendered(container)
        && page.attribute(container, "visibility").as_deref() != Some(config.panel.collapsed_visibility.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelOutcome {
    AlreadyOpen,
    Opened { attempts: u32 },
    GaveUp { attempts: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reveal {
    /// A transcript control (direct or from the overflow menu) was clicked.
    Clicked,
    /// The overflow menu opened but held no transcript item.
    MenuOnly,
    NothingFound,
}

pub struct PanelOpener<'a, P: Page> {
    page: &'a P,
    config: &'a NavigatorConfig,
}

impl<'a, P: Page> PanelOpener<'a, P> {
    pub fn new(page: &'a P, config: &'a NavigatorConfig) -> Self {
        Self { page, config }
    }

    /// Opens the transcript panel, trying at most `max_attempts` times.
    ///
    /// Never fails: after the last attempt the panel is simply left as it is.
    pub async fn ensure_open(&self, max_attempts: u32) -> PanelOutcome {
        let timing = &self.config.timing;

        for attempt in 0..max_attempts {
            if is_open(self.page, self.config) {
                return if attempt == 0 {
                    PanelOutcome::AlreadyOpen
                } else {
                    PanelOutcome::Opened { attempts: attempt }
                };
            }

            if attempt == 0 && self.expand_description() {
                self.page.sleep(timing.expand_settle_ms).await;
            }

            match self.reveal().await {
                Reveal::Clicked | Reveal::MenuOnly => {
                    self.page.sleep(timing.open_check_ms).await;
                    if is_open(self.page, self.config) {
                        log::info!("transcript panel opened after {} attempt(s)", attempt + 1);
                        return PanelOutcome::Opened { attempts: attempt + 1 };
                    }
                }
                Reveal::NothingFound => {
                    log::debug!("no transcript control found (attempt {})", attempt + 1);
                    if attempt + 1 < max_attempts {
                        self.page.sleep(timing.control_missing_retry_ms).await;
                    }
                }
            }
        }

        log::debug!("giving up on the transcript panel after {max_attempts} attempt(s)");
        PanelOutcome::GaveUp { attempts: max_attempts }
    }

    /// Clicks a visible "more" control of the truncated description, if any.
    fn expand_description(&self) -> bool {
        let panel = &self.config.panel;
        let by_selector = self.control(&panel.description_expanders);
        let expander = by_selector.or_else(|| self.labelled(&panel.button_candidates, &panel.more_labels, true));

        match expander {
            Some(expander) => {
                let clicked = self.page.click(&expander).is_ok();
                log::debug!("description expander clicked: {clicked}");
                clicked
            }
            None => false,
        }
    }

    async fn reveal(&self) -> Reveal {
        if let Some(control) = self.transcript_control() {
            return self.click(&control, Reveal::Clicked);
        }

        let panel = &self.config.panel;
        let overflow = self
            .control(&panel.overflow_controls)
            .or_else(|| self.labelled(&panel.button_candidates, &panel.overflow_labels, false));
        let Some(overflow) = overflow else {
            return Reveal::NothingFound;
        };
        if self.click(&overflow, Reveal::MenuOnly) == Reveal::NothingFound {
            return Reveal::NothingFound;
        }

        self.page.sleep(self.config.timing.menu_settle_ms).await;

        let item = self
            .transcript_control()
            .or_else(|| self.labelled(&panel.menu_items, &panel.transcript_labels, false));
        match item {
            Some(item) => self.click(&item, Reveal::Clicked),
            None => Reveal::MenuOnly,
        }
    }

    fn transcript_control(&self) -> Option<P::Element> {
        let panel = &self.config.panel;
        self.control(&panel.transcript_controls)
            .or_else(|| self.labelled(&panel.button_candidates, &panel.transcript_labels, false))
    }

    /// First usable element matching any of `selectors`, in selector order.
    fn control(&self, selectors: &[String]) -> Option<P::Element> {
        selectors
            .iter()
            .flat_map(|selector| self.page.query_all(None, selector))
            .find(|el| self.usable(el))
    }

    /// Rendered and outside the transcript panel. The panel's own header buttons
    /// ("Close transcript", its menu) never count as openers.
    fn usable(&self, element: &P::Element) -> bool {
        self.page.is_rendered(element) && !self.page.is_within(element, &self.config.panel.container)
    }

    fn click(&self, element: &P::Element, on_success: Reveal) -> Reveal {
        match self.page.click(element) {
            Ok(()) => on_success,
            Err(error) => {
                log::warn!("panel control click failed: {error}");
                Reveal::NothingFound
            }
        }
    }

    /// First candidate whose `aria-label` or text contains one of `labels`,
    /// case-insensitively. With `exact`, the trimmed text must equal the label instead.
    fn labelled(&self, candidates: &str, labels: &[String], exact: bool) -> Option<P::Element> {
        let labels: Vec<String> = labels.iter().map(|label| label.to_lowercase()).collect();
        self.page.query_all(None, candidates).into_iter().find(|el| {
            if !self.usable(el) {
                return false;
            }
            let aria = self.page.attribute(el, "aria-label").unwrap_or_default().to_lowercase();
            let text = self.page.text(el).trim().to_lowercase();
            labels.iter().any(|label| {
                if exact {
                    text == *label || aria == *label
                } else {
                    text.contains(label.as_str()) || aria.contains(label.as_str())
                }
            })
        })
    }
}
