//! Segment discovery.
//!
//! The transcript markup is not a stable contract, so discovery is an ordered list of
//! strategies from most to least specific. The first one that finds anything wins.

use crate::config::NavigatorConfig;
use crate::page::Page;
use crate::panel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateStrategy {
    /// Panel → segment container → segments.
    Standard,
    /// Segments anywhere inside the panel.
    WithinPanel,
    /// Page-wide clickable elements carrying a start time.
    ClickableWithStart,
    /// Page-wide canonical segment elements.
    AnySegment,
}

impl LocateStrategy {
    pub const CASCADE: [LocateStrategy; 4] = [
        LocateStrategy::Standard,
        LocateStrategy::WithinPanel,
        LocateStrategy::ClickableWithStart,
        LocateStrategy::AnySegment,
    ];

    fn run<P: Page>(self, page: &P, config: &NavigatorConfig) -> Vec<P::Element> {
        let selectors = &config.selectors;
        match self {
            LocateStrategy::Standard => page
                .query(None, &selectors.transcript_panel)
                .and_then(|panel| page.query(Some(&panel), &selectors.segment_container))
                .map(|container| page.query_all(Some(&container), &selectors.segment))
                .unwrap_or_default(),
            LocateStrategy::WithinPanel => page
                .query(None, &selectors.transcript_panel)
                .map(|panel| page.query_all(Some(&panel), &selectors.segment))
                .unwrap_or_default(),
            LocateStrategy::ClickableWithStart => page.query_all(None, &selectors.clickable_with_start),
            LocateStrategy::AnySegment => page.query_all(None, &selectors.segment),
        }
    }
}

/// Ordered transcript segments, empty when there is no transcript or its panel is
/// collapsed.
pub fn locate<P: Page>(page: &P, config: &NavigatorConfig) -> Vec<P::Element> {
    locate_with_strategy(page, config)
        .map(|(_, segments)| segments)
        .unwrap_or_default()
}

/// Like [`locate`] but also reports which strategy produced the segments.
pub fn locate_with_strategy<P: Page>(
    page: &P,
    config: &NavigatorConfig,
) -> Option<(LocateStrategy, Vec<P::Element>)> {
    if panel::is_collapsed(page, config) {
        log::debug!("transcript panel is collapsed, no segments");
        return None;
    }

    LocateStrategy::CASCADE.into_iter().find_map(|strategy| {
        let segments = strategy.run(page, config);
        if segments.is_empty() {
            None
        } else {
            log::debug!("located {} segments via {strategy:?}", segments.len());
            Some((strategy, segments))
        }
    })
}
