//! Seeking to a segment by triggering the host page's own click handling.

use crate::config::NavigatorConfig;
use crate::page::{Page, PageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    /// Descendant carrying a start-time attribute; usually where the page wires the
    /// click handler.
    TimedDescendant,
    TimedSegment,
    ClickableDescendant,
    /// Click plus a synthetic click event on the segment itself.
    Segment,
}

/// Activates `segment` and scrolls it into view.
///
/// Returns `true` when an activation was dispatched. Host failures are logged and
/// reported as `false`; the scroll happens either way.
pub fn activate<P: Page>(page: &P, segment: &P::Element, config: &NavigatorConfig) -> bool {
    let result = try_activate(page, segment, config);
    page.scroll_into_view(segment);
    match result {
        Ok(target) => {
            log::debug!("activated segment via {target:?}");
            true
        }
        Err(error) => {
            log::warn!("segment activation failed: {error}");
            false
        }
    }
}

fn try_activate<P: Page>(page: &P, segment: &P::Element, config: &NavigatorConfig) -> Result<Target, PageError> {
    let timed_attributes = &config.start_time.attributes;

    if let Some(child) = timed_attributes
        .iter()
        .find_map(|attribute| page.query(Some(segment), &attribute.selector()))
    {
        page.click(&child)?;
        return Ok(Target::TimedDescendant);
    }

    if timed_attributes
        .iter()
        .any(|attribute| page.has_attribute(segment, &attribute.name))
    {
        page.click(segment)?;
        return Ok(Target::TimedSegment);
    }

    if let Some(child) = config
        .activation
        .clickable
        .iter()
        .find_map(|selector| page.query(Some(segment), selector))
    {
        page.click(&child)?;
        return Ok(Target::ClickableDescendant);
    }

    page.click(segment)?;
    if let Err(error) = page.dispatch_click(segment) {
        log::debug!("synthetic click after a real one failed: {error}");
    }
    Ok(Target::Segment)
}
