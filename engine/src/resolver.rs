//! Works out which segment is "current".
//!
//! Explicit markers set by the host page win. Without one, the playback position picks
//! the latest segment that has already started. The first segment is the answer of
//! last resort.

use crate::config::NavigatorConfig;
use crate::page::Page;
use crate::segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedBy {
    Marker,
    PlaybackTime,
    /// Neither a marker nor a usable playback position; defaulted to the first segment.
    First,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSegment {
    pub index: usize,
    pub resolved_by: ResolvedBy,
}

/// Active segment among `segments`, `None` only when `segments` is empty.
pub fn resolve<P: Page>(page: &P, segments: &[P::Element], config: &NavigatorConfig) -> Option<ActiveSegment> {
    if segments.is_empty() {
        return None;
    }

    if let Some(index) = segments
        .iter()
        .position(|s| segment::is_explicitly_active(page, s, config))
    {
        return Some(ActiveSegment { index, resolved_by: ResolvedBy::Marker });
    }

    let by_time = match page.playback_position() {
        Ok(position) => latest_started(page, segments, position, config),
        Err(error) => {
            log::debug!("playback position unavailable: {error}");
            None
        }
    };

    Some(match by_time {
        Some(index) => ActiveSegment { index, resolved_by: ResolvedBy::PlaybackTime },
        None => ActiveSegment { index: 0, resolved_by: ResolvedBy::First },
    })
}

/// Index of the segment with the greatest start time not after `position`. Segments
/// without a start time are skipped; on equal start times the earlier index wins.
fn latest_started<P: Page>(
    page: &P,
    segments: &[P::Element],
    position: f64,
    config: &NavigatorConfig,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, s) in segments.iter().enumerate() {
        let Some(start) = segment::start_time_seconds(page, s, config) else {
            continue;
        };
        if start > position {
            continue;
        }
        if best.is_none_or(|(_, best_start)| start > best_start) {
            best = Some((index, start));
        }
    }
    best.map(|(index, _)| index)
}
