//! Previous / replay / next over the live transcript.
//!
//! Every command locates segments and resolves the active one from scratch. No position
//! is carried between commands: the host page re-renders the transcript whenever it
//! likes, so anything remembered would go stale.

use crate::activator;
use crate::config::NavigatorConfig;
use crate::locator;
use crate::page::Page;
use crate::resolver::{self, ActiveSegment};
use crate::segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Previous,
    Replay,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationOutcome {
    NoSegments,
    /// Next was pressed on the last segment.
    AtEnd { index: usize },
    Activated {
        index: usize,
        /// The page accepted the activation. When it did not, a direct seek to the
        /// segment's start time was attempted instead.
        dispatched: bool,
        /// Start time written to the media element by the fallback seek.
        seeked_to: Option<f64>,
    },
}

pub struct NavigationController<'a, P: Page> {
    page: &'a P,
    config: &'a NavigatorConfig,
}

impl<'a, P: Page> NavigationController<'a, P> {
    pub fn new(page: &'a P, config: &'a NavigatorConfig) -> Self {
        Self { page, config }
    }

    pub fn run(&self, command: Command) -> NavigationOutcome {
        let segments = locator::locate(self.page, self.config);
        if segments.is_empty() {
            log::debug!("{command:?}: no transcript segments");
            return NavigationOutcome::NoSegments;
        }

        let active = resolver::resolve(self.page, &segments, self.config);
        let last = segments.len() - 1;
        let target = match target_index(command, active, last) {
            Some(index) => index,
            None => {
                log::debug!("{command:?}: already at the last segment");
                return NavigationOutcome::AtEnd { index: last };
            }
        };

        let outcome = self.activate(&segments[target], target);
        log::debug!("{command:?} from {active:?}: {outcome:?}");
        outcome
    }

    fn activate(&self, target: &P::Element, index: usize) -> NavigationOutcome {
        if activator::activate(self.page, target, self.config) {
            return NavigationOutcome::Activated { index, dispatched: true, seeked_to: None };
        }

        let seeked_to = segment::start_time_seconds(self.page, target, self.config).filter(|start| {
            self.page
                .seek_to(*start)
                .inspect_err(|error| log::warn!("direct seek failed: {error}"))
                .is_ok()
        });
        NavigationOutcome::Activated { index, dispatched: false, seeked_to }
    }
}

/// Segment to activate for `command`, `None` when the command is a no-op.
fn target_index(command: Command, active: Option<ActiveSegment>, last: usize) -> Option<usize> {
    let active = active.map(|a| a.index);
    match (command, active) {
        (Command::Previous, Some(i)) if i > 0 => Some(i - 1),
        (Command::Previous, _) => Some(0),
        (Command::Replay, Some(i)) => Some(i),
        (Command::Replay, None) => Some(0),
        (Command::Next, Some(i)) if i < last => Some(i + 1),
        (Command::Next, Some(_)) => None,
        (Command::Next, None) => Some(0),
    }
}
