//! Page readiness and single-page-app navigation.
//!
//! The host page swaps videos without reloading, so the content script keeps a
//! [`PageLifecycleMonitor`] fed with URL polls and DOM mutation notifications and runs
//! [`initialize`] whenever a video page needs (re)arming.

use crate::config::{NavigatorConfig, VideoPageRules};
use crate::locator;
use crate::page::{Page, PageLocation};
use crate::panel::{self, PanelOpener, PanelOutcome};
use crate::resolver::{self, ActiveSegment};
use crate::retry::poll_until;
use crate::segment;

/// Segments whose start time the self-check samples.
const SELF_CHECK_SAMPLE: usize = 5;

/// Failed passes after which mutations restart initialization for a URL only once the
/// media is ready and the panel container exists.
const MUTATION_RETRY_LIMIT: u32 = 2;

pub fn is_video_page(location: &PageLocation, rules: &VideoPageRules) -> bool {
    location.host == rules.host
        && location.path == rules.path
        && location.query_param(&rules.video_param).is_some()
}

/// What the engine could see of the transcript at the end of an initialization pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfCheck {
    pub segment_count: usize,
    pub sampled_start_times: Vec<Option<f64>>,
    pub active: Option<ActiveSegment>,
}

pub fn self_check<P: Page>(page: &P, config: &NavigatorConfig) -> Option<SelfCheck> {
    let segments = locator::locate(page, config);
    if segments.is_empty() {
        log::debug!("self-check: no transcript segments");
        return None;
    }

    let sampled_start_times = segments
        .iter()
        .take(SELF_CHECK_SAMPLE)
        .map(|s| segment::start_time_seconds(page, s, config))
        .collect();
    let check = SelfCheck {
        segment_count: segments.len(),
        sampled_start_times,
        active: resolver::resolve(page, &segments, config),
    };
    log::info!(
        "self-check: {} segments, active {:?}",
        check.segment_count,
        check.active.map(|a| a.index)
    );
    Some(check)
}

#[derive(Debug, Clone, PartialEq)]
pub enum InitOutcome {
    NotVideoPage,
    VideoNotReady,
    PanelMissing,
    Ready {
        panel: PanelOutcome,
        check: Option<SelfCheck>,
    },
}

/// One initialization pass: media ready → panel container present → panel opened →
/// self-check. Each wait is bounded; running out abandons the pass.
pub async fn initialize<P: Page>(page: &P, config: &NavigatorConfig) -> InitOutcome {
    let on_video_page = page
        .location()
        .is_some_and(|location| is_video_page(&location, &config.page));
    if !on_video_page {
        return InitOutcome::NotVideoPage;
    }

    let min_ready = config.timing.min_ready_state;
    let media_ready = poll_until(page, config.timing.video_ready, |page| {
        page.media_ready_state().is_some_and(|state| state >= min_ready)
    })
    .await;
    if !media_ready {
        log::debug!("video never became ready, abandoning initialization");
        return InitOutcome::VideoNotReady;
    }

    let panel_present = poll_until(page, config.timing.panel_wait, |page| {
        panel::container_present(page, config)
    })
    .await;
    if !panel_present {
        log::debug!("transcript panel never appeared, abandoning initialization");
        return InitOutcome::PanelMissing;
    }

    let panel = PanelOpener::new(page, config)
        .ensure_open(config.timing.open_attempts)
        .await;
    let check = self_check(page, config);
    log::info!("initialization finished: panel {panel:?}");
    InitOutcome::Ready { panel, check }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationResponse {
    Ignore,
    /// Run a new initialization pass.
    Initialize,
    /// Schedule a self-check; the caller reports back with [`PageLifecycleMonitor::finish_recheck`].
    Recheck,
}

/// Tracks navigation and initialization state across lifecycle events.
#[derive(Debug)]
pub struct PageLifecycleMonitor {
    last_url: String,
    initialized_url: Option<String>,
    failed_passes: u32,
    in_flight: bool,
    recheck_pending: bool,
}

impl PageLifecycleMonitor {
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self {
            last_url: initial_url.into(),
            initialized_url: None,
            failed_passes: 0,
            in_flight: false,
            recheck_pending: false,
        }
    }

    /// Records `href` from a URL poll and reports whether it differs from the last one.
    pub fn url_changed(&mut self, href: &str) -> bool {
        if self.last_url == href {
            return false;
        }
        log::debug!("navigation detected: {} -> {href}", self.last_url);
        self.last_url = href.to_string();
        self.failed_passes = 0;
        true
    }

    /// Claims the right to run an initialization pass. `false` while one is running.
    pub fn begin_initialization(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    pub fn finish_initialization(&mut self, href: &str, outcome: &InitOutcome) {
        self.in_flight = false;
        match outcome {
            InitOutcome::Ready { .. } => {
                self.initialized_url = Some(href.to_string());
                self.failed_passes = 0;
            }
            InitOutcome::NotVideoPage => {}
            InitOutcome::VideoNotReady | InitOutcome::PanelMissing => {
                self.failed_passes += 1;
            }
        }
    }

    pub fn on_mutation<P: Page>(&mut self, page: &P, config: &NavigatorConfig) -> MutationResponse {
        let Some(location) = page.location() else {
            return MutationResponse::Ignore;
        };
        if self.in_flight || !is_video_page(&location, &config.page) {
            return MutationResponse::Ignore;
        }

        if self.initialized_url.as_deref() != Some(location.href.as_str()) {
            if self.failed_passes < MUTATION_RETRY_LIMIT || prerequisites_met(page, config) {
                return MutationResponse::Initialize;
            }
            return MutationResponse::Ignore;
        }

        if self.recheck_pending || !panel::container_present(page, config) {
            return MutationResponse::Ignore;
        }
        self.recheck_pending = true;
        MutationResponse::Recheck
    }

    pub fn finish_recheck(&mut self) {
        self.recheck_pending = false;
    }
}

/// What a pass waits for is already there, so a new pass will not time out.
fn prerequisites_met<P: Page>(page: &P, config: &NavigatorConfig) -> bool {
    page.media_ready_state()
        .is_some_and(|state| state >= config.timing.min_ready_state)
        && panel::container_present(page, config)
}
