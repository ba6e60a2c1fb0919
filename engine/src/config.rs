//! Static configuration: selector cascades, localized labels, wait budgets and key
//! bindings.
//!
//! Every section is `#[serde(default)]`, so a TOML file only needs the keys it wants to
//! change. Defaults target the current YouTube desktop layout.

use crate::retry::RetryBudget;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse navigator config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("key binding for '{command}' must be a single character, got {key:?}")]
    InvalidBinding { command: &'static str, key: String },
    #[error("key {0:?} is bound to more than one command")]
    DuplicateBinding(String),
    #[error("wait budget '{0}' needs at least one attempt")]
    EmptyBudget(&'static str),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct NavigatorConfig {
    pub selectors: SegmentSelectors,
    pub markers: ActiveMarkers,
    pub start_time: StartTimeSources,
    pub activation: ActivationTargets,
    pub panel: PanelControls,
    pub timing: Timing,
    pub keys: KeyBindings,
    pub page: VideoPageRules,
}

impl NavigatorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let bindings = [
            ("previous", &self.keys.previous),
            ("replay", &self.keys.replay),
            ("next", &self.keys.next),
        ];
        for (command, key) in bindings {
            if key.chars().count() != 1 {
                return Err(ConfigError::InvalidBinding { command, key: key.clone() });
            }
        }
        for (i, (_, key)) in bindings.iter().enumerate() {
            if bindings[i + 1..]
                .iter()
                .any(|(_, other)| other.to_lowercase() == key.to_lowercase())
            {
                return Err(ConfigError::DuplicateBinding(key.to_string()));
            }
        }

        let budgets = [
            ("open_attempts", self.timing.open_attempts),
            ("video_ready", self.timing.video_ready.max_attempts),
            ("panel_wait", self.timing.panel_wait.max_attempts),
        ];
        for (name, attempts) in budgets {
            if attempts == 0 {
                return Err(ConfigError::EmptyBudget(name));
            }
        }
        Ok(())
    }
}

// ===== SEGMENT DISCOVERY =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SegmentSelectors {
    /// Renderer hosting the transcript; also the panel's content container.
    pub transcript_panel: String,
    pub segment_container: String,
    pub segment: String,
    /// Page-wide fallback for layouts that render segments as plain buttons.
    pub clickable_with_start: String,
}

impl Default for SegmentSelectors {
    fn default() -> Self {
        Self {
            transcript_panel: "ytd-transcript-renderer".to_string(),
            segment_container: "#segments-container".to_string(),
            segment: "ytd-transcript-segment-renderer".to_string(),
            clickable_with_start: r#"[role="button"][data-start]"#.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ActiveMarkers {
    /// Matched against each segment and its descendants.
    pub selectors: Vec<String>,
}

impl Default for ActiveMarkers {
    fn default() -> Self {
        Self {
            selectors: strings(&[
                "[is-active-cue]",
                ".active",
                ".current",
                "[active]",
                r#"[aria-current]:not([aria-current="false"])"#,
                r#"[aria-selected="true"]"#,
            ]),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
}

impl TimeUnit {
    pub fn to_seconds(self, value: f64) -> f64 {
        match self {
            TimeUnit::Seconds => value,
            TimeUnit::Milliseconds => value / 1000.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StartTimeAttribute {
    pub name: String,
    pub unit: TimeUnit,
}

impl StartTimeAttribute {
    fn new(name: &str, unit: TimeUnit) -> Self {
        Self { name: name.to_string(), unit }
    }

    pub fn selector(&self) -> String {
        format!("[{}]", self.name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StartTimeSources {
    pub attributes: Vec<StartTimeAttribute>,
    /// Elements whose text is an `M:SS` or `H:MM:SS` timestamp.
    pub label_selectors: Vec<String>,
}

impl Default for StartTimeSources {
    fn default() -> Self {
        Self {
            attributes: vec![
                StartTimeAttribute::new("data-start", TimeUnit::Seconds),
                StartTimeAttribute::new("start-offset-ms", TimeUnit::Milliseconds),
                StartTimeAttribute::new("data-start-ms", TimeUnit::Milliseconds),
                StartTimeAttribute::new("start-ms", TimeUnit::Milliseconds),
            ],
            label_selectors: strings(&[".segment-timestamp", "#start-time", ".cue-group-start-offset"]),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ActivationTargets {
    pub clickable: Vec<String>,
}

impl Default for ActivationTargets {
    fn default() -> Self {
        Self {
            clickable: strings(&["button", r#"[role="button"]"#, ".ytd-transcript-segment-renderer"]),
        }
    }
}

// ===== PANEL CONTROLS =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PanelControls {
    /// Engagement panel that hosts the transcript renderer.
    pub container: String,
    /// `visibility` attribute value the container carries while collapsed.
    pub collapsed_visibility: String,
    pub description_expanders: Vec<String>,
    /// Buttons whose text is compared against `more_labels`.
    pub button_candidates: String,
    pub more_labels: Vec<String>,
    pub transcript_controls: Vec<String>,
    pub transcript_labels: Vec<String>,
    pub overflow_controls: Vec<String>,
    pub overflow_labels: Vec<String>,
    pub menu_items: String,
}

impl Default for PanelControls {
    fn default() -> Self {
        Self {
            container: r#"ytd-engagement-panel-section-list-renderer[target-id="engagement-panel-searchable-transcript"]"#
                .to_string(),
            collapsed_visibility: "ENGAGEMENT_PANEL_VISIBILITY_HIDDEN".to_string(),
            description_expanders: strings(&[
                "tp-yt-paper-button#expand",
                "#description-inline-expander #expand",
                "ytd-text-inline-expander #expand",
            ]),
            button_candidates: "button, tp-yt-paper-button".to_string(),
            more_labels: strings(&[
                "...more", "…more", "more", "mehr", "plus", "más", "mais", "altro", "ещё",
                "もっと見る", "더보기", "展开",
            ]),
            transcript_controls: strings(&[
                "ytd-video-description-transcript-section-renderer button",
                r#"button[aria-label="Show transcript"]"#,
            ]),
            transcript_labels: strings(&[
                "transcript", "transkript", "transcription", "transcripción", "trascrizione",
                "transcrição", "transcriptie", "transkrypcja", "расшифровка", "文字起こし",
                "스크립트", "转写文稿",
            ]),
            overflow_controls: strings(&[
                "ytd-watch-metadata ytd-menu-renderer yt-button-shape#button-shape button",
                "ytd-menu-renderer #button-shape button[aria-label]",
            ]),
            overflow_labels: strings(&[
                "more actions", "weitere aktionen", "autres actions", "más acciones",
                "altre azioni", "mais ações", "другие действия", "その他の操作", "추가 작업",
                "更多操作",
            ]),
            menu_items: "ytd-menu-service-item-renderer, tp-yt-paper-item".to_string(),
        }
    }
}

// ===== TIMING =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Timing {
    pub open_attempts: u32,
    pub expand_settle_ms: u32,
    pub menu_settle_ms: u32,
    /// Wait after clicking a control before re-checking the panel.
    pub open_check_ms: u32,
    /// Wait before the next attempt when no control was found at all.
    pub control_missing_retry_ms: u32,
    pub video_ready: RetryBudget,
    pub min_ready_state: u16,
    pub panel_wait: RetryBudget,
    pub url_poll_ms: u32,
    pub navigation_settle_ms: u32,
    pub recheck_delay_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            open_attempts: 5,
            expand_settle_ms: 500,
            menu_settle_ms: 500,
            open_check_ms: 1000,
            control_missing_retry_ms: 2000,
            video_ready: RetryBudget::new(20, 500),
            min_ready_state: 1,
            panel_wait: RetryBudget::new(15, 1000),
            url_poll_ms: 1000,
            navigation_settle_ms: 1000,
            recheck_delay_ms: 500,
        }
    }
}

// ===== KEYS & PAGE =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct KeyBindings {
    pub previous: String,
    pub replay: String,
    pub next: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            previous: "a".to_string(),
            replay: "s".to_string(),
            next: "d".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct VideoPageRules {
    pub host: String,
    pub path: String,
    pub video_param: String,
    /// Also treat attribute mutations as a re-check signal.
    pub observe_attributes: bool,
}

impl Default for VideoPageRules {
    fn default() -> Self {
        Self {
            host: "www.youtube.com".to_string(),
            path: "/watch".to_string(),
            video_param: "v".to_string(),
            observe_attributes: false,
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
