//! Transcript navigation engine
//!
//! Finds the transcript segments rendered by the host video page, works out which one
//! matches the current playback position and seeks to neighbours on demand. Everything
//! here talks to the page through the [`Page`] bridge, so the same code runs in the
//! browser content script and against HTML fixtures in tests.

pub mod activator;
pub mod config;
pub mod lifecycle;
pub mod locator;
pub mod navigation;
pub mod page;
pub mod panel;
pub mod resolver;
pub mod retry;
pub mod segment;
pub mod shortcuts;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ConfigError, NavigatorConfig};
pub use lifecycle::{InitOutcome, MutationResponse, PageLifecycleMonitor, SelfCheck};
pub use navigation::{Command, NavigationController, NavigationOutcome};
pub use page::{FocusContext, Page, PageError, PageLocation};
pub use panel::{PanelOpener, PanelOutcome};
pub use resolver::{ActiveSegment, ResolvedBy};
pub use retry::RetryBudget;
pub use shortcuts::{KeyPress, ShortcutDispatcher};
