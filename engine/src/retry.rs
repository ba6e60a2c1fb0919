//! Bounded polling used for every wait on the host page.

use crate::page::Page;
use serde::{Deserialize, Serialize};

/// Ceiling and spacing of a bounded wait.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    pub max_attempts: u32,
    pub delay_ms: u32,
}

impl RetryBudget {
    pub const fn new(max_attempts: u32, delay_ms: u32) -> Self {
        Self { max_attempts, delay_ms }
    }
}

/// Evaluates `check` up to `budget.max_attempts` times, sleeping `budget.delay_ms` after
/// every miss. Returns whether the check ever passed.
///
/// No sleep happens after the final miss, so a budget of `n` attempts sleeps at most
/// `n - 1` times.
pub async fn poll_until<P, F>(page: &P, budget: RetryBudget, mut check: F) -> bool
where
    P: Page,
    F: FnMut(&P) -> bool,
{
    for attempt in 0..budget.max_attempts {
        if check(page) {
            return true;
        }
        if attempt + 1 < budget.max_attempts {
            page.sleep(budget.delay_ms).await;
        }
    }
    false
}
