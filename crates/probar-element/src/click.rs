//! Click protocol with a single retry for occluded targets.
//!
//! ```text
//!            ┌──────────────────────────────────────────┐
//!            ▼                                          │
//!        Attempt ──ok──► Success                        │
//!            │                                          │
//!            ├─ occluded, first attempt, retry ──► RetryWait
//!            │                                 (scroll, backoff)
//!            ├─ occluded otherwise ──► Failed(ClickObstructed)
//!            └─ anything else ───────► Failed(WaitTimeout | ElementGone | DriverFault)
//! ```
//!
//! With `wait` off the element's live reference is clicked exactly once and
//! every fault, occlusion included, fails as `DriverFault`. The click wait is
//! independent of `ElementConfig::waits_enabled`, which only gates lookups.

use crate::config::ElementConfig;
use crate::driver::{DriverError, ElementDriver};
use crate::element::Element;
use crate::result::{ElementError, ElementResult};
use crate::wait::{ElementState, WaitOptions, Waiter};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Attempt budget: the first click plus one retry
pub const MAX_CLICK_ATTEMPTS: u8 = 2;

/// Options for [`execute_click`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOptions {
    /// Wait for the element to be interactable before clicking
    pub wait: bool,
    /// Interactability timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval for the interactability wait
    pub poll_interval_ms: u64,
    /// Vertical pixel offset; non-zero clicks via pointer move
    pub offset: i64,
    /// Retry once when another element occludes the target
    pub retry: bool,
    /// Pause before the retry in milliseconds
    pub backoff_ms: u64,
}

impl Default for ClickOptions {
    fn default() -> Self {
        Self::from(&ElementConfig::default())
    }
}

impl From<&ElementConfig> for ClickOptions {
    fn from(config: &ElementConfig) -> Self {
        Self {
            wait: true,
            timeout_ms: config.timeout_ms,
            poll_interval_ms: config.poll_interval_ms,
            offset: 0,
            retry: true,
            backoff_ms: config.click_backoff_ms,
        }
    }
}

impl ClickOptions {
    /// Create click options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the interactability wait
    #[must_use]
    pub const fn with_wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    /// Set the interactability timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Click at a vertical offset from the element
    #[must_use]
    pub const fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Enable or disable the occlusion retry
    #[must_use]
    pub const fn with_retry(mut self, retry: bool) -> Self {
        self.retry = retry;
        self
    }

    /// Set the backoff before the retry in milliseconds
    #[must_use]
    pub const fn with_backoff(mut self, backoff_ms: u64) -> Self {
        self.backoff_ms = backoff_ms;
        self
    }

    /// Get backoff as Duration
    #[must_use]
    pub const fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    fn wait_options(&self) -> WaitOptions {
        WaitOptions::new()
            .with_timeout(self.timeout_ms)
            .with_poll_interval(self.poll_interval_ms)
    }
}

/// States of the click protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickState {
    /// About to click
    Attempt,
    /// Occluded once; scroll and back off before the next attempt
    RetryWait {
        /// Driver message of the occluded attempt
        detail: String,
    },
    /// The click landed
    Success,
    /// Terminal failure
    Failed(ElementError),
}

impl ClickState {
    /// Whether no further transitions follow
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed(_))
    }
}

/// Outcome of a successful click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickReport {
    /// Click attempts made
    pub attempts: u8,
    /// Scrolls performed before retries
    pub scrolls: u32,
    /// Total time including waits and backoff
    pub elapsed: Duration,
}

/// Click `element`, waiting and retrying per `options`
pub fn execute_click<D: ElementDriver>(
    element: &Element<D>,
    options: &ClickOptions,
) -> ElementResult<ClickReport> {
    let start = Instant::now();
    let mut attempts: u8 = 0;
    let mut scrolls: u32 = 0;
    let mut state = ClickState::Attempt;

    debug!(
        locator = %element.locator(),
        wait = options.wait,
        offset = options.offset,
        "clicking element"
    );

    while !state.is_terminal() {
        state = match state {
            ClickState::Attempt => {
                attempts += 1;
                next_after_attempt(element, options, attempts)
            }
            ClickState::RetryWait { detail } => {
                warn!(
                    locator = %element.locator(),
                    attempt = attempts,
                    detail = %detail,
                    "click occluded, scrolling and retrying"
                );
                match element.scroll_to() {
                    Ok(()) => {
                        scrolls += 1;
                        std::thread::sleep(options.backoff());
                        ClickState::Attempt
                    }
                    Err(err) => ClickState::Failed(err),
                }
            }
            terminal => terminal,
        };
    }

    match state {
        ClickState::Failed(err) => {
            debug!(locator = %element.locator(), attempts, error = %err, "click failed");
            Err(err)
        }
        _ => {
            let elapsed = start.elapsed();
            info!(
                locator = %element.locator(),
                attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                "click completed"
            );
            Ok(ClickReport {
                attempts,
                scrolls,
                elapsed,
            })
        }
    }
}

fn next_after_attempt<D: ElementDriver>(
    element: &Element<D>,
    options: &ClickOptions,
    attempt: u8,
) -> ClickState {
    if !options.wait {
        return match element.current_ref() {
            Ok(raw) => match element.driver().click(&raw) {
                Ok(()) => ClickState::Success,
                Err(err) => ClickState::Failed(err.into()),
            },
            Err(err) => ClickState::Failed(err),
        };
    }

    let fault = match press_when_interactable(element, options) {
        Ok(Ok(())) => return ClickState::Success,
        Ok(Err(fault)) => fault,
        Err(err) => return ClickState::Failed(err),
    };

    if !fault.is_click_intercepted() {
        return ClickState::Failed(fault.into());
    }
    if options.retry && attempt < MAX_CLICK_ATTEMPTS {
        ClickState::RetryWait {
            detail: fault.message,
        }
    } else {
        ClickState::Failed(ElementError::ClickObstructed {
            locator: element.locator().clone(),
            detail: fault.message,
        })
    }
}

/// Wait until interactable, then click; the inner result is the raw click outcome
///
/// A handle that can no longer be re-located fails as `ElementGone` before
/// any waiting starts.
fn press_when_interactable<D: ElementDriver>(
    element: &Element<D>,
    options: &ClickOptions,
) -> ElementResult<Result<(), DriverError>> {
    let live = element.current_ref()?;
    let driver = element.driver();
    let waited = Waiter::new(driver.as_ref(), options.wait_options()).await_state(
        element.scope(),
        element.locator(),
        ElementState::Interactable,
    )?;
    let target = waited.element.unwrap_or(live);
    Ok(if options.offset == 0 {
        driver.click(&target)
    } else {
        driver.click_at_offset(&target, 0, options.offset)
    })
}
