//! Wait Mechanisms
//!
//! Polling waits for element states, evaluated relative to a [`Scope`].
//!
//! The engine polls the scope at a fixed cadence until the requested
//! [`ElementState`] holds or the timeout elapses. Polling blocks the calling
//! thread; there is no cancellation beyond the timeout.
//!
//! - `Present`, `Visible`, `Interactable`: a missing or stale match means
//!   "not yet".
//! - `Invisible`: a missing or stale match means "done".
//! - Any other driver error ends the wait with `DriverFault` immediately.

use crate::config::ElementConfig;
use crate::driver::ElementDriver;
use crate::locator::Locator;
use crate::result::{ElementError, ElementResult};
use crate::scope::Scope;
use std::time::{Duration, Instant};
use tracing::debug;

pub use crate::config::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS, MAX_POLL_INTERVAL_MS};

// =============================================================================
// ELEMENT STATE
// =============================================================================

/// Element states a wait can block on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementState {
    /// At least one match exists in the DOM
    Present,
    /// The first match is displayed
    Visible,
    /// No match, or the first match is not displayed
    Invisible,
    /// The first match is displayed and enabled
    Interactable,
}

impl ElementState {
    /// Human-readable state name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Visible => "visible",
            Self::Invisible => "invisible",
            Self::Interactable => "interactable",
        }
    }

    /// Whether absence of the element satisfies this state
    #[must_use]
    pub const fn satisfied_by_absence(&self) -> bool {
        matches!(self, Self::Invisible)
    }
}

impl std::fmt::Display for ElementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl From<&ElementConfig> for WaitOptions {
    fn from(config: &ElementConfig) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
            poll_interval_ms: config.poll_interval_ms,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration, clamped to one second
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.min(MAX_POLL_INTERVAL_MS))
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Result of a successful wait
#[derive(Debug, Clone, PartialEq)]
pub struct WaitResult<R> {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
    /// First matching element, when the state implies one exists
    pub element: Option<R>,
}

enum Probe<R> {
    Satisfied(Option<R>),
    Pending,
}

// =============================================================================
// WAITER IMPLEMENTATION
// =============================================================================

/// Waiter bound to one driver and one set of options
#[derive(Debug)]
pub struct Waiter<'d, D: ElementDriver> {
    driver: &'d D,
    options: WaitOptions,
}

impl<D: ElementDriver> Clone for Waiter<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ElementDriver> Copy for Waiter<'_, D> {}

impl<'d, D: ElementDriver> Waiter<'d, D> {
    /// Create a waiter
    #[must_use]
    pub const fn new(driver: &'d D, options: WaitOptions) -> Self {
        Self { driver, options }
    }

    /// Options in effect
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Block until `locator` reaches `state` within `scope`.
    ///
    /// The locator is resolved once up front. The predicate is evaluated at
    /// least once, even with a zero timeout.
    pub fn await_state(
        &self,
        scope: &Scope<D::Ref>,
        locator: &Locator,
        state: ElementState,
    ) -> ElementResult<WaitResult<D::Ref>> {
        let locator = locator.resolved();
        let start = Instant::now();
        let timeout = self.options.timeout();
        let poll_interval = self.options.poll_interval();
        debug!(
            locator = %locator,
            state = %state,
            timeout_ms = self.options.timeout_ms,
            "waiting for element"
        );

        loop {
            if let Probe::Satisfied(element) = self.probe(scope, &locator, state)? {
                let elapsed = start.elapsed();
                debug!(
                    locator = %locator,
                    state = %state,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "wait satisfied"
                );
                return Ok(WaitResult {
                    elapsed,
                    waited_for: format!("{locator} to be {state}"),
                    element,
                });
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                break;
            }
            std::thread::sleep(poll_interval.min(timeout - elapsed));
        }

        debug!(
            locator = %locator,
            state = %state,
            timeout_ms = self.options.timeout_ms,
            "wait timed out"
        );
        Err(ElementError::WaitTimeout {
            locator,
            timeout_ms: self.options.timeout_ms,
        })
    }

    fn probe(
        &self,
        scope: &Scope<D::Ref>,
        locator: &Locator,
        state: ElementState,
    ) -> ElementResult<Probe<D::Ref>> {
        let absent = || {
            if state.satisfied_by_absence() {
                Probe::Satisfied(None)
            } else {
                Probe::Pending
            }
        };

        let first = match self.driver.locate_many(scope, locator.by(), locator.value()) {
            Ok(found) => found.into_iter().next(),
            Err(err) if err.is_absent() => return Ok(absent()),
            Err(err) => return Err(err.into()),
        };
        let Some(first) = first else {
            return Ok(absent());
        };

        let holds = match state {
            ElementState::Present => Ok(true),
            ElementState::Visible => self.driver.is_displayed(&first),
            ElementState::Invisible => self.driver.is_displayed(&first).map(|shown| !shown),
            ElementState::Interactable => self.driver.is_displayed(&first).and_then(|shown| {
                if shown {
                    self.driver.is_enabled(&first)
                } else {
                    Ok(false)
                }
            }),
        };

        match holds {
            Ok(true) if state.satisfied_by_absence() => Ok(Probe::Satisfied(None)),
            Ok(true) => Ok(Probe::Satisfied(Some(first))),
            Ok(false) => Ok(Probe::Pending),
            Err(err) if err.is_absent() => Ok(absent()),
            Err(err) => Err(err.into()),
        }
    }

    /// Wait for `locator` to be visible (or merely present)
    pub fn wait_for_element(
        &self,
        scope: &Scope<D::Ref>,
        locator: &Locator,
        visible: bool,
    ) -> ElementResult<WaitResult<D::Ref>> {
        let state = if visible {
            ElementState::Visible
        } else {
            ElementState::Present
        };
        self.await_state(scope, locator, state)
    }

    /// Wait until `locator` is no longer visible (loading spinners, toasts)
    pub fn wait_until_not_visible(
        &self,
        scope: &Scope<D::Ref>,
        locator: &Locator,
    ) -> ElementResult<WaitResult<D::Ref>> {
        self.await_state(scope, locator, ElementState::Invisible)
    }

    /// Whether any element matching `locator` is displayed, without waiting
    pub fn element_exists(&self, scope: &Scope<D::Ref>, locator: &Locator) -> ElementResult<bool> {
        let locator = locator.resolved();
        for element in self
            .driver
            .locate_many(scope, locator.by(), locator.value())?
        {
            match self.driver.is_displayed(&element) {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(err) if err.is_absent() => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(false)
    }

    /// Whether the first element matching `locator` is displayed, without waiting
    pub fn is_element_visible(
        &self,
        scope: &Scope<D::Ref>,
        locator: &Locator,
    ) -> ElementResult<bool> {
        let locator = locator.resolved();
        let shown = self
            .driver
            .locate_one(scope, locator.by(), locator.value())
            .and_then(|element| self.driver.is_displayed(&element));
        match shown {
            Ok(shown) => Ok(shown),
            Err(err) if err.is_absent() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

// =============================================================================
// CONVENIENCE FUNCTIONS
// =============================================================================

/// Block until `locator` reaches `state` within `scope`
pub fn await_state<D: ElementDriver>(
    driver: &D,
    scope: &Scope<D::Ref>,
    locator: &Locator,
    state: ElementState,
    options: &WaitOptions,
) -> ElementResult<WaitResult<D::Ref>> {
    Waiter::new(driver, *options).await_state(scope, locator, state)
}

// =============================================================================
// TESTS
// =============================================================================
