//! Result and error types for probar-element.

use crate::driver::{DriverError, DriverErrorKind};
use crate::locator::Locator;
use thiserror::Error;

/// Result type for element operations
pub type ElementResult<T> = Result<T, ElementError>;

/// Errors surfaced to page-object code.
///
/// Raw [`DriverError`]s never escape: anything not covered by the first three
/// variants arrives as [`ElementError::DriverFault`] with the original kind
/// name and message preserved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementError {
    /// The awaited state was not reached in time
    #[error("Timed out after {timeout_ms}ms waiting for {locator}")]
    WaitTimeout {
        /// Locator that was awaited
        locator: Locator,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// Re-location after staleness found nothing
    #[error("Element for {locator} is gone from the page")]
    ElementGone {
        /// Locator of the lost element
        locator: Locator,
    },

    /// The click target stayed covered after the retry
    #[error("Click on {locator} obstructed: {detail}")]
    ClickObstructed {
        /// Locator of the click target
        locator: Locator,
        /// Driver message from the last attempt
        detail: String,
    },

    /// Any other driver failure
    #[error("Encountered {kind}: {message}")]
    DriverFault {
        /// Original driver error kind
        kind: String,
        /// Original driver message
        message: String,
    },
}

impl ElementError {
    /// Create a driver fault from a kind and message
    #[must_use]
    pub fn driver_fault(kind: &DriverErrorKind, message: impl Into<String>) -> Self {
        Self::DriverFault {
            kind: kind.as_str().to_string(),
            message: message.into(),
        }
    }

    /// Whether this is a wait timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. })
    }

    /// Whether the element is permanently gone
    #[must_use]
    pub const fn is_gone(&self) -> bool {
        matches!(self, Self::ElementGone { .. })
    }

    /// Whether retrying the whole operation later may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. } | Self::ClickObstructed { .. })
    }

    /// The locator involved, for the variants that carry one
    #[must_use]
    pub const fn locator(&self) -> Option<&Locator> {
        match self {
            Self::WaitTimeout { locator, .. }
            | Self::ElementGone { locator }
            | Self::ClickObstructed { locator, .. } => Some(locator),
            Self::DriverFault { .. } => None,
        }
    }
}

impl From<DriverError> for ElementError {
    fn from(err: DriverError) -> Self {
        Self::driver_fault(&err.kind, err.message)
    }
}
