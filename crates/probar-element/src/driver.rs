//! ElementDriver - Abstract Browser Query Trait
//!
//! The boundary between this crate and whatever talks to the browser. The
//! session/bootstrap layer supplies an implementation; everything here only
//! issues queries and interactions through it and never closes or
//! reconfigures it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  ElementDriver (Abstract Trait)                                     │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  locate_one / locate_many   ── evaluated relative to a Scope        │
//! │  probe_liveness             ── Stale when the node was replaced     │
//! │  click / send_keys / ...    ── interaction primitives on a Ref      │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  WebDriver client   │   CDP bridge   │   MockDriver (unit tests)    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors carry a [`DriverErrorKind`] named after the W3C WebDriver error
//! codes, so the wait engine and click protocol can classify them without
//! knowing which client produced them.

use crate::locator::By;
use crate::scope::Scope;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Message fragment browsers use when another element occludes a click target
pub const OCCLUSION_MARKER: &str = "would receive the click";

/// Result type for raw driver calls
pub type DriverResult<T> = Result<T, DriverError>;

/// Kind of a raw driver failure
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriverErrorKind {
    /// No element matched the locator
    NoSuchElement,
    /// The reference no longer points at a live node
    StaleElementReference,
    /// Another element would receive the click
    ElementClickIntercepted,
    /// The element cannot be interacted with (hidden, disabled, ...)
    ElementNotInteractable,
    /// The driver's own timeout fired
    Timeout,
    /// Anything else, keyed by the driver's error name
    Other(String),
}

impl DriverErrorKind {
    /// Error code string
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoSuchElement => "no such element",
            Self::StaleElementReference => "stale element reference",
            Self::ElementClickIntercepted => "element click intercepted",
            Self::ElementNotInteractable => "element not interactable",
            Self::Timeout => "timeout",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for DriverErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failure reported by the underlying driver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct DriverError {
    /// Classified kind
    pub kind: DriverErrorKind,
    /// Driver-provided message
    pub message: String,
}

impl DriverError {
    /// Create a driver error
    #[must_use]
    pub fn new(kind: DriverErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// No element matched
    #[must_use]
    pub fn no_such_element(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::NoSuchElement, message)
    }

    /// Reference went stale
    #[must_use]
    pub fn stale(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::StaleElementReference, message)
    }

    /// Click was intercepted by another element
    #[must_use]
    pub fn click_intercepted(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::ElementClickIntercepted, message)
    }

    /// Element not interactable
    #[must_use]
    pub fn not_interactable(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::ElementNotInteractable, message)
    }

    /// Any other driver failure
    #[must_use]
    pub fn other(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::Other(name.into()), message)
    }

    /// Whether no element matched
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == DriverErrorKind::NoSuchElement
    }

    /// Whether the reference went stale
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.kind == DriverErrorKind::StaleElementReference
    }

    /// Whether the element is not there any more, either way
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.is_not_found() || self.is_stale()
    }

    /// Whether another element occludes the click target
    ///
    /// Older drivers report this as a generic error with the telltale
    /// message, so both the kind and the message are checked.
    #[must_use]
    pub fn is_click_intercepted(&self) -> bool {
        self.kind == DriverErrorKind::ElementClickIntercepted
            || self.message.contains(OCCLUSION_MARKER)
    }
}

/// Element position on the page, in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// X coordinate
    pub x: i64,
    /// Y coordinate
    pub y: i64,
}

impl Location {
    /// Create a location
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// The driver query capability.
///
/// Implementations are shared through `Arc` across every page object of one
/// browser session, hence `Send + Sync`. `Ref` is the opaque native element
/// reference; it is cheap to clone and compared only for identity.
pub trait ElementDriver: Send + Sync {
    /// Opaque native element reference
    type Ref: Clone + Debug + PartialEq + Send + Sync;

    /// Locate the first element matching `(by, value)` within `scope`.
    ///
    /// Fails with [`DriverErrorKind::NoSuchElement`] when nothing matches.
    fn locate_one(&self, scope: &Scope<Self::Ref>, by: By, value: &str)
        -> DriverResult<Self::Ref>;

    /// Locate every element matching `(by, value)` within `scope`.
    ///
    /// Returns an empty vector, never `NoSuchElement`, when nothing matches.
    fn locate_many(
        &self,
        scope: &Scope<Self::Ref>,
        by: By,
        value: &str,
    ) -> DriverResult<Vec<Self::Ref>>;

    /// Check that `element` still refers to a live node.
    ///
    /// The default asks for the enabled state and discards the answer, which
    /// is the cheapest round trip most drivers offer.
    fn probe_liveness(&self, element: &Self::Ref) -> DriverResult<()> {
        self.is_enabled(element).map(|_| ())
    }

    /// Click the element
    fn click(&self, element: &Self::Ref) -> DriverResult<()>;

    /// Move the pointer to `element` plus an offset and click there
    fn click_at_offset(&self, element: &Self::Ref, x: i64, y: i64) -> DriverResult<()>;

    /// Double-click the element
    fn double_click(&self, element: &Self::Ref) -> DriverResult<()>;

    /// Move the pointer over the element
    fn hover(&self, element: &Self::Ref) -> DriverResult<()>;

    /// Clear a text input
    fn clear(&self, element: &Self::Ref) -> DriverResult<()>;

    /// Type keys into the element
    fn send_keys(&self, element: &Self::Ref, keys: &str) -> DriverResult<()>;

    /// Submit the form the element belongs to
    fn submit(&self, element: &Self::Ref) -> DriverResult<()>;

    /// Read an HTML attribute
    fn attribute(&self, element: &Self::Ref, name: &str) -> DriverResult<Option<String>>;

    /// Read a DOM property
    fn property(&self, element: &Self::Ref, name: &str) -> DriverResult<serde_json::Value>;

    /// Read a computed CSS value
    fn css_value(&self, element: &Self::Ref, name: &str) -> DriverResult<String>;

    /// Whether the element is rendered visibly
    fn is_displayed(&self, element: &Self::Ref) -> DriverResult<bool>;

    /// Whether the element is enabled
    fn is_enabled(&self, element: &Self::Ref) -> DriverResult<bool>;

    /// Whether an option/checkbox is selected
    fn is_selected(&self, element: &Self::Ref) -> DriverResult<bool>;

    /// Rendered text
    fn text(&self, element: &Self::Ref) -> DriverResult<String>;

    /// Tag name
    fn tag_name(&self, element: &Self::Ref) -> DriverResult<String>;

    /// Position on the page
    fn location(&self, element: &Self::Ref) -> DriverResult<Location>;

    /// Scroll the element into the viewport
    fn scroll_into_view(&self, element: &Self::Ref) -> DriverResult<()>;

    /// Replace the element's inline `style` attribute
    fn apply_style(&self, element: &Self::Ref, style: &str) -> DriverResult<()>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod driver_error_tests {
        use super::*;

        #[test]
        fn test_kind_names() {
            assert_eq!(DriverErrorKind::NoSuchElement.as_str(), "no such element");
            assert_eq!(
                DriverErrorKind::StaleElementReference.as_str(),
                "stale element reference"
            );
            assert_eq!(
                DriverErrorKind::Other("javascript error".into()).as_str(),
                "javascript error"
            );
        }

        #[test]
        fn test_display() {
            let err = DriverError::no_such_element("#missing");
            assert_eq!(err.to_string(), "no such element: #missing");
        }

        #[test]
        fn test_absent_covers_not_found_and_stale() {
            assert!(DriverError::no_such_element("x").is_absent());
            assert!(DriverError::stale("x").is_absent());
            assert!(!DriverError::other("unknown error", "x").is_absent());
        }

        #[test]
        fn test_click_intercepted_by_kind() {
            assert!(DriverError::click_intercepted("covered").is_click_intercepted());
        }

        #[test]
        fn test_click_intercepted_by_message() {
            let err = DriverError::other(
                "unknown error",
                "Element <a> is not clickable at point (10, 20). Other element would receive the click: <div class=\"overlay\">",
            );
            assert!(err.is_click_intercepted());
        }

        #[test]
        fn test_not_interactable_is_not_occlusion() {
            assert!(!DriverError::not_interactable("hidden").is_click_intercepted());
        }
    }

    mod location_tests {
        use super::*;

        #[test]
        fn test_location_new() {
            let location = Location::new(10, -4);
            assert_eq!(location.x, 10);
            assert_eq!(location.y, -4);
            assert_eq!(Location::default(), Location::new(0, 0));
        }
    }
}
