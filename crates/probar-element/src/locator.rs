//! Locator abstraction and selector-kind resolution.
//!
//! A [`Locator`] is a `(By, value)` pair. Callers default to CSS everywhere;
//! [`resolve`] promotes a CSS locator to XPath when the value has an
//! XPath-only shape, so page objects can mix both without spelling out the
//! selector kind.
//!
//! # Heuristic
//!
//! The promotion is substring based, not a selector parser:
//!
//! - value starts with `//` or `./`
//! - value contains `[contains(`
//!
//! A legitimate CSS selector containing the literal text `[contains(` is
//! promoted as well. Existing page objects rely on that, so it stays.

use serde::{Deserialize, Serialize};

/// Prefixes that only occur at the start of XPath expressions
pub const XPATH_PREFIXES: [&str; 2] = ["//", "./"];

/// Substring that marks an XPath predicate
pub const XPATH_CONTAINS_MARKER: &str = "[contains(";

/// Selector kind used to evaluate a locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum By {
    /// CSS selector (e.g., "button.primary")
    #[default]
    Css,
    /// XPath expression
    #[serde(rename = "xpath")]
    XPath,
    /// Element `id` attribute
    Id,
    /// Element `name` attribute
    Name,
    /// Tag name (e.g., "option")
    TagName,
    /// Single class name
    ClassName,
    /// Exact anchor text
    LinkText,
    /// Partial anchor text
    PartialLinkText,
}

impl By {
    /// Strategy name as spoken by WebDriver implementations
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Css => "css selector",
            Self::XPath => "xpath",
            Self::Id => "id",
            Self::Name => "name",
            Self::TagName => "tag name",
            Self::ClassName => "class name",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
        }
    }
}

impl std::fmt::Display for By {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Check whether a selector string has XPath-only shape
#[must_use]
pub fn looks_like_xpath(value: &str) -> bool {
    XPATH_PREFIXES.iter().any(|prefix| value.starts_with(prefix))
        || value.contains(XPATH_CONTAINS_MARKER)
}

/// Resolve the effective selector kind for `value`.
///
/// Only `By::Css` is ever corrected; every other kind is returned unchanged,
/// which makes the function idempotent.
#[must_use]
pub fn resolve(by: By, value: &str) -> By {
    if by == By::Css && looks_like_xpath(value) {
        By::XPath
    } else {
        by
    }
}

/// A locator for finding elements within a scope.
///
/// Also serves as the cache key once resolved: two locators are the same key
/// iff their resolved kind and value match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    by: By,
    value: String,
}

impl Locator {
    /// Create a locator with an explicit selector kind
    #[must_use]
    pub fn new(by: By, value: impl Into<String>) -> Self {
        Self {
            by,
            value: value.into(),
        }
    }

    /// Create a CSS locator (promoted to XPath on resolution if needed)
    #[must_use]
    pub fn css(value: impl Into<String>) -> Self {
        Self::new(By::Css, value)
    }

    /// Create an XPath locator
    #[must_use]
    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(By::XPath, value)
    }

    /// Create an id locator
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self::new(By::Id, value)
    }

    /// Create a name locator
    #[must_use]
    pub fn name(value: impl Into<String>) -> Self {
        Self::new(By::Name, value)
    }

    /// Create a tag-name locator
    #[must_use]
    pub fn tag_name(value: impl Into<String>) -> Self {
        Self::new(By::TagName, value)
    }

    /// Create a class-name locator
    #[must_use]
    pub fn class_name(value: impl Into<String>) -> Self {
        Self::new(By::ClassName, value)
    }

    /// Create a link-text locator
    #[must_use]
    pub fn link_text(value: impl Into<String>) -> Self {
        Self::new(By::LinkText, value)
    }

    /// Selector kind as constructed (before resolution)
    #[must_use]
    pub const fn by(&self) -> By {
        self.by
    }

    /// Selector string
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Return this locator with its kind corrected by [`resolve`]
    #[must_use]
    pub fn resolved(&self) -> Self {
        Self {
            by: resolve(self.by, &self.value),
            value: self.value.clone(),
        }
    }

    /// Whether resolution would change the selector kind
    #[must_use]
    pub fn needs_resolution(&self) -> bool {
        resolve(self.by, &self.value) != self.by
    }
}

impl From<&str> for Locator {
    fn from(value: &str) -> Self {
        Self::css(value)
    }
}

impl From<String> for Locator {
    fn from(value: String) -> Self {
        Self::css(value)
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} locator [ {} ]", self.by, self.value)
    }
}
