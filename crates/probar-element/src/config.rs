//! Element configuration.
//!
//! One [`ElementConfig`] is shared by a page and the components under it
//! (components inherit their parent's unless overridden). Suites usually keep
//! it next to their other fixtures in YAML:
//!
//! ```yaml
//! timeout_ms: 8000
//! poll_interval_ms: 250
//! click_backoff_ms: 1000
//! ```
//!
//! Missing keys fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout for element waits (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Upper bound on the polling interval (1 second)
pub const MAX_POLL_INTERVAL_MS: u64 = 1_000;

/// Default timeout for waiting until an element disappears (5 seconds)
pub const DEFAULT_INVISIBLE_TIMEOUT_MS: u64 = 5_000;

/// Default pause before re-clicking an occluded element (2 seconds)
pub const DEFAULT_CLICK_BACKOFF_MS: u64 = 2_000;

/// Default highlight blink (300ms)
pub const DEFAULT_HIGHLIGHT_MS: u64 = 300;

/// Timing and behaviour knobs for elements, caches and page objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementConfig {
    /// Timeout for visibility/presence/interactability waits
    pub timeout_ms: u64,
    /// Polling interval for waits (clamped to one second)
    pub poll_interval_ms: u64,
    /// Timeout for waits until an element is no longer visible
    pub invisible_timeout_ms: u64,
    /// Pause between an occluded click and its retry
    pub click_backoff_ms: u64,
    /// How long `highlight` keeps the highlight style applied
    pub highlight_ms: u64,
    /// Whether lookups wait before querying
    pub waits_enabled: bool,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            invisible_timeout_ms: DEFAULT_INVISIBLE_TIMEOUT_MS,
            click_backoff_ms: DEFAULT_CLICK_BACKOFF_MS,
            highlight_ms: DEFAULT_HIGHLIGHT_MS,
            waits_enabled: true,
        }
    }
}

impl ElementConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from YAML
    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml_ng::Error> {
        serde_yaml_ng::from_str(source)
    }

    /// Parse a config from JSON
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Set wait timeout in milliseconds
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

    /// Set the disappearance timeout in milliseconds
    #[must_use]
    pub const fn with_invisible_timeout(mut self, timeout_ms: u64) -> Self {
        self.invisible_timeout_ms = timeout_ms;
        self
    }

    /// Set the occluded-click backoff in milliseconds
    #[must_use]
    pub const fn with_click_backoff(mut self, backoff_ms: u64) -> Self {
        self.click_backoff_ms = backoff_ms;
        self
    }

    /// Set the highlight duration in milliseconds
    #[must_use]
    pub const fn with_highlight(mut self, highlight_ms: u64) -> Self {
        self.highlight_ms = highlight_ms;
        self
    }

    /// Enable or disable waiting before lookups
    #[must_use]
    pub const fn with_waits(mut self, enabled: bool) -> Self {
        self.waits_enabled = enabled;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration, clamped to [`MAX_POLL_INTERVAL_MS`]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.min(MAX_POLL_INTERVAL_MS))
    }

    /// Get disappearance timeout as Duration
    #[must_use]
    pub const fn invisible_timeout(&self) -> Duration {
        Duration::from_millis(self.invisible_timeout_ms)
    }

    /// Get click backoff as Duration
    #[must_use]
    pub const fn click_backoff(&self) -> Duration {
        Duration::from_millis(self.click_backoff_ms)
    }

    /// Get highlight duration as Duration
    #[must_use]
    pub const fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ElementConfig::default();
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(config.click_backoff(), Duration::from_secs(2));
        assert!(config.waits_enabled);
    }

    #[test]
    fn test_builder_chain() {
        let config = ElementConfig::new()
            .with_timeout(100)
            .with_poll_interval(10)
            .with_invisible_timeout(50)
            .with_click_backoff(5)
            .with_highlight(1)
            .with_waits(false);
        assert_eq!(config.timeout(), Duration::from_millis(100));
        assert_eq!(config.poll_interval(), Duration::from_millis(10));
        assert_eq!(config.invisible_timeout(), Duration::from_millis(50));
        assert_eq!(config.click_backoff(), Duration::from_millis(5));
        assert_eq!(config.highlight(), Duration::from_millis(1));
        assert!(!config.waits_enabled);
    }

    #[test]
    fn test_poll_interval_is_clamped() {
        let config = ElementConfig::new().with_poll_interval(5_000);
        assert_eq!(config.poll_interval(), Duration::from_millis(MAX_POLL_INTERVAL_MS));
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = ElementConfig::from_yaml("timeout_ms: 8000\nwaits_enabled: false\n").unwrap();
        assert_eq!(config.timeout_ms, 8000);
        assert!(!config.waits_enabled);
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }

    #[test]
    fn test_from_json() {
        let config = ElementConfig::from_json(r#"{"click_backoff_ms": 10}"#).unwrap();
        assert_eq!(config.click_backoff_ms, 10);
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_from_yaml_rejects_wrong_types() {
        assert!(ElementConfig::from_yaml("timeout_ms: soon").is_err());
    }
}
