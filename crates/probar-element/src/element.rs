//! Self-healing element handles.
//!
//! An [`Element`] remembers the locator and scope it was found with. Every
//! operation first probes the stored reference; when the node was replaced
//! (a framework re-render, a partial page update) the handle re-runs the
//! original query once, swaps the fresh reference in, and carries on. Callers
//! keep using the same handle throughout.
//!
//! ```text
//! operation ──► probe_liveness(raw)
//!                 │ ok           │ stale
//!                 ▼              ▼
//!              driver op     locate_one(scope, locator)
//!                              │ found        │ not found / stale
//!                              ▼              ▼
//!                          swap raw,      ElementGone
//!                          driver op
//! ```

use crate::click::{execute_click, ClickOptions, ClickReport};
use crate::config::ElementConfig;
use crate::driver::{DriverResult, ElementDriver, Location};
use crate::locator::Locator;
use crate::result::{ElementError, ElementResult};
use crate::scope::Scope;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// WebDriver key codes for special keys
pub mod keys {
    /// Tab
    pub const TAB: &str = "\u{e004}";
    /// Return
    pub const RETURN: &str = "\u{e006}";
    /// Enter
    pub const ENTER: &str = "\u{e007}";
    /// Escape
    pub const ESCAPE: &str = "\u{e00c}";
    /// Backspace
    pub const BACKSPACE: &str = "\u{e003}";
    /// Arrow down
    pub const ARROW_DOWN: &str = "\u{e015}";
}

/// Inline style applied while an element is highlighted
pub const HIGHLIGHT_STYLE: &str = "background: yellow; border: 2px solid red;";

/// A located element that re-locates itself when its reference goes stale
pub struct Element<D: ElementDriver> {
    driver: Arc<D>,
    locator: Locator,
    scope: Scope<D::Ref>,
    raw: RefCell<D::Ref>,
    config: ElementConfig,
}

impl<D: ElementDriver> Element<D> {
    /// Wrap a reference obtained by querying `locator` within `scope`
    #[must_use]
    pub fn new(
        driver: Arc<D>,
        locator: &Locator,
        scope: Scope<D::Ref>,
        raw: D::Ref,
        config: ElementConfig,
    ) -> Self {
        Self {
            driver,
            locator: locator.resolved(),
            scope,
            raw: RefCell::new(raw),
            config,
        }
    }

    /// Locator this handle re-locates with (already resolved)
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Scope the element was found in
    #[must_use]
    pub const fn scope(&self) -> &Scope<D::Ref> {
        &self.scope
    }

    /// Shared driver
    #[must_use]
    pub const fn driver(&self) -> &Arc<D> {
        &self.driver
    }

    /// Configuration inherited from the owner
    #[must_use]
    pub const fn config(&self) -> &ElementConfig {
        &self.config
    }

    /// Reference as last stored, without a liveness check
    pub(crate) fn raw_ref(&self) -> D::Ref {
        self.raw.borrow().clone()
    }

    /// A live reference to the element.
    ///
    /// Probes the stored reference and re-locates once if it went stale.
    pub fn current_ref(&self) -> ElementResult<D::Ref> {
        let raw = self.raw_ref();
        match self.driver.probe_liveness(&raw) {
            Ok(()) => Ok(raw),
            Err(err) if err.is_absent() => self.relocate(),
            Err(err) => Err(err.into()),
        }
    }

    fn relocate(&self) -> ElementResult<D::Ref> {
        debug!(locator = %self.locator, "stale reference, re-locating");
        match self
            .driver
            .locate_one(&self.scope, self.locator.by(), self.locator.value())
        {
            Ok(fresh) => {
                *self.raw.borrow_mut() = fresh.clone();
                Ok(fresh)
            }
            Err(err) if err.is_absent() => {
                warn!(locator = %self.locator, error = %err, "element gone after re-render");
                Err(ElementError::ElementGone {
                    locator: self.locator.clone(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn with_ref<T>(&self, op: impl FnOnce(&D, &D::Ref) -> DriverResult<T>) -> ElementResult<T> {
        let raw = self.current_ref()?;
        op(&*self.driver, &raw).map_err(Into::into)
    }

    /// Read a boolean, reporting `false` when the element is gone
    fn flag(&self, op: impl FnOnce(&D, &D::Ref) -> DriverResult<bool>) -> ElementResult<bool> {
        let raw = match self.current_ref() {
            Ok(raw) => raw,
            Err(ElementError::ElementGone { .. }) => return Ok(false),
            Err(err) => return Err(err),
        };
        match op(&*self.driver, &raw) {
            Ok(value) => Ok(value),
            Err(err) if err.is_absent() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Rendered text
    pub fn text(&self) -> ElementResult<String> {
        self.with_ref(|driver, raw| driver.text(raw))
    }

    /// Tag name
    pub fn tag_name(&self) -> ElementResult<String> {
        self.with_ref(|driver, raw| driver.tag_name(raw))
    }

    /// Whether the element is displayed; `false` once it is gone
    pub fn is_displayed(&self) -> ElementResult<bool> {
        self.flag(|driver, raw| driver.is_displayed(raw))
    }

    /// Whether the element is enabled; `false` once it is gone
    pub fn is_enabled(&self) -> ElementResult<bool> {
        self.flag(|driver, raw| driver.is_enabled(raw))
    }

    /// Whether the option/checkbox is selected
    pub fn is_selected(&self) -> ElementResult<bool> {
        self.with_ref(|driver, raw| driver.is_selected(raw))
    }

    /// HTML attribute value
    pub fn get_attribute(&self, name: &str) -> ElementResult<Option<String>> {
        self.with_ref(|driver, raw| driver.attribute(raw, name))
    }

    /// DOM property value
    pub fn get_property(&self, name: &str) -> ElementResult<serde_json::Value> {
        self.with_ref(|driver, raw| driver.property(raw, name))
    }

    /// Current `value` attribute, empty when unset
    pub fn value(&self) -> ElementResult<String> {
        Ok(self.get_attribute("value")?.unwrap_or_default())
    }

    /// Computed CSS value
    pub fn css_value(&self, name: &str) -> ElementResult<String> {
        self.with_ref(|driver, raw| driver.css_value(raw, name))
    }

    /// Position on the page
    pub fn location(&self) -> ElementResult<Location> {
        self.with_ref(|driver, raw| driver.location(raw))
    }

    // =========================================================================
    // Interactions
    // =========================================================================

    /// Click with the options derived from this element's config.
    ///
    /// The click waits for the locator to become interactable and then
    /// clicks the first match in this element's scope. When several
    /// elements share the locator that may not be this handle's node; use
    /// [`ClickOptions::with_wait`] set to `false` to click this node directly.
    pub fn click(&self) -> ElementResult<ClickReport> {
        self.click_with(&ClickOptions::from(&self.config))
    }

    /// Click through the retrying click protocol
    pub fn click_with(&self, options: &ClickOptions) -> ElementResult<ClickReport> {
        execute_click(self, options)
    }

    /// Type keys into the element
    pub fn send_keys(&self, keys: &str) -> ElementResult<()> {
        self.with_ref(|driver, raw| driver.send_keys(raw, keys))
    }

    /// Clear a text input
    pub fn clear(&self) -> ElementResult<()> {
        self.with_ref(|driver, raw| driver.clear(raw))
    }

    /// Submit the enclosing form
    pub fn submit(&self) -> ElementResult<()> {
        self.with_ref(|driver, raw| driver.submit(raw))
    }

    /// Click, clear, type `text`, optionally press Tab
    pub fn set_value(&self, text: &str, tab: bool) -> ElementResult<()> {
        self.click()?;
        self.clear()?;
        self.send_keys(text)?;
        if tab {
            self.send_keys(keys::TAB)?;
        }
        Ok(())
    }

    /// Move the pointer over the element
    pub fn hover(&self) -> ElementResult<()> {
        self.with_ref(|driver, raw| driver.hover(raw))
    }

    /// Double-click the element
    pub fn double_click(&self) -> ElementResult<()> {
        self.with_ref(|driver, raw| driver.double_click(raw))
    }

    /// Scroll the element into the viewport
    pub fn scroll_to(&self) -> ElementResult<()> {
        self.with_ref(|driver, raw| driver.scroll_into_view(raw))
    }

    /// Blink the element: apply [`HIGHLIGHT_STYLE`], pause, restore
    pub fn highlight(&self) -> ElementResult<()> {
        let original = self.get_attribute("style")?.unwrap_or_default();
        self.with_ref(|driver, raw| driver.apply_style(raw, HIGHLIGHT_STYLE))?;
        std::thread::sleep(self.config.highlight());
        self.with_ref(|driver, raw| driver.apply_style(raw, &original))
    }

    // =========================================================================
    // Descendants
    // =========================================================================

    /// First descendant matching `locator`
    ///
    /// A missing descendant is a [`ElementError::DriverFault`], since the
    /// caller asked for one without waiting.
    pub fn find_descendant(&self, locator: &Locator) -> ElementResult<Self> {
        let locator = locator.resolved();
        let scope = Scope::Element(self.current_ref()?);
        let raw = self
            .driver
            .locate_one(&scope, locator.by(), locator.value())?;
        Ok(Self::new(
            Arc::clone(&self.driver),
            &locator,
            scope,
            raw,
            self.config,
        ))
    }

    /// Every descendant matching `locator`, in document order
    pub fn find_descendants(&self, locator: &Locator) -> ElementResult<Vec<Self>> {
        let locator = locator.resolved();
        let scope = Scope::Element(self.current_ref()?);
        let found = self
            .driver
            .locate_many(&scope, locator.by(), locator.value())?;
        Ok(found
            .into_iter()
            .map(|raw| {
                Self::new(
                    Arc::clone(&self.driver),
                    &locator,
                    scope.clone(),
                    raw,
                    self.config,
                )
            })
            .collect())
    }

    fn text_equals(&self, expected: &str) -> bool {
        self.text().is_ok_and(|text| text == expected)
    }
}

impl<D: ElementDriver> fmt::Display for Element<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Element for {}>", self.locator)
    }
}

impl<D: ElementDriver> fmt::Debug for Element<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("locator", &self.locator)
            .field("scope", &self.scope)
            .field("raw", &self.raw.borrow())
            .finish_non_exhaustive()
    }
}

impl<D: ElementDriver> PartialEq<str> for Element<D> {
    fn eq(&self, other: &str) -> bool {
        self.text_equals(other)
    }
}

impl<D: ElementDriver> PartialEq<&str> for Element<D> {
    fn eq(&self, other: &&str) -> bool {
        self.text_equals(other)
    }
}

impl<D: ElementDriver> PartialEq<String> for Element<D> {
    fn eq(&self, other: &String) -> bool {
        self.text_equals(other)
    }
}

macro_rules! impl_text_eq_for_int {
    ($($int:ty),*) => {
        $(
            impl<D: ElementDriver> PartialEq<$int> for Element<D> {
                fn eq(&self, other: &$int) -> bool {
                    self.text_equals(&other.to_string())
                }
            }
        )*
    };
}

impl_text_eq_for_int!(i32, i64, u32, u64, usize);
