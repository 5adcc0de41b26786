//! Page Object Model Support
//!
//! Pages and components form an explicit scope tree. A [`Page`] queries the
//! whole document; a [`Component`] is rooted at one element of its parent and
//! only searches below it. Each node owns an [`ElementCache`], so properties
//! like `fn save_button(&self)` can call [`DomObject::element`] freely.
//!
//! ```text
//! Page (depth 0, Scope::Root)
//!  └── Component "form#checkout" (depth 1, Scope::Element(form))
//!       └── Component ".address" (depth 2, Scope::Element(address))
//! ```
//!
//! # Example
//!
//! ```ignore
//! struct LoginForm<'p, D: ElementDriver>(Component<'p, D>);
//!
//! impl<'p, D: ElementDriver> LoginForm<'p, D> {
//!     fn login(&self, user: &str, password: &str) -> ElementResult<()> {
//!         self.0.element(&Locator::name("user"), true)?.set_value(user, false)?;
//!         self.0.element(&Locator::name("password"), true)?.set_value(password, true)?;
//!         self.0.element(&Locator::css("button[type=submit]"), true)?.click()?;
//!         Ok(())
//!     }
//! }
//! ```

use crate::cache::ElementCache;
use crate::click::ClickReport;
use crate::config::ElementConfig;
use crate::driver::ElementDriver;
use crate::element::Element;
use crate::locator::Locator;
use crate::result::ElementResult;
use crate::scope::Scope;
use crate::wait::{WaitOptions, WaitResult, Waiter};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Options for [`DomObject::find_element`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindOptions {
    /// Wait for the element before querying (ignored when waits are disabled)
    pub wait: bool,
    /// Timeout override in milliseconds
    pub timeout_ms: Option<u64>,
    /// Wait for visibility rather than mere presence
    pub visible: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            wait: true,
            timeout_ms: None,
            visible: true,
        }
    }
}

impl FindOptions {
    /// Create find options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the wait
    #[must_use]
    pub const fn with_wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    /// Override the wait timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Wait for visibility or presence
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// A node of the page-object tree: a page or a component
pub trait DomObject<D: ElementDriver> {
    /// Shared driver
    fn driver(&self) -> &Arc<D>;

    /// Timing configuration
    fn config(&self) -> &ElementConfig;

    /// Scope queries run in (a component resolves its root element)
    fn scope(&self) -> ElementResult<Scope<D::Ref>>;

    /// Cache owned by this node
    fn cache(&self) -> &ElementCache<D>;

    /// The page at the top of the tree
    fn page(&self) -> &Page<D>;

    /// Distance from the page (the page itself is 0)
    fn depth(&self) -> usize;

    /// Waiter using this node's timing
    fn waiter(&self) -> Waiter<'_, D> {
        Waiter::new(self.driver().as_ref(), WaitOptions::from(self.config()))
    }

    /// Cached element for `locator`, re-fetched when its node went away
    fn element(&self, locator: &Locator, visible: bool) -> ElementResult<Rc<Element<D>>> {
        self.cache().get(&self.scope()?, locator, visible)
    }

    /// Wait for `locator` to be visible (or present) in this scope
    fn wait_for_element(
        &self,
        locator: &Locator,
        visible: bool,
    ) -> ElementResult<WaitResult<D::Ref>> {
        self.waiter()
            .wait_for_element(&self.scope()?, locator, visible)
    }

    /// Wait until `locator` is no longer visible in this scope
    fn wait_until_not_visible(&self, locator: &Locator) -> ElementResult<WaitResult<D::Ref>> {
        let options = WaitOptions::from(self.config()).with_timeout(self.config().invisible_timeout_ms);
        Waiter::new(self.driver().as_ref(), options).wait_until_not_visible(&self.scope()?, locator)
    }

    /// Whether any match of `locator` is displayed in this scope
    fn element_exists(&self, locator: &Locator) -> ElementResult<bool> {
        self.waiter().element_exists(&self.scope()?, locator)
    }

    /// Whether the first match of `locator` is displayed in this scope
    fn is_element_visible(&self, locator: &Locator) -> ElementResult<bool> {
        self.waiter().is_element_visible(&self.scope()?, locator)
    }

    /// Fresh, uncached element for `locator` in this scope
    fn find_element(&self, locator: &Locator, options: &FindOptions) -> ElementResult<Element<D>> {
        let scope = self.scope()?;
        let locator = locator.resolved();
        if options.wait && self.config().waits_enabled {
            let mut wait = WaitOptions::from(self.config());
            if let Some(timeout_ms) = options.timeout_ms {
                wait = wait.with_timeout(timeout_ms);
            }
            Waiter::new(self.driver().as_ref(), wait).wait_for_element(
                &scope,
                &locator,
                options.visible,
            )?;
        }
        let raw = self
            .driver()
            .locate_one(&scope, locator.by(), locator.value())?;
        Ok(Element::new(
            Arc::clone(self.driver()),
            &locator,
            scope,
            raw,
            *self.config(),
        ))
    }

    /// Every element matching `locator` in this scope, without waiting
    fn find_elements(&self, locator: &Locator) -> ElementResult<Vec<Element<D>>> {
        let scope = self.scope()?;
        let locator = locator.resolved();
        let found = self
            .driver()
            .locate_many(&scope, locator.by(), locator.value())?;
        Ok(found
            .into_iter()
            .map(|raw| {
                Element::new(
                    Arc::clone(self.driver()),
                    &locator,
                    scope.clone(),
                    raw,
                    *self.config(),
                )
            })
            .collect())
    }
}

// =============================================================================
// PAGE
// =============================================================================

/// Root of a page-object tree, searching the whole document
pub struct Page<D: ElementDriver> {
    driver: Arc<D>,
    config: ElementConfig,
    cache: ElementCache<D>,
}

impl<D: ElementDriver> Page<D> {
    /// Create a page with the default config
    #[must_use]
    pub fn new(driver: Arc<D>) -> Self {
        Self::with_config(driver, ElementConfig::default())
    }

    /// Create a page with `config`
    #[must_use]
    pub fn with_config(driver: Arc<D>, config: ElementConfig) -> Self {
        let cache = ElementCache::new(Arc::clone(&driver), config);
        Self {
            driver,
            config,
            cache,
        }
    }

    /// Component rooted at `locator` on this page
    #[must_use]
    pub fn component(&self, locator: impl Into<Locator>) -> Component<'_, D> {
        Component::new(self, locator)
    }
}

impl<D: ElementDriver> DomObject<D> for Page<D> {
    fn driver(&self) -> &Arc<D> {
        &self.driver
    }

    fn config(&self) -> &ElementConfig {
        &self.config
    }

    fn scope(&self) -> ElementResult<Scope<D::Ref>> {
        Ok(Scope::Root)
    }

    fn cache(&self) -> &ElementCache<D> {
        &self.cache
    }

    fn page(&self) -> &Page<D> {
        self
    }

    fn depth(&self) -> usize {
        0
    }
}

impl<D: ElementDriver> fmt::Debug for Page<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// COMPONENT
// =============================================================================

/// Part of a page rooted at one element of its parent
pub struct Component<'p, D: ElementDriver> {
    parent: &'p dyn DomObject<D>,
    locator: Locator,
    visible: bool,
    config: ElementConfig,
    cache: ElementCache<D>,
}

impl<'p, D: ElementDriver> Component<'p, D> {
    /// Component rooted at `locator` within `parent`, inheriting its config
    #[must_use]
    pub fn new(parent: &'p dyn DomObject<D>, locator: impl Into<Locator>) -> Self {
        let config = *parent.config();
        Self {
            parent,
            locator: locator.into().resolved(),
            visible: true,
            config,
            cache: ElementCache::new(Arc::clone(parent.driver()), config),
        }
    }

    /// Whether the root must be visible (default) or merely present
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Override the inherited config
    #[must_use]
    pub fn with_config(mut self, config: ElementConfig) -> Self {
        self.config = config;
        self.cache = ElementCache::new(Arc::clone(self.parent.driver()), config);
        self
    }

    /// Nested component rooted at `locator` inside this one
    #[must_use]
    pub fn component(&self, locator: impl Into<Locator>) -> Component<'_, D> {
        Component::new(self, locator)
    }

    /// Locator of the root element (resolved)
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Parent node
    #[must_use]
    pub fn parent(&self) -> &'p dyn DomObject<D> {
        self.parent
    }

    /// Root element, through the parent's cache
    pub fn root(&self) -> ElementResult<Rc<Element<D>>> {
        self.root_with_visibility(self.visible)
    }

    /// Root element, waiting for visibility or presence as asked
    pub fn root_with_visibility(&self, visible: bool) -> ElementResult<Rc<Element<D>>> {
        self.parent.element(&self.locator, visible)
    }

    /// Wait for the root element to appear in the parent
    pub fn wait_for_self(&self) -> ElementResult<WaitResult<D::Ref>> {
        Waiter::new(self.driver().as_ref(), WaitOptions::from(&self.config)).wait_for_element(
            &self.parent.scope()?,
            &self.locator,
            self.visible,
        )
    }

    /// Wait until the root element is gone or hidden
    pub fn wait_until_absent(&self) -> ElementResult<WaitResult<D::Ref>> {
        Waiter::new(self.driver().as_ref(), WaitOptions::from(&self.config))
            .wait_until_not_visible(&self.parent.scope()?, &self.locator)
    }

    /// Click the root element
    pub fn click(&self) -> ElementResult<ClickReport> {
        self.root()?.click()
    }

    /// Clear the root element
    pub fn clear(&self) -> ElementResult<()> {
        self.root()?.clear()
    }

    /// Attribute of the root element
    pub fn get_attribute(&self, name: &str) -> ElementResult<Option<String>> {
        self.root()?.get_attribute(name)
    }

    /// Whether the root element is selected
    pub fn is_selected(&self) -> ElementResult<bool> {
        self.root()?.is_selected()
    }

    /// Whether the root element is enabled
    pub fn is_enabled(&self) -> ElementResult<bool> {
        self.root()?.is_enabled()
    }

    /// Whether the root element is displayed (only presence is awaited)
    pub fn is_displayed(&self) -> ElementResult<bool> {
        self.root_with_visibility(false)?.is_displayed()
    }

    /// Text of the root element
    pub fn text(&self) -> ElementResult<String> {
        self.root()?.text()
    }

    /// Type into the root element
    pub fn send_keys(&self, keys: &str) -> ElementResult<()> {
        self.root()?.send_keys(keys)
    }

    /// Set the root element's value
    pub fn set_value(&self, text: &str, tab: bool) -> ElementResult<()> {
        self.root()?.set_value(text, tab)
    }
}

impl<D: ElementDriver> DomObject<D> for Component<'_, D> {
    fn driver(&self) -> &Arc<D> {
        self.parent.driver()
    }

    fn config(&self) -> &ElementConfig {
        &self.config
    }

    fn scope(&self) -> ElementResult<Scope<D::Ref>> {
        Ok(Scope::Element(self.root()?.current_ref()?))
    }

    fn cache(&self) -> &ElementCache<D> {
        &self.cache
    }

    fn page(&self) -> &Page<D> {
        self.parent.page()
    }

    fn depth(&self) -> usize {
        self.parent.depth() + 1
    }
}

impl<D: ElementDriver> fmt::Display for Component<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Component rooted at {}", self.locator)?;
        if self.depth() > 1 {
            write!(f, ", depth {}", self.depth())?;
        }
        write!(f, ">")
    }
}

impl<D: ElementDriver> fmt::Debug for Component<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("locator", &self.locator)
            .field("visible", &self.visible)
            .field("depth", &self.depth())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================
