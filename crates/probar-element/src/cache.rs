//! Per-scope element cache.
//!
//! Each page and component owns one [`ElementCache`]. Repeated lookups of the
//! same locator hand back the same [`Rc<Element>`] without touching the
//! driver beyond a liveness probe; an entry whose reference stopped resolving
//! is evicted and rebuilt through the wait engine.

use crate::config::ElementConfig;
use crate::driver::ElementDriver;
use crate::element::Element;
use crate::locator::Locator;
use crate::result::ElementResult;
use crate::scope::Scope;
use crate::wait::{ElementState, WaitOptions, Waiter};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

/// Locator-keyed element cache owned by one scope
pub struct ElementCache<D: ElementDriver> {
    driver: Arc<D>,
    config: ElementConfig,
    entries: RefCell<HashMap<Locator, Rc<Element<D>>>>,
}

impl<D: ElementDriver> ElementCache<D> {
    /// Create an empty cache
    #[must_use]
    pub fn new(driver: Arc<D>, config: ElementConfig) -> Self {
        Self {
            driver,
            config,
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Configuration handed to cached elements
    #[must_use]
    pub const fn config(&self) -> &ElementConfig {
        &self.config
    }

    /// Live element for `locator` within `scope`, waiting with the cache's config
    pub fn get(
        &self,
        scope: &Scope<D::Ref>,
        locator: &Locator,
        require_visible: bool,
    ) -> ElementResult<Rc<Element<D>>> {
        self.get_with(scope, locator, require_visible, &WaitOptions::from(&self.config))
    }

    /// Live element for `locator` within `scope`.
    ///
    /// A hit is probed first and evicted when its node is gone. A miss waits
    /// for the element (visible, or merely present) when waits are enabled,
    /// then queries once and caches the result.
    pub fn get_with(
        &self,
        scope: &Scope<D::Ref>,
        locator: &Locator,
        require_visible: bool,
        options: &WaitOptions,
    ) -> ElementResult<Rc<Element<D>>> {
        let locator = locator.resolved();

        if let Some(hit) = self.lookup(&locator)? {
            return Ok(hit);
        }

        if self.config.waits_enabled {
            let state = if require_visible {
                ElementState::Visible
            } else {
                ElementState::Present
            };
            Waiter::new(self.driver.as_ref(), *options).await_state(scope, &locator, state)?;
        }

        let raw = self
            .driver
            .locate_one(scope, locator.by(), locator.value())?;
        let element = Rc::new(Element::new(
            Arc::clone(&self.driver),
            &locator,
            scope.clone(),
            raw,
            self.config,
        ));
        debug!(locator = %locator, "cached element");
        let _ = self
            .entries
            .borrow_mut()
            .insert(locator, Rc::clone(&element));
        Ok(element)
    }

    fn lookup(&self, locator: &Locator) -> ElementResult<Option<Rc<Element<D>>>> {
        let Some(hit) = self.entries.borrow().get(locator).cloned() else {
            return Ok(None);
        };
        match self.driver.probe_liveness(&hit.raw_ref()) {
            Ok(()) => Ok(Some(hit)),
            Err(err) if err.is_absent() => {
                debug!(locator = %locator, error = %err, "evicting stale cache entry");
                let _ = self.entries.borrow_mut().remove(locator);
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Drop the entry for `locator`; returns whether one existed
    pub fn invalidate(&self, locator: &Locator) -> bool {
        self.entries.borrow_mut().remove(&locator.resolved()).is_some()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Whether an entry exists for `locator` (without probing it)
    #[must_use]
    pub fn contains(&self, locator: &Locator) -> bool {
        self.entries.borrow().contains_key(&locator.resolved())
    }
}

impl<D: ElementDriver> std::fmt::Debug for ElementCache<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementCache")
            .field("config", &self.config)
            .field("entries", &self.entries.borrow().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::DriverError;
    use crate::mock::{MockDriver, MockElement};
    use crate::result::ElementError;

    fn config() -> ElementConfig {
        ElementConfig::new().with_timeout(100).with_poll_interval(10)
    }

    fn setup() -> (Arc<MockDriver>, usize, ElementCache<MockDriver>) {
        let driver = Arc::new(MockDriver::new());
        let node = driver.add(
            MockElement::new("h1")
                .with_text("Title")
                .matching(Locator::css("h1")),
        );
        let cache = ElementCache::new(Arc::clone(&driver), config());
        (driver, node, cache)
    }

    mod identity_tests {
        use super::*;

        #[test]
        fn test_repeated_get_returns_same_handle() {
            let (driver, _, cache) = setup();
            let first = cache.get(&Scope::Root, &Locator::css("h1"), true).unwrap();
            let locates = driver.counts().locates();
            let second = cache.get(&Scope::Root, &Locator::css("h1"), true).unwrap();
            assert!(Rc::ptr_eq(&first, &second));
            assert_eq!(driver.counts().locates(), locates);
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn test_key_is_resolved_locator() {
            let (driver, _, cache) = setup();
            driver.add(MockElement::new("a").matching(Locator::xpath("//a")));
            let first = cache.get(&Scope::Root, &Locator::css("//a"), false).unwrap();
            let second = cache.get(&Scope::Root, &Locator::xpath("//a"), false).unwrap();
            assert!(Rc::ptr_eq(&first, &second));
            assert!(cache.contains(&Locator::css("//a")));
        }

        #[test]
        fn test_miss_without_waits_queries_once() {
            let driver = Arc::new(MockDriver::new());
            driver.add(MockElement::new("h1").matching(Locator::css("h1")));
            let cache = ElementCache::new(Arc::clone(&driver), config().with_waits(false));
            cache.get(&Scope::Root, &Locator::css("h1"), true).unwrap();
            assert_eq!(driver.counts().locate_many, 0);
            assert_eq!(driver.counts().locate_one, 1);
        }
    }

    mod eviction_tests {
        use super::*;

        #[test]
        fn test_rerendered_entry_is_rebuilt() {
            let (driver, node, cache) = setup();
            let first = cache.get(&Scope::Root, &Locator::css("h1"), true).unwrap();
            driver.rerender(node);
            let second = cache.get(&Scope::Root, &Locator::css("h1"), true).unwrap();
            assert!(!Rc::ptr_eq(&first, &second));
            assert_eq!(second.text().unwrap(), "Title");
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn test_detached_entry_times_out() {
            let (driver, node, cache) = setup();
            cache.get(&Scope::Root, &Locator::css("h1"), true).unwrap();
            driver.detach(node);
            let err = cache.get(&Scope::Root, &Locator::css("h1"), true).unwrap_err();
            assert!(err.is_timeout());
            assert!(cache.is_empty());
        }

        #[test]
        fn test_invalidate_and_clear() {
            let (_, _, cache) = setup();
            cache.get(&Scope::Root, &Locator::css("h1"), true).unwrap();
            assert!(cache.invalidate(&Locator::css("h1")));
            assert!(!cache.invalidate(&Locator::css("h1")));
            cache.get(&Scope::Root, &Locator::css("h1"), true).unwrap();
            cache.clear();
            assert!(cache.is_empty());
        }

        #[test]
        fn test_cached_handle_heals_itself() {
            let (driver, node, cache) = setup();
            let element = cache.get(&Scope::Root, &Locator::css("h1"), true).unwrap();
            driver.reset_counts();
            driver.rerender(node);
            assert_eq!(element.text().unwrap(), "Title");
            assert_eq!(driver.counts().locate_one, 1);
        }
    }

    mod failure_tests {
        use super::*;

        #[test]
        fn test_invisible_element_times_out() {
            let driver = Arc::new(MockDriver::new());
            driver.add(MockElement::new("div").matching(Locator::css(".x")).hidden());
            let cache = ElementCache::new(Arc::clone(&driver), config());
            let err = cache.get(&Scope::Root, &Locator::css(".x"), true).unwrap_err();
            assert!(err.is_timeout());
            assert!(cache.get(&Scope::Root, &Locator::css(".x"), false).is_ok());
        }

        #[test]
        fn test_driver_fault_on_miss() {
            let (driver, _, cache) = setup();
            driver.push_locate_fault(DriverError::other("invalid session id", "gone"));
            let err = cache.get(&Scope::Root, &Locator::css("h1"), true).unwrap_err();
            assert_eq!(
                err,
                ElementError::DriverFault {
                    kind: "invalid session id".into(),
                    message: "gone".into(),
                }
            );
            assert!(cache.is_empty());
        }
    }
}
