//! Property-based tests for probar-element.
//!
//! Uses proptest to drive handles and caches through arbitrary sequences of
//! DOM mutations and check that recovery never costs more than one query.

#![allow(clippy::unwrap_used)]

use probar_element::mock::{MockDriver, MockElement};
use probar_element::prelude::*;
use proptest::prelude::*;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Rerender,
    Hide,
    Show,
    Retext(u8),
}

fn mutation() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        Just(Mutation::Rerender),
        Just(Mutation::Hide),
        Just(Mutation::Show),
        any::<u8>().prop_map(Mutation::Retext),
    ]
}

fn apply(driver: &MockDriver, node: usize, mutation: Mutation) {
    match mutation {
        Mutation::Rerender => driver.rerender(node),
        Mutation::Hide => driver.set_displayed(node, false),
        Mutation::Show => driver.set_displayed(node, true),
        Mutation::Retext(n) => driver.set_text(node, &n.to_string()),
    }
}

fn no_waits() -> ElementConfig {
    ElementConfig::new().with_waits(false)
}

// === Staleness Recovery Properties ===

proptest! {
    /// A handle keeps reading its node through any mutation sequence,
    /// re-locating at most once per read.
    #[test]
    fn prop_handle_heals_with_single_relocation(
        mutations in prop::collection::vec(mutation(), 0..20)
    ) {
        let driver = Arc::new(MockDriver::new());
        let node = driver.add(MockElement::new("span").with_text("0").matching(Locator::css("#n")));
        let page = Page::with_config(Arc::clone(&driver), no_waits());
        let element = page.element(&Locator::css("#n"), false).unwrap();

        let mut expected = String::from("0");
        for mutation in mutations {
            apply(&driver, node, mutation);
            if let Mutation::Retext(n) = mutation {
                expected = n.to_string();
            }
            let before = driver.counts().locate_one;
            prop_assert_eq!(element.text().unwrap(), expected.clone());
            prop_assert!(driver.counts().locate_one - before <= 1);
        }
    }

    /// Repeated cache lookups without DOM changes never query again.
    #[test]
    fn prop_cache_hits_issue_no_queries(gets in 1_usize..20) {
        let driver = Arc::new(MockDriver::new());
        driver.add(MockElement::new("div").matching(Locator::css(".card")));
        let page = Page::with_config(Arc::clone(&driver), no_waits());
        let first = page.element(&Locator::css(".card"), true).unwrap();
        let locates = driver.counts().locates();

        for _ in 0..gets {
            let again = page.element(&Locator::css(".card"), true).unwrap();
            prop_assert!(Rc::ptr_eq(&first, &again));
        }
        prop_assert_eq!(driver.counts().locates(), locates);
        prop_assert_eq!(page.cache().len(), 1);
    }

    /// CSS and XPath spellings of the same XPath share one cache entry.
    #[test]
    fn prop_cache_key_is_resolved(path in "//[a-z]{1,8}") {
        let driver = Arc::new(MockDriver::new());
        driver.add(MockElement::new("div").matching(Locator::xpath(path.clone())));
        let page = Page::with_config(Arc::clone(&driver), no_waits());
        let via_css = page.element(&Locator::css(path.clone()), false).unwrap();
        let via_xpath = page.element(&Locator::xpath(path), false).unwrap();
        prop_assert!(Rc::ptr_eq(&via_css, &via_xpath));
    }

    /// Displayed state survives re-renders and is false once detached.
    #[test]
    fn prop_displayed_tracks_dom(
        mutations in prop::collection::vec(mutation(), 0..12),
        detach in any::<bool>()
    ) {
        let driver = Arc::new(MockDriver::new());
        let node = driver.add(MockElement::new("p").matching(Locator::css("p")));
        let page = Page::with_config(Arc::clone(&driver), no_waits());
        let element = page.element(&Locator::css("p"), false).unwrap();

        let mut shown = true;
        for mutation in mutations {
            apply(&driver, node, mutation);
            match mutation {
                Mutation::Hide => shown = false,
                Mutation::Show => shown = true,
                _ => {}
            }
        }
        if detach {
            driver.detach(node);
            shown = false;
        }
        prop_assert_eq!(element.is_displayed().unwrap(), shown);
    }
}
