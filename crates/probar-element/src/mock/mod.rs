//! Mock Driver Module for Element Testing
//!
//! An in-memory DOM implementing [`ElementDriver`](crate::ElementDriver), so
//! staleness recovery, waits, caches and the click protocol can be exercised
//! against the ACTUAL code paths without a browser.
//!
//! - Every node has a generation. [`MockDriver::rerender`] bumps it, which
//!   turns every reference handed out before into a stale one, exactly like a
//!   framework re-render replacing a DOM node.
//! - [`MockDriver::detach`] removes a node (and its subtree) so re-location
//!   fails with `no such element`.
//! - Click and locate faults can be scripted; call counters expose how many
//!   driver round trips an operation cost.
//!
//! ## Example
//!
//! ```rust
//! use probar_element::mock::{MockDriver, MockElement};
//! use probar_element::{DomObject, Locator, Page};
//! use std::sync::Arc;
//!
//! let driver = Arc::new(MockDriver::new());
//! let save = driver.add(MockElement::new("button").with_text("Save").matching(Locator::css("#save")));
//!
//! let page = Page::new(Arc::clone(&driver));
//! let button = page.element(&Locator::css("#save"), true).unwrap();
//! driver.rerender(save);
//! assert_eq!(button.text().unwrap(), "Save");
//! ```

mod dom;
mod driver;

pub use dom::{CallCounts, Interaction, MockElement, MockRef};
pub use driver::MockDriver;
