//! probar-element: Resilient Element Layer for Page-Object Tests
//!
//! Sits between page-object test code and a browser-automation driver.
//! Callers address elements by locator instead of by transient handle; the
//! layer re-locates handles that went stale, waits for elements to reach the
//! state an action needs, and retries clicks that another element swallowed.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 probar-element Architecture                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Page /     │    │ Element    │    │ Element    │            │
//! │   │ Component  │───►│ Cache      │───►│ (heals on  │            │
//! │   │ (scopes)   │    │ (per node) │    │  staleness)│            │
//! │   └────────────┘    └─────┬──────┘    └─────┬──────┘            │
//! │                           │ miss            │ click             │
//! │                           ▼                 ▼                   │
//! │                     ┌────────────┐    ┌────────────┐            │
//! │                     │ Wait       │◄───│ Click      │            │
//! │                     │ Engine     │    │ Protocol   │            │
//! │                     └─────┬──────┘    └─────┬──────┘            │
//! │                           ▼                 ▼                   │
//! │                  ┌──────────────────────────────────┐           │
//! │                  │  ElementDriver (WebDriver, Mock) │           │
//! │                  └──────────────────────────────────┘           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is synchronous: waits sleep the calling thread. Handles and
//! caches use `Rc`/`RefCell` and stay on the thread that built them; the
//! driver itself is shared through `Arc`.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod cache;
#[allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation
)]
mod click;
mod config;
#[allow(clippy::missing_errors_doc)]
mod driver;
#[allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]
mod element;
mod locator;
#[allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]
mod page_object;
mod result;
mod scope;
#[allow(clippy::missing_errors_doc)]
mod select;
#[allow(clippy::missing_errors_doc, clippy::cast_possible_truncation)]
mod wait;

/// In-memory driver for tests and examples
///
/// Generation-stamped nodes model re-renders, detached subtrees model removed
/// elements, and scripted faults model occluded clicks.
#[allow(clippy::missing_panics_doc)]
pub mod mock;

pub use cache::ElementCache;
pub use click::{execute_click, ClickOptions, ClickReport, ClickState, MAX_CLICK_ATTEMPTS};
pub use config::{
    ElementConfig, DEFAULT_CLICK_BACKOFF_MS, DEFAULT_HIGHLIGHT_MS, DEFAULT_INVISIBLE_TIMEOUT_MS,
};
pub use driver::{DriverError, DriverErrorKind, DriverResult, ElementDriver, Location, OCCLUSION_MARKER};
pub use element::{keys, Element, HIGHLIGHT_STYLE};
pub use locator::{looks_like_xpath, resolve, By, Locator};
pub use page_object::{Component, DomObject, FindOptions, Page};
pub use result::{ElementError, ElementResult};
pub use scope::Scope;
pub use select::SelectElement;
pub use wait::{
    await_state, ElementState, WaitOptions, WaitResult, Waiter, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_TIMEOUT_MS, MAX_POLL_INTERVAL_MS,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::cache::*;
    pub use super::click::*;
    pub use super::config::*;
    pub use super::driver::*;
    pub use super::element::*;
    pub use super::locator::*;
    pub use super::page_object::*;
    pub use super::result::*;
    pub use super::scope::*;
    pub use super::select::*;
    pub use super::wait::{await_state, ElementState, WaitOptions, WaitResult, Waiter};
}
