//! [`ElementDriver`] implementation over [`MockDom`].

use super::dom::{CallCounts, Interaction, MockDom, MockElement, MockRef};
use crate::driver::{DriverError, DriverResult, ElementDriver, Location};
use crate::element::keys;
use crate::locator::By;
use crate::scope::Scope;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Scriptable in-memory driver
///
/// Interior mutability lets tests mutate the DOM (re-render, hide, detach)
/// through the same `Arc` the page objects hold, including from a helper
/// thread while a wait is polling.
#[derive(Debug, Default)]
pub struct MockDriver {
    dom: Mutex<MockDom>,
}

impl MockDriver {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn dom(&self) -> MutexGuard<'_, MockDom> {
        self.dom.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a node and return its index
    pub fn add(&self, element: MockElement) -> usize {
        self.dom().add(element)
    }

    /// Current (live) reference to a node
    #[must_use]
    pub fn reference(&self, node: usize) -> Option<MockRef> {
        self.dom().reference(node)
    }

    /// Replace the node with an identical one; old references go stale
    pub fn rerender(&self, node: usize) {
        if let Some(state) = self.dom().nodes.get_mut(node) {
            state.generation += 1;
        }
    }

    /// Remove the node (and its subtree) from the document
    pub fn detach(&self, node: usize) {
        self.set_attached(node, false);
    }

    /// Put a detached node back, as a fresh generation
    pub fn attach(&self, node: usize) {
        self.set_attached(node, true);
        self.rerender(node);
    }

    fn set_attached(&self, node: usize, attached: bool) {
        if let Some(state) = self.dom().nodes.get_mut(node) {
            state.attached = attached;
        }
    }

    fn update(&self, node: usize, apply: impl FnOnce(&mut MockElement)) {
        if let Some(state) = self.dom().nodes.get_mut(node) {
            apply(&mut state.element);
        }
    }

    /// Show or hide a node
    pub fn set_displayed(&self, node: usize, displayed: bool) {
        self.update(node, |element| element.displayed = displayed);
    }

    /// Enable or disable a node
    pub fn set_enabled(&self, node: usize, enabled: bool) {
        self.update(node, |element| element.enabled = enabled);
    }

    /// Change a node's text
    pub fn set_text(&self, node: usize, text: &str) {
        self.update(node, |element| element.text = text.to_string());
    }

    /// Fail the next click attempt with `fault`
    pub fn push_click_fault(&self, fault: DriverError) {
        self.dom().click_faults.push_back(fault);
    }

    /// Fail the next locate query (one or many) with `fault`
    pub fn push_locate_fault(&self, fault: DriverError) {
        self.dom().locate_faults.push_back(fault);
    }

    /// Calls issued so far
    #[must_use]
    pub fn counts(&self) -> CallCounts {
        self.dom().counts
    }

    /// Zero the call counters
    pub fn reset_counts(&self) {
        self.dom().counts = CallCounts::default();
    }

    /// Side effects recorded so far
    #[must_use]
    pub fn interactions(&self) -> Vec<Interaction> {
        self.dom().log.clone()
    }

    /// Read an attribute straight from the DOM, bypassing liveness
    #[must_use]
    pub fn attribute_of(&self, node: usize, name: &str) -> Option<String> {
        self.dom()
            .nodes
            .get(node)
            .and_then(|state| state.element.attributes.get(name).cloned())
    }

    /// Whether a node is selected, bypassing liveness
    #[must_use]
    pub fn is_node_selected(&self, node: usize) -> bool {
        self.dom()
            .nodes
            .get(node)
            .is_some_and(|state| state.element.selected)
    }

    fn read<T>(&self, element: &MockRef, read: impl FnOnce(&MockElement) -> T) -> DriverResult<T> {
        self.dom().live(element).map(read)
    }

    fn interact(
        &self,
        element: &MockRef,
        interaction: Interaction,
        apply: impl FnOnce(&mut MockElement),
    ) -> DriverResult<()> {
        let mut dom = self.dom();
        apply(dom.live_mut(element)?);
        dom.log.push(interaction);
        Ok(())
    }

    fn press(&self, element: &MockRef, interaction: Interaction) -> DriverResult<()> {
        let mut dom = self.dom();
        dom.counts.click += 1;
        if let Some(fault) = dom.click_faults.pop_front() {
            return Err(fault);
        }
        let target = dom.live(element)?;
        if !target.displayed || !target.enabled {
            return Err(DriverError::not_interactable(format!(
                "element {} is not reachable by pointer",
                element.node
            )));
        }
        if target.tag == "option" {
            dom.select_option(element.node);
        }
        dom.log.push(interaction);
        Ok(())
    }
}

impl ElementDriver for MockDriver {
    type Ref = MockRef;

    fn locate_one(&self, scope: &Scope<MockRef>, by: By, value: &str) -> DriverResult<MockRef> {
        let mut dom = self.dom();
        dom.counts.locate_one += 1;
        dom.matches(scope, by, value)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                DriverError::no_such_element(format!("Unable to locate element: {by}={value}"))
            })
    }

    fn locate_many(
        &self,
        scope: &Scope<MockRef>,
        by: By,
        value: &str,
    ) -> DriverResult<Vec<MockRef>> {
        let mut dom = self.dom();
        dom.counts.locate_many += 1;
        dom.matches(scope, by, value)
    }

    fn probe_liveness(&self, element: &MockRef) -> DriverResult<()> {
        let mut dom = self.dom();
        dom.counts.probe += 1;
        dom.live(element).map(|_| ())
    }

    fn click(&self, element: &MockRef) -> DriverResult<()> {
        self.press(element, Interaction::Click { node: element.node })
    }

    fn click_at_offset(&self, element: &MockRef, x: i64, y: i64) -> DriverResult<()> {
        self.press(
            element,
            Interaction::ClickAt {
                node: element.node,
                x,
                y,
            },
        )
    }

    fn double_click(&self, element: &MockRef) -> DriverResult<()> {
        self.interact(element, Interaction::DoubleClick { node: element.node }, |_| {})
    }

    fn hover(&self, element: &MockRef) -> DriverResult<()> {
        self.interact(element, Interaction::Hover { node: element.node }, |_| {})
    }

    fn clear(&self, element: &MockRef) -> DriverResult<()> {
        self.interact(element, Interaction::Clear { node: element.node }, |target| {
            let _ = target.attributes.remove("value");
        })
    }

    fn send_keys(&self, element: &MockRef, keys: &str) -> DriverResult<()> {
        let interaction = Interaction::Keys {
            node: element.node,
            keys: keys.to_string(),
        };
        self.interact(element, interaction, |target| {
            if keys != keys::TAB {
                target
                    .attributes
                    .entry("value".to_string())
                    .or_default()
                    .push_str(keys);
            }
        })
    }

    fn submit(&self, element: &MockRef) -> DriverResult<()> {
        self.interact(element, Interaction::Submit { node: element.node }, |_| {})
    }

    fn attribute(&self, element: &MockRef, name: &str) -> DriverResult<Option<String>> {
        self.read(element, |target| target.attributes.get(name).cloned())
    }

    fn property(&self, element: &MockRef, name: &str) -> DriverResult<serde_json::Value> {
        self.read(element, |target| match name {
            "tagName" => serde_json::Value::String(target.tag.to_uppercase()),
            "checked" | "selected" => serde_json::Value::Bool(target.selected),
            _ => target
                .attributes
                .get(name)
                .map_or(serde_json::Value::Null, |v| serde_json::Value::String(v.clone())),
        })
    }

    fn css_value(&self, element: &MockRef, name: &str) -> DriverResult<String> {
        self.read(element, |target| target.css.get(name).cloned().unwrap_or_default())
    }

    fn is_displayed(&self, element: &MockRef) -> DriverResult<bool> {
        self.read(element, |target| target.displayed)
    }

    fn is_enabled(&self, element: &MockRef) -> DriverResult<bool> {
        self.read(element, |target| target.enabled)
    }

    fn is_selected(&self, element: &MockRef) -> DriverResult<bool> {
        self.read(element, |target| target.selected)
    }

    fn text(&self, element: &MockRef) -> DriverResult<String> {
        self.read(element, |target| target.text.clone())
    }

    fn tag_name(&self, element: &MockRef) -> DriverResult<String> {
        self.read(element, |target| target.tag.clone())
    }

    fn location(&self, element: &MockRef) -> DriverResult<Location> {
        self.read(element, |target| target.location)
    }

    fn scroll_into_view(&self, element: &MockRef) -> DriverResult<()> {
        self.dom().counts.scroll += 1;
        self.interact(element, Interaction::Scroll { node: element.node }, |_| {})
    }

    fn apply_style(&self, element: &MockRef, style: &str) -> DriverResult<()> {
        self.dom().counts.style += 1;
        let interaction = Interaction::Style {
            node: element.node,
            style: style.to_string(),
        };
        self.interact(element, interaction, |target| {
            let _ = target
                .attributes
                .insert("style".to_string(), style.to_string());
        })
    }
}
