//! In-memory DOM backing [`MockDriver`](super::MockDriver).

use crate::driver::{DriverError, DriverResult, Location};
use crate::locator::{By, Locator};
use crate::scope::Scope;
use std::collections::{HashMap, VecDeque};

/// Reference handed out by the mock driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MockRef {
    /// Node index
    pub node: usize,
    /// Node generation at the time the reference was handed out
    pub generation: u32,
}

/// Declarative description of a mock DOM node
#[derive(Debug, Clone, PartialEq)]
pub struct MockElement {
    /// Tag name
    pub tag: String,
    /// Rendered text
    pub text: String,
    /// Parent node index
    pub parent: Option<usize>,
    /// Locators this node answers to (stored resolved)
    pub locators: Vec<Locator>,
    /// HTML attributes
    pub attributes: HashMap<String, String>,
    /// Computed CSS values
    pub css: HashMap<String, String>,
    /// Whether the node is rendered visibly
    pub displayed: bool,
    /// Whether the node is enabled
    pub enabled: bool,
    /// Whether the node is selected
    pub selected: bool,
    /// Page position
    pub location: Location,
}

impl MockElement {
    /// Create a visible, enabled node with the given tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: String::new(),
            parent: None,
            locators: Vec::new(),
            attributes: HashMap::new(),
            css: HashMap::new(),
            displayed: true,
            enabled: true,
            selected: false,
            location: Location::default(),
        }
    }

    /// Set rendered text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Make the node answer to `locator`
    #[must_use]
    pub fn matching(mut self, locator: Locator) -> Self {
        self.locators.push(locator.resolved());
        self
    }

    /// Nest the node under `parent`
    #[must_use]
    pub const fn under(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Render the node invisibly
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Disable the node
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Mark the node selected
    #[must_use]
    pub const fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    /// Set an HTML attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set a computed CSS value
    #[must_use]
    pub fn with_css(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.css.insert(name.into(), value.into());
        self
    }

    /// Place the node on the page
    #[must_use]
    pub const fn at(mut self, x: i64, y: i64) -> Self {
        self.location = Location::new(x, y);
        self
    }

    fn answers(&self, by: By, value: &str) -> bool {
        self.locators
            .iter()
            .any(|locator| locator.by() == by && locator.value() == value)
    }
}

/// Number of driver calls issued, by operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// `locate_one` calls
    pub locate_one: usize,
    /// `locate_many` calls
    pub locate_many: usize,
    /// `probe_liveness` calls
    pub probe: usize,
    /// click attempts (plain and offset), including faulted ones
    pub click: usize,
    /// `scroll_into_view` calls
    pub scroll: usize,
    /// `apply_style` calls
    pub style: usize,
}

impl CallCounts {
    /// Total locate queries of either shape
    #[must_use]
    pub const fn locates(&self) -> usize {
        self.locate_one + self.locate_many
    }
}

/// Side effect recorded by the mock driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Plain click
    Click {
        /// Node index
        node: usize,
    },
    /// Pointer move with offset, then click
    ClickAt {
        /// Node index
        node: usize,
        /// Horizontal offset
        x: i64,
        /// Vertical offset
        y: i64,
    },
    /// Double click
    DoubleClick {
        /// Node index
        node: usize,
    },
    /// Pointer hover
    Hover {
        /// Node index
        node: usize,
    },
    /// Text typed
    Keys {
        /// Node index
        node: usize,
        /// Keys sent
        keys: String,
    },
    /// Input cleared
    Clear {
        /// Node index
        node: usize,
    },
    /// Form submitted
    Submit {
        /// Node index
        node: usize,
    },
    /// Scrolled into view
    Scroll {
        /// Node index
        node: usize,
    },
    /// Inline style replaced
    Style {
        /// Node index
        node: usize,
        /// New style
        style: String,
    },
}

#[derive(Debug)]
pub(super) struct NodeState {
    pub(super) element: MockElement,
    pub(super) generation: u32,
    pub(super) attached: bool,
}

#[derive(Debug, Default)]
pub(super) struct MockDom {
    pub(super) nodes: Vec<NodeState>,
    pub(super) click_faults: VecDeque<DriverError>,
    pub(super) locate_faults: VecDeque<DriverError>,
    pub(super) counts: CallCounts,
    pub(super) log: Vec<Interaction>,
}

impl MockDom {
    pub(super) fn add(&mut self, element: MockElement) -> usize {
        self.nodes.push(NodeState {
            element,
            generation: 0,
            attached: true,
        });
        self.nodes.len() - 1
    }

    pub(super) fn reference(&self, node: usize) -> Option<MockRef> {
        self.nodes.get(node).map(|state| MockRef {
            node,
            generation: state.generation,
        })
    }

    /// A node is attached iff it and every ancestor are attached
    fn is_attached(&self, node: usize) -> bool {
        let mut current = Some(node);
        while let Some(index) = current {
            match self.nodes.get(index) {
                Some(state) if state.attached => current = state.element.parent,
                _ => return false,
            }
        }
        true
    }

    fn is_descendant(&self, node: usize, ancestor: usize) -> bool {
        let mut current = self.nodes.get(node).and_then(|s| s.element.parent);
        while let Some(index) = current {
            if index == ancestor {
                return true;
            }
            current = self.nodes.get(index).and_then(|s| s.element.parent);
        }
        false
    }

    pub(super) fn live(&self, element: &MockRef) -> DriverResult<&MockElement> {
        match self.nodes.get(element.node) {
            Some(state)
                if state.generation == element.generation && self.is_attached(element.node) =>
            {
                Ok(&state.element)
            }
            _ => Err(DriverError::stale(format!(
                "element {} is not attached to the page document",
                element.node
            ))),
        }
    }

    pub(super) fn live_mut(&mut self, element: &MockRef) -> DriverResult<&mut MockElement> {
        self.live(element)?;
        Ok(&mut self.nodes[element.node].element)
    }

    pub(super) fn matches(
        &mut self,
        scope: &Scope<MockRef>,
        by: By,
        value: &str,
    ) -> DriverResult<Vec<MockRef>> {
        if let Some(fault) = self.locate_faults.pop_front() {
            return Err(fault);
        }
        let ancestor = match scope {
            Scope::Root => None,
            Scope::Element(parent) => {
                self.live(parent)?;
                Some(parent.node)
            }
        };
        Ok((0..self.nodes.len())
            .filter(|&node| self.is_attached(node))
            .filter(|&node| ancestor.map_or(true, |a| self.is_descendant(node, a)))
            .filter(|&node| self.nodes[node].element.answers(by, value))
            .filter_map(|node| self.reference(node))
            .collect())
    }

    /// Clicking an option selects it and deselects its siblings
    pub(super) fn select_option(&mut self, node: usize) {
        let parent = self.nodes[node].element.parent;
        for state in &mut self.nodes {
            if state.element.tag == "option" && state.element.parent == parent {
                state.element.selected = false;
            }
        }
        self.nodes[node].element.selected = true;
    }
}
