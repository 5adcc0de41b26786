//! Query scopes.
//!
//! A scope is what a locator is evaluated against: the document root, or a
//! previously resolved element. An element scope can only be built from a
//! reference that was already located, so scopes form a tree rooted at
//! [`Scope::Root`] and never a cycle.

/// A queryable root for locator evaluation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope<R> {
    /// The document (driver root)
    #[default]
    Root,
    /// Descendants of a resolved element
    Element(R),
}

impl<R> Scope<R> {
    /// Whether this is the document root
    #[must_use]
    pub const fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }

    /// The element reference this scope is bound to, if any
    #[must_use]
    pub const fn element(&self) -> Option<&R> {
        match self {
            Self::Root => None,
            Self::Element(element) => Some(element),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_root() {
        let scope: Scope<u32> = Scope::default();
        assert!(scope.is_root());
        assert_eq!(scope.element(), None);
    }

    #[test]
    fn test_element_scope() {
        let scope = Scope::Element(7_u32);
        assert!(!scope.is_root());
        assert_eq!(scope.element(), Some(&7));
    }
}
