//! Focus tracking for widget boundaries.
//!
//! [`FocusScope`] records which widget currently holds keyboard focus and
//! answers containment questions against the object tree. A composite
//! widget (such as the date picker) owns a scope for its own boundary and
//! uses it to distinguish "focus moved between my parts" from "focus left
//! me entirely" with an explicit subtree check, rather than inferring it
//! from event ordering.
//!
//! The scope is bookkeeping only: it does not dispatch `FocusIn`/`FocusOut`
//! events itself. The host shell (or the owning composite widget) routes
//! those to the widgets involved.

use almanac_core::{ObjectId, global_registry};

/// Tracks keyboard focus for a widget boundary.
#[derive(Debug, Default)]
pub struct FocusScope {
    /// The currently focused widget, if any.
    focused: Option<ObjectId>,
}

impl FocusScope {
    /// Create a new focus scope with nothing focused.
    pub fn new() -> Self {
        Self { focused: None }
    }

    /// Get the currently focused widget.
    #[inline]
    pub fn focused(&self) -> Option<ObjectId> {
        self.focused
    }

    /// Check if a specific widget has focus.
    #[inline]
    pub fn has_focus(&self, widget_id: ObjectId) -> bool {
        self.focused == Some(widget_id)
    }

    /// Record that a widget gained focus.
    ///
    /// Returns the previously focused widget, if any.
    pub fn set_focus(&mut self, widget_id: ObjectId) -> Option<ObjectId> {
        let previous = self.focused.replace(widget_id);
        if previous != Some(widget_id) {
            tracing::trace!(target: "almanac::widget", ?widget_id, "focus moved");
        }
        previous
    }

    /// Record that focus left the tracked widgets entirely.
    ///
    /// Returns the previously focused widget, if any.
    pub fn clear(&mut self) -> Option<ObjectId> {
        self.focused.take()
    }

    /// Check whether focus is still within the subtree rooted at `root`.
    ///
    /// Answers `false` when nothing is focused, when the focused object has
    /// been destroyed, or when it is neither `root` nor one of `root`'s
    /// descendants in the object registry.
    pub fn contains_focus(&self, root: ObjectId) -> bool {
        let Some(focused) = self.focused else {
            return false;
        };

        global_registry()
            .and_then(|registry| registry.is_descendant_of(focused, root))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_core::{Object, ObjectBase, init_global_registry};

    struct Node {
        base: ObjectBase,
    }

    impl Node {
        fn new() -> Self {
            Self {
                base: ObjectBase::new::<Self>(),
            }
        }
    }

    impl Object for Node {
        fn object_id(&self) -> ObjectId {
            self.base.id()
        }
    }

    fn setup() {
        init_global_registry();
    }

    #[test]
    fn test_focus_bookkeeping() {
        setup();
        let a = Node::new();
        let b = Node::new();

        let mut scope = FocusScope::new();
        assert_eq!(scope.focused(), None);

        assert_eq!(scope.set_focus(a.object_id()), None);
        assert!(scope.has_focus(a.object_id()));

        assert_eq!(scope.set_focus(b.object_id()), Some(a.object_id()));
        assert_eq!(scope.clear(), Some(b.object_id()));
        assert_eq!(scope.focused(), None);
    }

    #[test]
    fn test_contains_focus_subtree() {
        setup();
        let root = Node::new();
        let child = Node::new();
        let outsider = Node::new();
        child.base.set_parent(Some(root.object_id())).unwrap();

        let mut scope = FocusScope::new();
        assert!(!scope.contains_focus(root.object_id()));

        scope.set_focus(child.object_id());
        assert!(scope.contains_focus(root.object_id()));

        // The root itself counts as "within".
        scope.set_focus(root.object_id());
        assert!(scope.contains_focus(root.object_id()));

        scope.set_focus(outsider.object_id());
        assert!(!scope.contains_focus(root.object_id()));
    }

    #[test]
    fn test_contains_focus_after_destroy() {
        setup();
        let root = Node::new();
        let child = Node::new();
        child.base.set_parent(Some(root.object_id())).unwrap();

        let mut scope = FocusScope::new();
        scope.set_focus(child.object_id());

        let registry = global_registry().unwrap();
        registry.destroy(child.object_id()).unwrap();

        assert!(!scope.contains_focus(root.object_id()));
    }
}
