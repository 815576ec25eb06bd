//! Widget base implementation.
//!
//! This module provides `WidgetBase`, the common implementation details for
//! all widgets: geometry, visibility, enabled state, focus policy, and
//! integration with the object system.

use almanac_core::{Object, ObjectBase, ObjectId, ObjectResult, Signal};

use crate::geometry::{Point, Rect, Size};
use super::geometry::SizePolicyPair;

/// How a widget can receive keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPolicy {
    /// The widget never takes focus. Clicking it must not move focus away
    /// from whatever currently holds it.
    #[default]
    NoFocus,
    /// The widget accepts focus via Tab navigation only.
    TabFocus,
    /// The widget accepts focus via mouse click only.
    ClickFocus,
    /// The widget accepts focus via both Tab and click.
    StrongFocus,
}

impl FocusPolicy {
    /// Check if the policy accepts focus at all.
    #[inline]
    pub fn accepts_focus(self) -> bool {
        !matches!(self, Self::NoFocus)
    }

    /// Check if the policy accepts focus via Tab navigation.
    #[inline]
    pub fn accepts_tab_focus(self) -> bool {
        matches!(self, Self::TabFocus | Self::StrongFocus)
    }

    /// Check if the policy accepts focus via mouse click.
    #[inline]
    pub fn accepts_click_focus(self) -> bool {
        matches!(self, Self::ClickFocus | Self::StrongFocus)
    }
}

/// The base implementation for all widgets.
///
/// This struct provides common functionality that all widgets need:
/// - Object system integration (ID, parent-child relationships)
/// - Geometry management (position, size)
/// - Visibility, enabled state, and focus state
///
/// Widget implementations include this as a field and delegate common
/// operations to it.
pub struct WidgetBase {
    /// The underlying object base for Object trait implementation.
    object_base: ObjectBase,

    /// The widget's geometry (position relative to parent and size).
    geometry: Rect,

    /// The widget's size policy for layout.
    size_policy: SizePolicyPair,

    /// Whether the widget is visible.
    visible: bool,

    /// Whether the widget is enabled (can receive input).
    enabled: bool,

    /// How the widget receives keyboard focus.
    focus_policy: FocusPolicy,

    /// Whether the widget currently has focus.
    focused: bool,

    /// Whether the widget needs to be repainted.
    needs_repaint: bool,

    /// Signal emitted when the geometry changes.
    pub geometry_changed: Signal<Rect>,

    /// Signal emitted when visibility changes.
    pub visible_changed: Signal<bool>,

    /// Signal emitted when enabled state changes.
    pub enabled_changed: Signal<bool>,
}

impl WidgetBase {
    /// Create a new widget base.
    ///
    /// # Panics
    ///
    /// Panics if the global object registry is not initialized.
    pub fn new<T: Object + 'static>() -> Self {
        Self {
            object_base: ObjectBase::new::<T>(),
            geometry: Rect::ZERO,
            size_policy: SizePolicyPair::default(),
            visible: true,
            enabled: true,
            focus_policy: FocusPolicy::NoFocus,
            focused: false,
            needs_repaint: true,
            geometry_changed: Signal::new(),
            visible_changed: Signal::new(),
            enabled_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Object System Delegation
    // =========================================================================

    /// Get the widget's unique object ID.
    #[inline]
    pub fn object_id(&self) -> ObjectId {
        self.object_base.id()
    }

    /// Get the widget's name.
    pub fn name(&self) -> String {
        self.object_base.name()
    }

    /// Set the widget's name.
    pub fn set_name(&self, name: impl Into<String>) {
        self.object_base.set_name(name);
    }

    /// Get the parent widget's object ID.
    pub fn parent_id(&self) -> Option<ObjectId> {
        self.object_base.parent()
    }

    /// Set the parent widget.
    pub fn set_parent(&self, parent: Option<ObjectId>) -> ObjectResult<()> {
        self.object_base.set_parent(parent)
    }

    /// Get the object IDs of child widgets.
    pub fn children_ids(&self) -> Vec<ObjectId> {
        self.object_base.children()
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Get the widget's geometry (position in parent coordinates and size).
    #[inline]
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Set the widget's geometry.
    pub fn set_geometry(&mut self, rect: Rect) {
        if self.geometry != rect {
            self.geometry = rect;
            self.update();
            self.geometry_changed.emit(rect);
        }
    }

    /// Get the widget's position relative to its parent.
    pub fn pos(&self) -> Point {
        self.geometry.origin
    }

    /// Set the widget's position relative to its parent.
    pub fn set_pos(&mut self, pos: Point) {
        let mut rect = self.geometry;
        rect.origin = pos;
        self.set_geometry(rect);
    }

    /// Get the widget's size.
    pub fn size(&self) -> Size {
        self.geometry.size
    }

    /// Set the widget's size.
    pub fn set_size(&mut self, size: Size) {
        let mut rect = self.geometry;
        rect.size = size;
        self.set_geometry(rect);
    }

    /// Resize the widget.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.set_size(Size::new(width, height));
    }

    /// Get the widget's width.
    pub fn width(&self) -> f32 {
        self.geometry.width()
    }

    /// Get the widget's height.
    pub fn height(&self) -> f32 {
        self.geometry.height()
    }

    /// Get the widget's local rectangle (origin at 0,0).
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.geometry.width(), self.geometry.height())
    }

    /// Check if a point in local coordinates is inside the widget.
    pub fn contains_point(&self, point: Point) -> bool {
        self.rect().contains(point)
    }

    // =========================================================================
    // Size Policy
    // =========================================================================

    /// Get the widget's size policy.
    pub fn size_policy(&self) -> SizePolicyPair {
        self.size_policy
    }

    /// Set the widget's size policy.
    pub fn set_size_policy(&mut self, policy: SizePolicyPair) {
        self.size_policy = policy;
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Check if the widget is visible.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set whether the widget is visible.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.update();
            self.visible_changed.emit(visible);
        }
    }

    /// Show the widget.
    pub fn show(&mut self) {
        self.set_visible(true);
    }

    /// Hide the widget.
    pub fn hide(&mut self) {
        self.set_visible(false);
    }

    // =========================================================================
    // Enabled State
    // =========================================================================

    /// Check if the widget is enabled.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set whether the widget is enabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.update();
            self.enabled_changed.emit(enabled);
        }
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Get the widget's focus policy.
    pub fn focus_policy(&self) -> FocusPolicy {
        self.focus_policy
    }

    /// Set the widget's focus policy.
    pub fn set_focus_policy(&mut self, policy: FocusPolicy) {
        self.focus_policy = policy;
    }

    /// Check if the widget can receive keyboard focus right now.
    pub fn is_focusable(&self) -> bool {
        self.focus_policy.accepts_focus() && self.enabled && self.visible
    }

    /// Check if the widget currently has focus.
    #[inline]
    pub fn has_focus(&self) -> bool {
        self.focused
    }

    /// Update the widget's focus state.
    ///
    /// Called by the focus scope when focus moves; widgets react via
    /// `FocusIn`/`FocusOut` events.
    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.update();
        }
    }

    // =========================================================================
    // Repaint
    // =========================================================================

    /// Check if the widget needs to be repainted.
    pub fn needs_repaint(&self) -> bool {
        self.needs_repaint
    }

    /// Mark the widget as needing a repaint.
    pub fn update(&mut self) {
        self.needs_repaint = true;
    }

    /// Clear the repaint flag after the host has drawn the widget.
    pub fn mark_painted(&mut self) {
        self.needs_repaint = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_core::init_global_registry;

    struct Dummy {
        base: WidgetBase,
    }

    impl Dummy {
        fn new() -> Self {
            init_global_registry();
            Self {
                base: WidgetBase::new::<Self>(),
            }
        }
    }

    impl Object for Dummy {
        fn object_id(&self) -> ObjectId {
            self.base.object_id()
        }
    }

    fn make_base() -> WidgetBase {
        let widget = Dummy::new();
        widget.base
    }

    #[test]
    fn test_geometry_change_signals() {
        let mut base = make_base();
        base.mark_painted();

        base.set_geometry(Rect::new(10.0, 20.0, 100.0, 30.0));
        assert!(base.needs_repaint());
        assert_eq!(base.pos(), Point::new(10.0, 20.0));
        assert_eq!(base.size(), Size::new(100.0, 30.0));
        assert_eq!(base.rect(), Rect::new(0.0, 0.0, 100.0, 30.0));
    }

    #[test]
    fn test_focus_policy() {
        let mut base = make_base();
        assert!(!base.is_focusable());

        base.set_focus_policy(FocusPolicy::StrongFocus);
        assert!(base.is_focusable());
        assert!(base.focus_policy().accepts_tab_focus());
        assert!(base.focus_policy().accepts_click_focus());

        base.set_enabled(false);
        assert!(!base.is_focusable());
    }

    #[test]
    fn test_no_focus_policy_rejects_all() {
        assert!(!FocusPolicy::NoFocus.accepts_focus());
        assert!(!FocusPolicy::NoFocus.accepts_tab_focus());
        assert!(!FocusPolicy::NoFocus.accepts_click_focus());
        assert!(FocusPolicy::TabFocus.accepts_tab_focus());
        assert!(!FocusPolicy::TabFocus.accepts_click_focus());
    }
}
