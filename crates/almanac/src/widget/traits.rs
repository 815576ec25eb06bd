//! Core widget trait definitions.
//!
//! [`Widget`] is the base trait for all UI elements in Almanac. Widgets here
//! are headless: they own state, geometry, and event handling, and expose
//! model accessors for a host shell to render from. There is deliberately no
//! paint surface in this trait.

use almanac_core::Object;

use crate::geometry::{Point, Rect, Size};

use super::base::{FocusPolicy, WidgetBase};
use super::events::WidgetEvent;
use super::geometry::{SizeHint, SizePolicyPair};

/// The core trait for all widgets.
///
/// # Required Methods
///
/// Implementors must provide:
/// - [`widget_base()`](Self::widget_base) / [`widget_base_mut()`](Self::widget_base_mut):
///   Access to the underlying [`WidgetBase`]
/// - [`size_hint()`](Self::size_hint): The widget's preferred size for layout
///
/// Event handling defaults to "not handled"; interactive widgets override
/// [`event()`](Self::event).
///
/// # Implementing Object
///
/// Widgets must also implement the [`Object`] trait, typically by delegating
/// to the [`WidgetBase`]:
///
/// ```ignore
/// impl Object for MyWidget {
///     fn object_id(&self) -> ObjectId {
///         self.base.object_id()
///     }
/// }
/// ```
pub trait Widget: Object {
    // =========================================================================
    // Required Methods
    // =========================================================================

    /// Get a reference to the widget's base.
    fn widget_base(&self) -> &WidgetBase;

    /// Get a mutable reference to the widget's base.
    fn widget_base_mut(&mut self) -> &mut WidgetBase;

    /// Get the widget's size hint for layout purposes.
    fn size_hint(&self) -> SizeHint;

    /// Handle an event.
    ///
    /// Returns `true` if the event was handled. Handlers that consume an
    /// event should also call [`WidgetEvent::accept`].
    fn event(&mut self, _event: &mut WidgetEvent) -> bool {
        false
    }

    // =========================================================================
    // Geometry (default implementations delegate to WidgetBase)
    // =========================================================================

    /// Get the widget's geometry (position and size).
    fn geometry(&self) -> Rect {
        self.widget_base().geometry()
    }

    /// Set the widget's geometry.
    fn set_geometry(&mut self, rect: Rect) {
        self.widget_base_mut().set_geometry(rect);
    }

    /// Get the widget's position relative to its parent.
    fn pos(&self) -> Point {
        self.widget_base().pos()
    }

    /// Get the widget's size.
    fn size(&self) -> Size {
        self.widget_base().size()
    }

    /// Get the widget's local rectangle (origin at 0,0).
    fn rect(&self) -> Rect {
        self.widget_base().rect()
    }

    /// Get the widget's size policy.
    fn size_policy(&self) -> SizePolicyPair {
        self.widget_base().size_policy()
    }

    // =========================================================================
    // Visibility and Enabled State
    // =========================================================================

    /// Check if the widget is visible.
    fn is_visible(&self) -> bool {
        self.widget_base().is_visible()
    }

    /// Set whether the widget is visible.
    fn set_visible(&mut self, visible: bool) {
        self.widget_base_mut().set_visible(visible);
    }

    /// Show the widget.
    fn show(&mut self) {
        self.widget_base_mut().show();
    }

    /// Hide the widget.
    fn hide(&mut self) {
        self.widget_base_mut().hide();
    }

    /// Check if the widget is enabled.
    fn is_enabled(&self) -> bool {
        self.widget_base().is_enabled()
    }

    /// Set whether the widget is enabled.
    fn set_enabled(&mut self, enabled: bool) {
        self.widget_base_mut().set_enabled(enabled);
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Get the widget's focus policy.
    fn focus_policy(&self) -> FocusPolicy {
        self.widget_base().focus_policy()
    }

    /// Set the widget's focus policy.
    fn set_focus_policy(&mut self, policy: FocusPolicy) {
        self.widget_base_mut().set_focus_policy(policy);
    }

    /// Check if the widget can receive keyboard focus.
    fn is_focusable(&self) -> bool {
        self.widget_base().is_focusable()
    }

    /// Check if the widget currently has focus.
    fn has_focus(&self) -> bool {
        self.widget_base().has_focus()
    }
}
