//! Widget system for Almanac.
//!
//! This module provides the foundational widget architecture:
//!
//! - [`Widget`] trait: The base trait for all UI elements
//! - [`WidgetBase`]: Common implementation for widget functionality
//! - Size hints and policies for layout negotiation
//! - Widget events for input handling
//! - [`FocusScope`] for explicit focus containment at widget boundaries
//!
//! # Overview
//!
//! The widget system follows Qt's design philosophy while staying headless:
//! widgets own state, geometry, and event handling; a host shell renders
//! them and routes platform events in.
//!
//! # Creating a Widget
//!
//! ```ignore
//! use almanac::widget::*;
//! use almanac_core::{Object, ObjectId};
//!
//! struct MyToggle {
//!     base: WidgetBase,
//!     on: bool,
//! }
//!
//! impl MyToggle {
//!     pub fn new() -> Self {
//!         let mut base = WidgetBase::new::<Self>();
//!         base.set_focus_policy(FocusPolicy::StrongFocus);
//!         Self { base, on: false }
//!     }
//! }
//!
//! impl Object for MyToggle {
//!     fn object_id(&self) -> ObjectId {
//!         self.base.object_id()
//!     }
//! }
//!
//! impl Widget for MyToggle {
//!     fn widget_base(&self) -> &WidgetBase { &self.base }
//!     fn widget_base_mut(&mut self) -> &mut WidgetBase { &mut self.base }
//!
//!     fn size_hint(&self) -> SizeHint {
//!         SizeHint::from_dimensions(40.0, 20.0)
//!     }
//!
//!     fn event(&mut self, event: &mut WidgetEvent) -> bool {
//!         if let WidgetEvent::MousePress(_) = event {
//!             self.on = !self.on;
//!             event.accept();
//!             return true;
//!         }
//!         false
//!     }
//! }
//! ```

mod base;
mod events;
mod focus;
mod geometry;
mod traits;
pub mod widgets;

#[cfg(test)]
mod tests;

pub use base::{FocusPolicy, WidgetBase};
pub use events::{
    EventBase, FocusInEvent, FocusOutEvent, FocusReason, Key, KeyPressEvent, KeyboardModifiers,
    MouseButton, MousePressEvent, MouseReleaseEvent, TimerEvent, WheelEvent, WidgetEvent,
};
pub use focus::FocusScope;
pub use geometry::{SizeHint, SizePolicy, SizePolicyPair};
pub use traits::Widget;
