//! Widget-specific event types.
//!
//! This module defines the events the date widgets handle: mouse press and
//! release, wheel, key press, focus in/out, and timer events. Events carry
//! an accepted flag so a handler can mark them consumed.

use almanac_core::TimerId;

use crate::geometry::Point;

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }

    /// Check if no modifiers are pressed.
    pub fn none(&self) -> bool {
        !self.any()
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left = 0,
    /// Secondary button (usually right).
    Right = 1,
    /// Middle button (scroll wheel click).
    Middle = 2,
}

/// Keys the date widgets react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Backspace,
    Tab,
    Enter,
    Escape,
    Space,
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
    /// A printable character.
    Char(char),
}

/// Reason for a focus change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusReason {
    /// Focus changed due to mouse click.
    Mouse,
    /// Focus changed due to Tab key.
    Tab,
    /// Focus changed due to Shift+Tab (backtab).
    Backtab,
    /// Focus changed because a popup opened or closed.
    Popup,
    /// Some other reason.
    #[default]
    Other,
}

/// Common data for all widget events.
#[derive(Debug, Clone, Copy)]
pub struct EventBase {
    /// Whether the event has been accepted (handled).
    accepted: bool,
}

impl Default for EventBase {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBase {
    /// Create a new event base (not accepted).
    pub fn new() -> Self {
        Self { accepted: false }
    }

    /// Check if the event has been accepted.
    #[inline]
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Mark the event as accepted.
    #[inline]
    pub fn accept(&mut self) {
        self.accepted = true;
    }

    /// Mark the event as not accepted.
    #[inline]
    pub fn ignore(&mut self) {
        self.accepted = false;
    }
}

/// Mouse press event.
#[derive(Debug, Clone, Copy)]
pub struct MousePressEvent {
    /// Base event data.
    pub base: EventBase,
    /// Position in the widget's local coordinates.
    pub local_pos: Point,
    /// Which button was pressed.
    pub button: MouseButton,
}

impl MousePressEvent {
    /// Create a new mouse press event.
    pub fn new(local_pos: Point, button: MouseButton) -> Self {
        Self {
            base: EventBase::new(),
            local_pos,
            button,
        }
    }
}

/// Mouse release event.
#[derive(Debug, Clone, Copy)]
pub struct MouseReleaseEvent {
    /// Base event data.
    pub base: EventBase,
    /// Position in the widget's local coordinates.
    pub local_pos: Point,
    /// Which button was released.
    pub button: MouseButton,
}

impl MouseReleaseEvent {
    /// Create a new mouse release event.
    pub fn new(local_pos: Point, button: MouseButton) -> Self {
        Self {
            base: EventBase::new(),
            local_pos,
            button,
        }
    }
}

/// Mouse wheel event.
#[derive(Debug, Clone, Copy)]
pub struct WheelEvent {
    /// Base event data.
    pub base: EventBase,
    /// Vertical scroll delta; positive scrolls up.
    pub delta_y: f32,
}

impl WheelEvent {
    /// Create a new wheel event.
    pub fn new(delta_y: f32) -> Self {
        Self {
            base: EventBase::new(),
            delta_y,
        }
    }
}

/// Key press event.
#[derive(Debug, Clone, Copy)]
pub struct KeyPressEvent {
    /// Base event data.
    pub base: EventBase,
    /// The pressed key.
    pub key: Key,
    /// Modifiers held during the press.
    pub modifiers: KeyboardModifiers,
}

impl KeyPressEvent {
    /// Create a new key press event without modifiers.
    pub fn new(key: Key) -> Self {
        Self::with_modifiers(key, KeyboardModifiers::NONE)
    }

    /// Create a new key press event with modifiers.
    pub fn with_modifiers(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self {
            base: EventBase::new(),
            key,
            modifiers,
        }
    }
}

/// Focus in event, sent when the widget gains keyboard focus.
#[derive(Debug, Clone, Copy)]
pub struct FocusInEvent {
    /// Base event data.
    pub base: EventBase,
    /// The reason focus was gained.
    pub reason: FocusReason,
}

impl FocusInEvent {
    /// Create a new focus in event.
    pub fn new(reason: FocusReason) -> Self {
        Self {
            base: EventBase::new(),
            reason,
        }
    }
}

/// Focus out event, sent when the widget loses keyboard focus.
#[derive(Debug, Clone, Copy)]
pub struct FocusOutEvent {
    /// Base event data.
    pub base: EventBase,
    /// The reason focus was lost.
    pub reason: FocusReason,
}

impl FocusOutEvent {
    /// Create a new focus out event.
    pub fn new(reason: FocusReason) -> Self {
        Self {
            base: EventBase::new(),
            reason,
        }
    }
}

/// Timer event, sent when a widget-owned timer fires.
#[derive(Debug, Clone, Copy)]
pub struct TimerEvent {
    /// Base event data.
    pub base: EventBase,
    /// The ID of the timer that fired.
    pub id: TimerId,
}

impl TimerEvent {
    /// Create a new timer event.
    pub fn new(id: TimerId) -> Self {
        Self {
            base: EventBase::new(),
            id,
        }
    }
}

/// A widget event.
///
/// This allows passing events through a unified interface while preserving
/// type information for event handlers.
#[derive(Debug)]
pub enum WidgetEvent {
    /// Mouse press event.
    MousePress(MousePressEvent),
    /// Mouse release event.
    MouseRelease(MouseReleaseEvent),
    /// Mouse wheel event.
    Wheel(WheelEvent),
    /// Key press event.
    KeyPress(KeyPressEvent),
    /// Focus in event.
    FocusIn(FocusInEvent),
    /// Focus out event.
    FocusOut(FocusOutEvent),
    /// Timer event.
    Timer(TimerEvent),
}

impl WidgetEvent {
    /// Check if the event has been accepted.
    pub fn is_accepted(&self) -> bool {
        match self {
            Self::MousePress(e) => e.base.is_accepted(),
            Self::MouseRelease(e) => e.base.is_accepted(),
            Self::Wheel(e) => e.base.is_accepted(),
            Self::KeyPress(e) => e.base.is_accepted(),
            Self::FocusIn(e) => e.base.is_accepted(),
            Self::FocusOut(e) => e.base.is_accepted(),
            Self::Timer(e) => e.base.is_accepted(),
        }
    }

    /// Mark the event as accepted.
    pub fn accept(&mut self) {
        match self {
            Self::MousePress(e) => e.base.accept(),
            Self::MouseRelease(e) => e.base.accept(),
            Self::Wheel(e) => e.base.accept(),
            Self::KeyPress(e) => e.base.accept(),
            Self::FocusIn(e) => e.base.accept(),
            Self::FocusOut(e) => e.base.accept(),
            Self::Timer(e) => e.base.accept(),
        }
    }

    /// Mark the event as not accepted.
    pub fn ignore(&mut self) {
        match self {
            Self::MousePress(e) => e.base.ignore(),
            Self::MouseRelease(e) => e.base.ignore(),
            Self::Wheel(e) => e.base.ignore(),
            Self::KeyPress(e) => e.base.ignore(),
            Self::FocusIn(e) => e.base.ignore(),
            Self::FocusOut(e) => e.base.ignore(),
            Self::Timer(e) => e.base.ignore(),
        }
    }
}
