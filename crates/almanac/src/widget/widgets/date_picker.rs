//! Date picker widget.
//!
//! `DatePicker` composes a segmented [`DateInput`] with a popup
//! [`CalendarWidget`] behind a calendar toggle button. It owns the popup
//! open/closed state, funnels every value commit through a single change
//! path, flips the popup above its anchor when it would overflow a boundary
//! rect, and defers to the platform's native date-entry control when the
//! consumer prefers it and the platform has one.
//!
//! The popup close on focus loss is debounced: losing focus arms a 100 ms
//! one-shot timer, and regaining focus before it fires disarms the close.
//! Moving focus between the picker's own parts therefore never produces a
//! visible close flash.
//!
//! # Example
//!
//! ```
//! use almanac::{DatePicker, init_global_registry};
//! use chrono::NaiveDate;
//!
//! init_global_registry();
//!
//! let mut picker = DatePicker::new()
//!     .with_locale("en-US")
//!     .with_value(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
//!
//! picker.value_changed.connect(|date| {
//!     println!("picked {:?}", date);
//! });
//!
//! picker.toggle_popup();
//! assert!(picker.is_open());
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use parking_lot::Mutex;

use almanac_core::{Object, ObjectId, Signal, TimerId, TimerManager, global_registry};

use crate::geometry::{Point, Rect, detect_overflow};
use crate::locale::{DateFormatter, DateLength, iso_date_string, parse_iso_date};
use crate::platform::{DateEntryProbe, SystemDateEntryProbe};
use crate::widget::{
    FocusPolicy, FocusScope, Key, KeyPressEvent, KeyboardModifiers, MouseButton, MousePressEvent,
    SizeHint, TimerEvent, WheelEvent, Widget, WidgetBase, WidgetEvent,
};

use super::calendar::{CalendarType, CalendarWidget};
use super::date_input::DateInput;

/// How long a blur may stay pending before the popup closes.
///
/// Regaining focus within this window cancels the close, so focus moving
/// between the picker's own parts never closes the popup.
pub const BLUR_CLOSE_DELAY: Duration = Duration::from_millis(100);

/// Width of the calendar toggle button on the right edge.
const TOGGLE_BUTTON_WIDTH: f32 = 24.0;

/// Popup lifecycle state.
///
/// `Unset` is distinct from `Closed`: it means the popup has never been
/// opened and should not be mounted at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupState {
    /// The popup has never been opened; do not mount it.
    #[default]
    Unset,
    /// The popup is open.
    Open,
    /// The popup is closed.
    Closed,
}

/// Where the popup calendar sits relative to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarPlacement {
    /// Anchored below the input (the default).
    #[default]
    Below,
    /// Flipped above the input to avoid overflowing the boundary.
    Above,
}

/// Parts of the picker for hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum PickerPart {
    #[default]
    None,
    /// The date input field.
    InputField,
    /// The calendar toggle button.
    ToggleButton,
    /// The popup calendar area.
    PopupCalendar,
}

/// Queue of commits reported by the input and calendar collaborators,
/// drained through the picker's single change path.
type CommitQueue = Arc<Mutex<Vec<(NaiveDate, bool)>>>;

/// A date picker composing a date input with a popup calendar.
///
/// The selected value is consumer-owned: the picker proposes replacements
/// through `value_changed` and never updates its own `value` on commit. Feed
/// the new value back with [`set_value`](Self::set_value) for the change to
/// visibly apply.
///
/// # Signals
///
/// - `value_changed(Option<NaiveDate>)`: Emitted exactly once per commit.
///   `None` carries an unparseable native-control value through unchanged.
pub struct DatePicker {
    /// Widget base.
    base: WidgetBase,

    /// Current value. Consumer-owned.
    value: Option<NaiveDate>,

    /// Locale-aware formatter for display strings and the placeholder.
    formatter: DateFormatter,

    /// Whether to prefer the platform's native date-entry control.
    prefer_native: bool,

    /// Capability probe for native date entry. Queried per call, not cached.
    probe: Box<dyn DateEntryProbe>,

    /// Popup lifecycle state.
    popup_state: PopupState,

    /// Current popup placement, recomputed on every placement update.
    placement: CalendarPlacement,

    /// Whether a blur is awaiting its deferred close.
    blur_pending: bool,

    /// The armed deferred-close timer, if any.
    close_timer: Option<TimerId>,

    /// Timers owned by this picker instance.
    timers: TimerManager,

    /// Focus bookkeeping for the picker's boundary.
    focus: FocusScope,

    /// The segmented date input.
    input: DateInput,

    /// The popup calendar.
    calendar: CalendarWidget,

    /// Commits reported by the collaborators, pending the single change path.
    commits: CommitQueue,

    /// Signal emitted exactly once per value commit.
    pub value_changed: Signal<Option<NaiveDate>>,
}

impl DatePicker {
    /// Create a new date picker using the system locale.
    pub fn new() -> Self {
        let mut base = WidgetBase::new::<Self>();
        base.set_focus_policy(FocusPolicy::StrongFocus);

        let input = DateInput::new();
        let calendar = CalendarWidget::new();

        // Parent the parts under the picker so the focus scope can answer
        // subtree containment through the object registry.
        input
            .widget_base()
            .set_parent(Some(base.object_id()))
            .expect("picker parts parent under a freshly registered picker");
        calendar
            .widget_base()
            .set_parent(Some(base.object_id()))
            .expect("picker parts parent under a freshly registered picker");

        let commits: CommitQueue = Arc::new(Mutex::new(Vec::new()));

        // Both collaborators report through the same queue; the flag marks
        // in-progress edits that keep the popup open.
        let queue = commits.clone();
        input
            .value_edited
            .connect(move |date| queue.lock().push((*date, true)));
        let queue = commits.clone();
        input
            .value_committed
            .connect(move |date| queue.lock().push((*date, false)));
        let queue = commits.clone();
        calendar
            .date_selected
            .connect(move |date| queue.lock().push((*date, false)));

        Self {
            base,
            value: None,
            formatter: DateFormatter::new(),
            prefer_native: false,
            probe: Box::new(SystemDateEntryProbe),
            popup_state: PopupState::Unset,
            placement: CalendarPlacement::Below,
            blur_pending: false,
            close_timer: None,
            timers: TimerManager::new(),
            focus: FocusScope::new(),
            input,
            calendar,
            commits,
            value_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Get the locale identifier in use.
    pub fn locale(&self) -> &str {
        self.formatter.locale()
    }

    /// Set the locale for display formatting and the input's field order.
    pub fn set_locale(&mut self, locale: &str) {
        self.formatter = DateFormatter::with_locale(locale);
        self.input.set_locale(locale);
        self.base.update();
    }

    /// Set the locale using builder pattern.
    pub fn with_locale(mut self, locale: &str) -> Self {
        self.set_locale(locale);
        self
    }

    /// Get the calendar week-start convention.
    pub fn calendar_type(&self) -> CalendarType {
        self.calendar.calendar_type()
    }

    /// Set the calendar week-start convention.
    pub fn set_calendar_type(&mut self, calendar_type: CalendarType) {
        self.calendar.set_calendar_type(calendar_type);
    }

    /// Set the calendar week-start convention using builder pattern.
    pub fn with_calendar_type(mut self, calendar_type: CalendarType) -> Self {
        self.calendar.set_calendar_type(calendar_type);
        self
    }

    /// Get the minimum selectable date.
    pub fn min_date(&self) -> Option<NaiveDate> {
        self.calendar.minimum_date()
    }

    /// Set the minimum selectable date.
    ///
    /// Keeping `min <= max` is the caller's responsibility.
    pub fn set_min_date(&mut self, date: Option<NaiveDate>) {
        self.calendar.set_minimum_date(date);
    }

    /// Set the minimum date using builder pattern.
    pub fn with_min_date(mut self, date: NaiveDate) -> Self {
        self.calendar.set_minimum_date(Some(date));
        self
    }

    /// Get the maximum selectable date.
    pub fn max_date(&self) -> Option<NaiveDate> {
        self.calendar.maximum_date()
    }

    /// Set the maximum selectable date.
    pub fn set_max_date(&mut self, date: Option<NaiveDate>) {
        self.calendar.set_maximum_date(date);
    }

    /// Set the maximum date using builder pattern.
    pub fn with_max_date(mut self, date: NaiveDate) -> Self {
        self.calendar.set_maximum_date(Some(date));
        self
    }

    /// Set both range bounds at once.
    pub fn set_date_range(&mut self, min: Option<NaiveDate>, max: Option<NaiveDate>) {
        self.calendar.set_date_range(min, max);
    }

    /// Set the date range using builder pattern.
    pub fn with_date_range(mut self, min: NaiveDate, max: NaiveDate) -> Self {
        self.calendar.set_date_range(Some(min), Some(max));
        self
    }

    /// Check whether the calendar shows week numbers.
    pub fn show_week_numbers(&self) -> bool {
        self.calendar.show_week_numbers()
    }

    /// Set whether the calendar shows week numbers.
    pub fn set_week_numbers(&mut self, show: bool) {
        self.calendar.set_week_numbers(show);
    }

    /// Set week numbers using builder pattern.
    pub fn with_week_numbers(mut self, show: bool) -> Self {
        self.calendar.set_week_numbers(show);
        self
    }

    /// Check whether the native date-entry control is preferred.
    pub fn prefer_native(&self) -> bool {
        self.prefer_native
    }

    /// Set whether to prefer the platform's native date-entry control.
    pub fn set_prefer_native(&mut self, prefer: bool) {
        if self.prefer_native != prefer {
            self.prefer_native = prefer;
            self.base.update();
        }
    }

    /// Set native preference using builder pattern.
    pub fn with_prefer_native(mut self, prefer: bool) -> Self {
        self.prefer_native = prefer;
        self
    }

    /// Replace the native-capability probe (injectable for tests).
    pub fn with_probe(mut self, probe: impl DateEntryProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// Set the initial popup state using builder pattern.
    ///
    /// Consulted once at construction time; the picker does not resync to
    /// later changes of the flag.
    pub fn with_open(mut self, open: bool) -> Self {
        self.popup_state = if open {
            PopupState::Open
        } else {
            PopupState::Closed
        };
        self
    }

    /// Get the current value.
    pub fn value(&self) -> Option<NaiveDate> {
        self.value
    }

    /// Set the current value (consumer feedback path; emits nothing).
    pub fn set_value(&mut self, value: Option<NaiveDate>) {
        if self.value != value {
            self.value = value;
            self.input.set_value(value);
            self.calendar.set_selected_date(value);
            if let Some(date) = value {
                self.calendar.show_date(date);
            }
            self.base.update();
        }
    }

    /// Set the value using builder pattern.
    pub fn with_value(mut self, value: NaiveDate) -> Self {
        self.set_value(Some(value));
        self
    }

    // =========================================================================
    // Collaborator Access
    // =========================================================================

    /// The segmented date input (read-only; route events through the picker).
    pub fn input(&self) -> &DateInput {
        &self.input
    }

    /// The popup calendar (read-only; route events through the picker).
    pub fn calendar(&self) -> &CalendarWidget {
        &self.calendar
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// The selected date in locale-aware long form, if any.
    pub fn formatted_value(&self) -> Option<String> {
        self.value
            .map(|date| self.formatter.format_date(date, DateLength::Long))
    }

    /// The symbolic field-order placeholder for the active locale.
    pub fn placeholder(&self) -> String {
        self.formatter.placeholder()
    }

    /// The value as the fixed ISO string the native control exchanges,
    /// or empty when no value is set.
    pub fn native_value(&self) -> String {
        self.value.map(iso_date_string).unwrap_or_default()
    }

    /// Whether the native date-entry control should render instead of the
    /// composed input + popup. The capability probe runs on every call.
    pub fn display_native(&self) -> bool {
        self.prefer_native && self.probe.native_date_entry_supported()
    }

    // =========================================================================
    // Popup Control
    // =========================================================================

    /// Get the popup lifecycle state.
    pub fn popup_state(&self) -> PopupState {
        self.popup_state
    }

    /// Check if the popup is open.
    pub fn is_open(&self) -> bool {
        self.popup_state == PopupState::Open
    }

    /// Check if the popup should be mounted at all.
    pub fn popup_mounted(&self) -> bool {
        self.popup_state != PopupState::Unset
    }

    /// Open the popup and sync the calendar to the current value.
    pub fn show_popup(&mut self) {
        if self.display_native() {
            return;
        }
        self.popup_state = PopupState::Open;
        self.blur_pending = false;
        self.calendar.set_selected_date(self.value);
        if let Some(date) = self.value {
            self.calendar.show_date(date);
        }
        self.base.update();
    }

    /// Close the popup.
    pub fn hide_popup(&mut self) {
        if self.popup_state != PopupState::Closed {
            self.popup_state = PopupState::Closed;
            self.base.update();
        }
    }

    /// Toggle the popup between open and closed.
    pub fn toggle_popup(&mut self) {
        match self.popup_state {
            PopupState::Open => self.hide_popup(),
            PopupState::Closed | PopupState::Unset => self.show_popup(),
        }
    }

    // =========================================================================
    // Placement
    // =========================================================================

    /// Get the current popup placement.
    pub fn placement(&self) -> CalendarPlacement {
        self.placement
    }

    /// The popup rect in the picker's parent coordinates, honoring the
    /// current placement.
    pub fn popup_rect(&self) -> Rect {
        let geometry = self.base.geometry();
        let hint = self.calendar.size_hint().preferred;
        match self.placement {
            CalendarPlacement::Below => {
                Rect::new(geometry.left(), geometry.bottom(), hint.width, hint.height)
            }
            CalendarPlacement::Above => Rect::new(
                geometry.left(),
                geometry.top() - hint.height,
                hint.width,
                hint.height,
            ),
        }
    }

    /// Recompute the popup placement against a boundary rect.
    ///
    /// The placement is always reset to `Below` first and the flip decided
    /// from scratch, so no stale placement survives a re-render. `boundary`
    /// must be in the picker's parent coordinate space.
    pub fn update_popup_placement(&mut self, boundary: Rect) {
        self.placement = CalendarPlacement::Below;
        if detect_overflow(self.popup_rect(), boundary).bottom {
            self.placement = CalendarPlacement::Above;
        }
    }

    // =========================================================================
    // Change Path
    // =========================================================================

    /// The single change path every commit funnels through.
    ///
    /// Sets the popup state, then notifies the consumer. The picker's own
    /// `value` is deliberately left untouched: the consumer owns it and
    /// feeds the new value back via [`set_value`](Self::set_value).
    fn commit(&mut self, value: Option<NaiveDate>, keep_open: bool) {
        self.popup_state = if keep_open {
            PopupState::Open
        } else {
            PopupState::Closed
        };
        self.base.update();

        tracing::debug!(target: "almanac::picker", ?value, keep_open, "date committed");
        self.value_changed.emit(value);
    }

    /// Forward a raw value from the native date-entry control.
    ///
    /// The string is parsed as ISO `YYYY-MM-DD`; a malformed value is passed
    /// through unchanged as `None`. Always a closing commit: there is no
    /// popup to keep open in native mode.
    pub fn commit_native(&mut self, raw: &str) {
        let parsed = parse_iso_date(raw);
        if parsed.is_none() {
            tracing::warn!(
                target: "almanac::picker",
                value = raw,
                "native date entry produced an unparseable value"
            );
        }
        self.commit(parsed, false);
    }

    /// Apply commits queued by the input and calendar collaborators.
    fn drain_commits(&mut self) {
        let pending: Vec<(NaiveDate, bool)> = self.commits.lock().drain(..).collect();
        for (date, keep_open) in pending {
            self.commit(Some(date), keep_open);
        }
    }

    // =========================================================================
    // Focus Handling
    // =========================================================================

    /// Report a global focus change into the picker.
    ///
    /// Hosts that track focus per-window call this with the newly focused
    /// object (or `None`). The picker decides containment explicitly against
    /// its own subtree instead of relying on event bubbling.
    pub fn notify_focus_changed(&mut self, target: Option<ObjectId>) {
        let root = self.base.object_id();
        let inside = target.is_some_and(|id| {
            global_registry()
                .and_then(|registry| registry.is_descendant_of(id, root))
                .unwrap_or(false)
        });

        match target {
            Some(id) if inside => self.handle_focus_in(id),
            _ => {
                if self.focus.clear().is_some() {
                    self.handle_focus_out();
                }
            }
        }
    }

    fn handle_focus_in(&mut self, target: ObjectId) {
        self.focus.set_focus(target);
        self.base.set_focused(true);
        self.blur_pending = false;
        if let Some(timer) = self.close_timer.take() {
            let _ = self.timers.stop(timer);
        }
        self.show_popup();
    }

    fn handle_focus_out(&mut self) {
        self.base.set_focused(false);
        if self.display_native() {
            return;
        }
        self.blur_pending = true;
        self.close_timer = Some(self.timers.start_one_shot(BLUR_CLOSE_DELAY));
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Process this picker's due timers.
    ///
    /// Hosts call this from their loop; fired timers are dispatched back
    /// through [`Widget::event`] as [`TimerEvent`]s.
    pub fn process_timers(&mut self) {
        for id in self.timers.process_expired() {
            let mut event = WidgetEvent::Timer(TimerEvent::new(id));
            self.event(&mut event);
        }
    }

    /// How long until the next owned timer fires, if any is armed.
    pub fn next_timer_delay(&mut self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    fn handle_timer(&mut self, id: TimerId) -> bool {
        if self.close_timer != Some(id) {
            return false;
        }
        self.close_timer = None;

        // The deferred close: only if the blur is still pending and focus
        // has not re-entered the picker's subtree in the meantime.
        if self.blur_pending && !self.focus.contains_focus(self.base.object_id()) {
            self.hide_popup();
            self.blur_pending = false;
        }
        true
    }

    // =========================================================================
    // Hit Testing and Input
    // =========================================================================

    fn input_rect(&self) -> Rect {
        let rect = self.base.rect();
        Rect::new(
            0.0,
            0.0,
            (rect.width() - TOGGLE_BUTTON_WIDTH).max(0.0),
            rect.height(),
        )
    }

    fn toggle_button_rect(&self) -> Rect {
        let rect = self.base.rect();
        Rect::new(
            rect.width() - TOGGLE_BUTTON_WIDTH,
            0.0,
            TOGGLE_BUTTON_WIDTH,
            rect.height(),
        )
    }

    /// The popup rect in the picker's local coordinates.
    fn popup_local_rect(&self) -> Rect {
        let rect = self.base.rect();
        let hint = self.calendar.size_hint().preferred;
        match self.placement {
            CalendarPlacement::Below => Rect::new(0.0, rect.height(), hint.width, hint.height),
            CalendarPlacement::Above => Rect::new(0.0, -hint.height, hint.width, hint.height),
        }
    }

    fn hit_test(&self, pos: Point) -> PickerPart {
        if self.is_open() && self.popup_local_rect().contains(pos) {
            return PickerPart::PopupCalendar;
        }
        if self.toggle_button_rect().contains(pos) {
            return PickerPart::ToggleButton;
        }
        if self.input_rect().contains(pos) {
            return PickerPart::InputField;
        }
        PickerPart::None
    }

    fn handle_mouse_press(&mut self, pos: Point, button: MouseButton) -> bool {
        if self.display_native() || button != MouseButton::Left {
            return false;
        }

        match self.hit_test(pos) {
            PickerPart::ToggleButton => {
                // The toggle button takes no focus of its own, so clicking
                // it is never misread as leaving the widget.
                self.toggle_popup();
                true
            }
            PickerPart::PopupCalendar => {
                let popup = self.popup_local_rect();
                let local = Point::new(pos.x - popup.left(), pos.y - popup.top());
                let mut event =
                    WidgetEvent::MousePress(MousePressEvent::new(local, MouseButton::Left));
                self.calendar.event(&mut event);
                true
            }
            PickerPart::InputField => {
                let mut event =
                    WidgetEvent::MousePress(MousePressEvent::new(pos, MouseButton::Left));
                self.input.event(&mut event)
            }
            PickerPart::None => {
                if self.is_open() {
                    self.hide_popup();
                    true
                } else {
                    false
                }
            }
        }
    }

    fn handle_key_press(&mut self, key: Key, modifiers: KeyboardModifiers) -> bool {
        if self.display_native() {
            return false;
        }

        if key == Key::Escape {
            if self.is_open() {
                self.hide_popup();
                return true;
            }
            return false;
        }

        let mut event = WidgetEvent::KeyPress(KeyPressEvent::with_modifiers(key, modifiers));
        self.input.event(&mut event)
    }

    fn handle_wheel(&mut self, delta_y: f32) -> bool {
        if self.display_native() {
            return false;
        }
        let mut event = WidgetEvent::Wheel(WheelEvent::new(delta_y));
        self.input.event(&mut event)
    }
}

impl Default for DatePicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Object for DatePicker {
    fn object_id(&self) -> ObjectId {
        self.base.object_id()
    }
}

impl Widget for DatePicker {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn size_hint(&self) -> SizeHint {
        let input = self.input.size_hint().preferred;
        SizeHint::from_dimensions(input.width + TOGGLE_BUTTON_WIDTH, input.height)
            .with_minimum_dimensions(100.0, 22.0)
    }

    fn event(&mut self, event: &mut WidgetEvent) -> bool {
        let handled = match event {
            WidgetEvent::MousePress(e) => self.handle_mouse_press(e.local_pos, e.button),
            WidgetEvent::MouseRelease(_) => false,
            WidgetEvent::Wheel(e) => self.handle_wheel(e.delta_y),
            WidgetEvent::KeyPress(e) => self.handle_key_press(e.key, e.modifiers),
            WidgetEvent::FocusIn(_) => {
                let id = self.base.object_id();
                self.handle_focus_in(id);
                false
            }
            WidgetEvent::FocusOut(_) => {
                self.focus.clear();
                self.handle_focus_out();
                false
            }
            WidgetEvent::Timer(e) => self.handle_timer(e.id),
        };

        // Commits the collaborators reported while handling this event flow
        // through the single change path.
        self.drain_commits();

        if handled {
            event.accept();
        }
        handled
    }
}

// Ensure DatePicker is Send + Sync
static_assertions::assert_impl_all!(DatePicker: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::StaticDateEntryProbe;
    use crate::widget::{FocusInEvent, FocusOutEvent, FocusReason};
    use almanac_core::init_global_registry;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread::sleep;

    fn setup() {
        init_global_registry();
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// A picker that never renders natively, regardless of build target.
    fn composed_picker() -> DatePicker {
        setup();
        DatePicker::new()
            .with_locale("en-US")
            .with_probe(StaticDateEntryProbe(false))
    }

    fn focus_in(picker: &mut DatePicker) {
        let mut event = WidgetEvent::FocusIn(FocusInEvent::new(FocusReason::Mouse));
        picker.event(&mut event);
    }

    fn focus_out(picker: &mut DatePicker) {
        let mut event = WidgetEvent::FocusOut(FocusOutEvent::new(FocusReason::Mouse));
        picker.event(&mut event);
    }

    fn spy(picker: &DatePicker) -> (Arc<AtomicUsize>, Arc<Mutex<Vec<Option<NaiveDate>>>>) {
        let count = Arc::new(AtomicUsize::new(0));
        let values = Arc::new(Mutex::new(Vec::new()));
        let count_clone = count.clone();
        let values_clone = values.clone();
        picker.value_changed.connect(move |value| {
            count_clone.fetch_add(1, Ordering::SeqCst);
            values_clone.lock().push(*value);
        });
        (count, values)
    }

    #[test]
    fn test_initial_state_is_unset() {
        let picker = composed_picker();
        assert_eq!(picker.popup_state(), PopupState::Unset);
        assert!(!picker.popup_mounted());
        assert!(!picker.is_open());
        assert_eq!(picker.placement(), CalendarPlacement::Below);
    }

    #[test]
    fn test_with_open_initial_flag() {
        setup();
        let open = DatePicker::new()
            .with_probe(StaticDateEntryProbe(false))
            .with_open(true);
        assert_eq!(open.popup_state(), PopupState::Open);

        let closed = DatePicker::new()
            .with_probe(StaticDateEntryProbe(false))
            .with_open(false);
        assert_eq!(closed.popup_state(), PopupState::Closed);
    }

    #[test]
    fn test_toggle_never_yields_unset() {
        let mut picker = composed_picker();

        picker.toggle_popup();
        assert_eq!(picker.popup_state(), PopupState::Open);

        picker.toggle_popup();
        assert_eq!(picker.popup_state(), PopupState::Closed);

        picker.toggle_popup();
        assert_eq!(picker.popup_state(), PopupState::Open);
    }

    #[test]
    fn test_focus_in_opens_popup() {
        let mut picker = composed_picker();
        focus_in(&mut picker);
        assert!(picker.is_open());
    }

    #[test]
    fn test_blur_then_quick_refocus_keeps_popup_open() {
        let mut picker = composed_picker();

        focus_in(&mut picker);
        focus_out(&mut picker);
        // Refocus before the deferred close fires.
        focus_in(&mut picker);

        sleep(BLUR_CLOSE_DELAY + Duration::from_millis(50));
        picker.process_timers();

        assert!(picker.is_open());
    }

    #[test]
    fn test_blur_without_refocus_closes_popup() {
        let mut picker = composed_picker();

        focus_in(&mut picker);
        assert!(picker.is_open());
        focus_out(&mut picker);
        // Still open until the deferred close fires.
        assert!(picker.is_open());

        sleep(BLUR_CLOSE_DELAY + Duration::from_millis(50));
        picker.process_timers();

        assert_eq!(picker.popup_state(), PopupState::Closed);
    }

    #[test]
    fn test_focus_retained_in_subtree_blocks_close() {
        let mut picker = composed_picker();
        focus_in(&mut picker);

        // Focus hops to the calendar: the host reports the new target and
        // the picker sees it is still within its own subtree.
        let calendar_id = picker.calendar().object_id();
        focus_out(&mut picker);
        picker.notify_focus_changed(Some(calendar_id));

        sleep(BLUR_CLOSE_DELAY + Duration::from_millis(50));
        picker.process_timers();

        assert!(picker.is_open());
    }

    #[test]
    fn test_calendar_pick_commits_once_and_closes() {
        let mut picker = composed_picker();
        let (count, values) = spy(&picker);

        picker.show_popup();
        picker.calendar.select_date(date(2025, 6, 15));
        picker.drain_commits();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(*values.lock(), vec![Some(date(2025, 6, 15))]);
        assert_eq!(picker.popup_state(), PopupState::Closed);
    }

    #[test]
    fn test_commit_does_not_mutate_own_value() {
        let mut picker = composed_picker().with_value(date(2025, 1, 1));
        let (count, _values) = spy(&picker);

        picker.show_popup();
        picker.calendar.select_date(date(2025, 6, 15));
        picker.drain_commits();

        // One-way notification: the consumer feeds the value back.
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(picker.value(), Some(date(2025, 1, 1)));

        picker.set_value(Some(date(2025, 6, 15)));
        assert_eq!(picker.value(), Some(date(2025, 6, 15)));
    }

    #[test]
    fn test_input_edit_keeps_popup_open() {
        let mut picker = composed_picker().with_value(date(2025, 6, 15));
        let (count, values) = spy(&picker);

        focus_in(&mut picker);
        assert!(picker.is_open());

        // Stepping the input is an in-progress edit: it commits upward but
        // leaves the popup open.
        let mut event = WidgetEvent::KeyPress(KeyPressEvent::new(Key::ArrowUp));
        picker.event(&mut event);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(*values.lock(), vec![Some(date(2025, 6, 16))]);
        assert_eq!(picker.popup_state(), PopupState::Open);
    }

    #[test]
    fn test_input_enter_commits_and_closes() {
        let mut picker = composed_picker().with_value(date(2025, 6, 15));
        let (count, values) = spy(&picker);

        focus_in(&mut picker);

        let mut event = WidgetEvent::KeyPress(KeyPressEvent::new(Key::Enter));
        picker.event(&mut event);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(*values.lock(), vec![Some(date(2025, 6, 15))]);
        assert_eq!(picker.popup_state(), PopupState::Closed);
    }

    #[test]
    fn test_native_commit_parses_iso() {
        setup();
        let mut picker = DatePicker::new()
            .with_prefer_native(true)
            .with_probe(StaticDateEntryProbe(true));
        let (count, values) = spy(&picker);

        assert!(picker.display_native());
        picker.commit_native("2025-03-07");

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(*values.lock(), vec![Some(date(2025, 3, 7))]);
        assert_eq!(picker.popup_state(), PopupState::Closed);
    }

    #[test]
    fn test_native_commit_passes_invalid_through() {
        setup();
        let mut picker = DatePicker::new()
            .with_prefer_native(true)
            .with_probe(StaticDateEntryProbe(true));
        let (count, values) = spy(&picker);

        picker.commit_native("31/12/2025");

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(*values.lock(), vec![None]);
    }

    #[test]
    fn test_native_preference_requires_capability() {
        setup();
        let unsupported = DatePicker::new()
            .with_prefer_native(true)
            .with_probe(StaticDateEntryProbe(false));
        assert!(!unsupported.display_native());

        let not_preferred = DatePicker::new().with_probe(StaticDateEntryProbe(true));
        assert!(!not_preferred.display_native());
    }

    #[test]
    fn test_native_value_string() {
        setup();
        let picker = DatePicker::new()
            .with_probe(StaticDateEntryProbe(true))
            .with_value(date(2025, 3, 7));
        assert_eq!(picker.native_value(), "2025-03-07");

        let empty = DatePicker::new().with_probe(StaticDateEntryProbe(true));
        assert_eq!(empty.native_value(), "");
    }

    #[test]
    fn test_placeholder_by_locale() {
        setup();
        let us = DatePicker::new().with_locale("en-US");
        assert_eq!(us.placeholder(), "MM/DD/YYYY");

        let de = DatePicker::new().with_locale("de-DE");
        assert_eq!(de.placeholder(), "DD.MM.YYYY");
    }

    #[test]
    fn test_formatted_value() {
        let picker = composed_picker().with_value(date(2017, 12, 11));
        let formatted = picker.formatted_value().unwrap();
        assert!(formatted.contains("2017"));

        let empty = composed_picker();
        assert_eq!(empty.formatted_value(), None);
    }

    #[test]
    fn test_placement_flips_above_on_bottom_overflow() {
        let mut picker = composed_picker();
        picker
            .widget_base_mut()
            .set_geometry(Rect::new(10.0, 500.0, 134.0, 28.0));

        // Popup below would extend past the 600-high boundary.
        picker.update_popup_placement(Rect::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(picker.placement(), CalendarPlacement::Above);
        assert!(picker.popup_rect().bottom() <= 500.0);

        // A taller boundary fits the popup below again; the previous flip
        // must not stick.
        picker.update_popup_placement(Rect::new(0.0, 0.0, 800.0, 1000.0));
        assert_eq!(picker.placement(), CalendarPlacement::Below);
        assert_eq!(picker.popup_rect().top(), 528.0);
    }

    #[test]
    fn test_toggle_button_press_toggles_popup() {
        let mut picker = composed_picker();
        picker
            .widget_base_mut()
            .set_geometry(Rect::new(0.0, 0.0, 134.0, 28.0));

        let on_button = Point::new(134.0 - TOGGLE_BUTTON_WIDTH / 2.0, 14.0);
        let mut event =
            WidgetEvent::MousePress(MousePressEvent::new(on_button, MouseButton::Left));
        picker.event(&mut event);
        assert!(picker.is_open());
        assert!(event.is_accepted());

        let mut event =
            WidgetEvent::MousePress(MousePressEvent::new(on_button, MouseButton::Left));
        picker.event(&mut event);
        assert!(!picker.is_open());
    }

    #[test]
    fn test_press_outside_closes_popup() {
        let mut picker = composed_picker();
        picker
            .widget_base_mut()
            .set_geometry(Rect::new(0.0, 0.0, 134.0, 28.0));
        picker.show_popup();

        // Well outside the widget and its popup.
        let mut event = WidgetEvent::MousePress(MousePressEvent::new(
            Point::new(500.0, 500.0),
            MouseButton::Left,
        ));
        picker.event(&mut event);
        assert_eq!(picker.popup_state(), PopupState::Closed);
    }

    #[test]
    fn test_escape_closes_popup() {
        let mut picker = composed_picker();
        picker.show_popup();

        let mut event = WidgetEvent::KeyPress(KeyPressEvent::new(Key::Escape));
        picker.event(&mut event);
        assert_eq!(picker.popup_state(), PopupState::Closed);
    }

    #[test]
    fn test_date_range_passes_through_to_calendar() {
        let mut picker =
            composed_picker().with_date_range(date(2025, 1, 1), date(2025, 12, 31));
        let (count, _values) = spy(&picker);

        assert_eq!(picker.min_date(), Some(date(2025, 1, 1)));
        assert_eq!(picker.max_date(), Some(date(2025, 12, 31)));

        // An out-of-range calendar pick never reaches the change path.
        picker.show_popup();
        picker.calendar.select_date(date(2024, 6, 15));
        picker.drain_commits();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_size_hint_covers_button() {
        let picker = composed_picker();
        let hint = picker.size_hint();
        assert!(hint.preferred.width > TOGGLE_BUTTON_WIDTH);
        assert!(hint.preferred.height >= 22.0);
    }
}
