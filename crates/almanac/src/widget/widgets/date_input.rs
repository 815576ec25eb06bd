//! Segmented date input widget.
//!
//! `DateInput` models month/day/year text entry with the sections ordered by
//! the locale's date field order. Sections are navigated with the arrow and
//! Tab keys, stepped with Up/Down or the scroll wheel, and filled by typing
//! digits. A complete section set assembles into a date.
//!
//! Two upward paths exist: `value_edited` fires for in-progress edits
//! (stepping, digit assembly) and `value_committed` fires when editing is
//! finalized with Enter. The distinction lets a containing picker keep its
//! popup open during multi-section entry while closing on a final commit.

use chrono::{Datelike, Local, NaiveDate};

use almanac_core::{Object, ObjectId, Signal};

use crate::locale::{DateFormatter, DateLength, DateOrder};
use crate::widget::{
    FocusPolicy, Key, KeyboardModifiers, MouseButton, SizeHint, Widget, WidgetBase, WidgetEvent,
};

use super::days_in_month;

/// Which section is currently focused for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum EditSection {
    #[default]
    None,
    Month,
    Day,
    Year,
}

impl EditSection {
    /// How many digits fill this section.
    fn capacity(self) -> usize {
        match self {
            Self::Year => 4,
            Self::Month | Self::Day => 2,
            Self::None => 0,
        }
    }
}

/// A widget for entering a date through month/day/year sections.
///
/// # Signals
///
/// - `value_edited(NaiveDate)`: Emitted when an in-progress edit produces a
///   complete date (section stepping, digit assembly)
/// - `value_committed(NaiveDate)`: Emitted when editing is finalized
/// - `editing_finished()`: Emitted when editing ends (Enter or focus loss)
pub struct DateInput {
    /// Widget base.
    base: WidgetBase,

    /// Locale-aware formatter; also defines the section order.
    formatter: DateFormatter,

    /// Current value. Consumer-owned; fed in via `set_value`.
    value: Option<NaiveDate>,

    /// Section currently being edited.
    current_section: EditSection,

    /// Digits typed into the current section so far.
    pending: String,

    /// Partially entered month.
    draft_month: Option<u32>,
    /// Partially entered day.
    draft_day: Option<u32>,
    /// Partially entered year.
    draft_year: Option<i32>,

    /// Signal emitted when an in-progress edit produces a complete date.
    pub value_edited: Signal<NaiveDate>,
    /// Signal emitted when editing is finalized.
    pub value_committed: Signal<NaiveDate>,
    /// Signal emitted when editing ends.
    pub editing_finished: Signal<()>,
}

impl DateInput {
    /// Create a new date input using the system locale.
    pub fn new() -> Self {
        let mut base = WidgetBase::new::<Self>();
        base.set_focus_policy(FocusPolicy::StrongFocus);

        Self {
            base,
            formatter: DateFormatter::new(),
            value: None,
            current_section: EditSection::None,
            pending: String::new(),
            draft_month: None,
            draft_day: None,
            draft_year: None,
            value_edited: Signal::new(),
            value_committed: Signal::new(),
            editing_finished: Signal::new(),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Get the locale identifier in use.
    pub fn locale(&self) -> &str {
        self.formatter.locale()
    }

    /// Set the locale; reorders sections and re-derives the placeholder.
    pub fn set_locale(&mut self, locale: &str) {
        self.formatter = DateFormatter::with_locale(locale);
        self.base.update();
    }

    /// Set the locale using builder pattern.
    pub fn with_locale(mut self, locale: &str) -> Self {
        self.formatter = DateFormatter::with_locale(locale);
        self
    }

    /// Get the current value.
    pub fn value(&self) -> Option<NaiveDate> {
        self.value
    }

    /// Set the current value without emitting signals (consumer feedback path).
    pub fn set_value(&mut self, value: Option<NaiveDate>) {
        if self.value != value {
            self.value = value;
            self.base.update();
        }
    }

    /// Set the value using builder pattern.
    pub fn with_value(mut self, value: NaiveDate) -> Self {
        self.value = Some(value);
        self
    }

    /// The symbolic placeholder for the empty input (e.g. `MM/DD/YYYY`).
    pub fn placeholder(&self) -> String {
        self.formatter.placeholder()
    }

    /// Text the host should display: the formatted value, or the placeholder.
    pub fn display_text(&self) -> String {
        match self.value {
            Some(date) => self.formatter.format_date(date, DateLength::Numeric),
            None => self.placeholder(),
        }
    }

    // =========================================================================
    // Section Navigation
    // =========================================================================

    /// Section order for the active locale.
    fn section_order(&self) -> [EditSection; 3] {
        match self.formatter.field_order() {
            DateOrder::Mdy => [EditSection::Month, EditSection::Day, EditSection::Year],
            DateOrder::Dmy => [EditSection::Day, EditSection::Month, EditSection::Year],
            DateOrder::Ymd => [EditSection::Year, EditSection::Month, EditSection::Day],
        }
    }

    fn next_section(&mut self) {
        self.commit_pending();
        let order = self.section_order();
        self.current_section = match order.iter().position(|&s| s == self.current_section) {
            Some(2) => EditSection::None,
            Some(i) => order[i + 1],
            None => order[0],
        };
        self.base.update();
    }

    fn previous_section(&mut self) {
        self.commit_pending();
        let order = self.section_order();
        self.current_section = match order.iter().position(|&s| s == self.current_section) {
            Some(0) => EditSection::None,
            Some(i) => order[i - 1],
            None => order[2],
        };
        self.base.update();
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Step the focused section by one unit in either direction.
    ///
    /// Operates on the current value, or today when empty. Month and day
    /// wrap; the day is clamped to the target month's length.
    fn step(&mut self, up: bool) {
        if self.current_section == EditSection::None {
            self.current_section = EditSection::Day;
        }

        let date = self.value.unwrap_or_else(|| Local::now().date_naive());

        let new_date = match self.current_section {
            EditSection::None => return,
            EditSection::Month => {
                let (new_year, new_month) = if up {
                    if date.month() == 12 {
                        (date.year() + 1, 1)
                    } else {
                        (date.year(), date.month() + 1)
                    }
                } else if date.month() == 1 {
                    (date.year() - 1, 12)
                } else {
                    (date.year(), date.month() - 1)
                };
                let day = date.day().min(days_in_month(new_year, new_month));
                NaiveDate::from_ymd_opt(new_year, new_month, day)
            }
            EditSection::Day => {
                let max_day = days_in_month(date.year(), date.month());
                let new_day = if up {
                    if date.day() >= max_day { 1 } else { date.day() + 1 }
                } else if date.day() == 1 {
                    max_day
                } else {
                    date.day() - 1
                };
                NaiveDate::from_ymd_opt(date.year(), date.month(), new_day)
            }
            EditSection::Year => {
                let new_year = if up { date.year() + 1 } else { date.year() - 1 };
                // Clamp for leap-day edits (Feb 29).
                let day = date.day().min(days_in_month(new_year, date.month()));
                NaiveDate::from_ymd_opt(new_year, date.month(), day)
            }
        };

        if let Some(d) = new_date {
            self.value = Some(d);
            self.base.update();
            self.value_edited.emit(d);
        }
    }

    // =========================================================================
    // Digit Entry
    // =========================================================================

    fn handle_digit(&mut self, digit: char) {
        if self.current_section == EditSection::None {
            self.current_section = self.section_order()[0];
        }

        // First keystroke on an existing value starts the draft from it, so
        // editing one section keeps the others.
        if self.draft_month.is_none()
            && self.draft_day.is_none()
            && self.draft_year.is_none()
            && let Some(value) = self.value
        {
            self.draft_month = Some(value.month());
            self.draft_day = Some(value.day());
            self.draft_year = Some(value.year());
        }

        self.pending.push(digit);
        self.base.update();

        if self.pending.len() >= self.current_section.capacity() {
            self.commit_pending();
            if self.try_assemble_edited() {
                return;
            }
            self.next_section();
        }
    }

    /// Store the pending digits into the draft for the current section.
    fn commit_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        match self.current_section {
            EditSection::Month => {
                if let Ok(month) = self.pending.parse::<u32>()
                    && (1..=12).contains(&month)
                {
                    self.draft_month = Some(month);
                } else {
                    tracing::warn!(target: "almanac::widget", raw = %self.pending, "month out of range");
                }
            }
            EditSection::Day => {
                if let Ok(day) = self.pending.parse::<u32>()
                    && (1..=31).contains(&day)
                {
                    self.draft_day = Some(day);
                } else {
                    tracing::warn!(target: "almanac::widget", raw = %self.pending, "day out of range");
                }
            }
            EditSection::Year => {
                if let Ok(year) = self.pending.parse::<i32>() {
                    self.draft_year = Some(year);
                }
            }
            EditSection::None => {}
        }

        self.pending.clear();
    }

    /// Build a date from the draft sections, if all are present and valid.
    fn assemble_draft(&mut self) -> Option<NaiveDate> {
        let (Some(month), Some(day), Some(year)) =
            (self.draft_month, self.draft_day, self.draft_year)
        else {
            return None;
        };

        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => {
                self.draft_month = None;
                self.draft_day = None;
                self.draft_year = None;
                Some(date)
            }
            None => {
                tracing::warn!(
                    target: "almanac::widget",
                    year, month, day,
                    "entered sections do not form a valid date"
                );
                None
            }
        }
    }

    /// Assemble the draft and report it as an in-progress edit.
    fn try_assemble_edited(&mut self) -> bool {
        if let Some(date) = self.assemble_draft() {
            self.value = Some(date);
            self.base.update();
            self.value_edited.emit(date);
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Event Handlers
    // =========================================================================

    fn handle_key_press(&mut self, key: Key, modifiers: KeyboardModifiers) -> bool {
        match key {
            Key::Char(c) if c.is_ascii_digit() => {
                self.handle_digit(c);
                true
            }
            Key::ArrowUp => {
                self.step(true);
                true
            }
            Key::ArrowDown => {
                self.step(false);
                true
            }
            Key::ArrowRight => {
                self.next_section();
                true
            }
            Key::ArrowLeft => {
                self.previous_section();
                true
            }
            Key::Tab => {
                if modifiers.shift {
                    self.previous_section();
                } else {
                    self.next_section();
                }
                true
            }
            Key::Backspace => {
                if self.pending.pop().is_some() {
                    self.base.update();
                }
                true
            }
            Key::Enter => {
                self.commit_pending();
                if let Some(date) = self.assemble_draft() {
                    self.value = Some(date);
                    self.base.update();
                    self.value_committed.emit(date);
                } else if let Some(value) = self.value {
                    self.value_committed.emit(value);
                }
                self.editing_finished.emit(());
                true
            }
            _ => false,
        }
    }

    fn handle_mouse_press(&mut self, button: MouseButton) -> bool {
        if button != MouseButton::Left {
            return false;
        }

        // Cycle through sections on click; exact per-section bounds are a
        // rendering concern the host owns.
        let order = self.section_order();
        self.current_section = match order.iter().position(|&s| s == self.current_section) {
            Some(i) => order[(i + 1) % 3],
            None => order[0],
        };
        self.base.update();
        true
    }

    fn handle_focus_out(&mut self) {
        self.current_section = EditSection::None;
        self.pending.clear();
        self.draft_month = None;
        self.draft_day = None;
        self.draft_year = None;
        self.editing_finished.emit(());
        self.base.update();
    }
}

impl Default for DateInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Object for DateInput {
    fn object_id(&self) -> ObjectId {
        self.base.object_id()
    }
}

impl Widget for DateInput {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::from_dimensions(110.0, 28.0).with_minimum_dimensions(80.0, 22.0)
    }

    fn event(&mut self, event: &mut WidgetEvent) -> bool {
        match event {
            WidgetEvent::KeyPress(e) => {
                if self.handle_key_press(e.key, e.modifiers) {
                    event.accept();
                    return true;
                }
            }
            WidgetEvent::MousePress(e) => {
                if self.handle_mouse_press(e.button) {
                    event.accept();
                    return true;
                }
            }
            WidgetEvent::Wheel(e) => {
                let up = e.delta_y > 0.0;
                if e.delta_y.abs() > 0.0 {
                    self.step(up);
                    event.accept();
                    return true;
                }
            }
            WidgetEvent::FocusOut(_) => {
                self.handle_focus_out();
            }
            _ => {}
        }
        false
    }
}

// Ensure DateInput is Send + Sync
static_assertions::assert_impl_all!(DateInput: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::KeyPressEvent;
    use almanac_core::init_global_registry;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn setup() {
        init_global_registry();
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn press(input: &mut DateInput, key: Key) {
        let mut event = WidgetEvent::KeyPress(KeyPressEvent::new(key));
        input.event(&mut event);
    }

    fn type_digits(input: &mut DateInput, digits: &str) {
        for c in digits.chars() {
            press(input, Key::Char(c));
        }
    }

    #[test]
    fn test_placeholder_follows_locale() {
        setup();
        let input = DateInput::new().with_locale("en-US");
        assert_eq!(input.placeholder(), "MM/DD/YYYY");

        let input = DateInput::new().with_locale("de-DE");
        assert_eq!(input.placeholder(), "DD.MM.YYYY");
    }

    #[test]
    fn test_display_text() {
        setup();
        let mut input = DateInput::new().with_locale("en-US");
        assert_eq!(input.display_text(), "MM/DD/YYYY");

        input.set_value(Some(date(2017, 12, 11)));
        assert_eq!(input.display_text(), "12/11/2017");
    }

    #[test]
    fn test_typed_date_assembles_and_edits() {
        setup();
        let mut input = DateInput::new().with_locale("en-US");
        let edited = Arc::new(Mutex::new(Vec::new()));

        let edited_clone = edited.clone();
        input.value_edited.connect(move |d| {
            edited_clone.lock().push(*d);
        });

        // en-US order: month, day, year.
        type_digits(&mut input, "06152025");

        assert_eq!(*edited.lock(), vec![date(2025, 6, 15)]);
        assert_eq!(input.value(), Some(date(2025, 6, 15)));
    }

    #[test]
    fn test_day_first_locale_section_order() {
        setup();
        let mut input = DateInput::new().with_locale("de-DE");
        let edited = Arc::new(Mutex::new(Vec::new()));

        let edited_clone = edited.clone();
        input.value_edited.connect(move |d| {
            edited_clone.lock().push(*d);
        });

        // de-DE order: day, month, year.
        type_digits(&mut input, "15062025");

        assert_eq!(*edited.lock(), vec![date(2025, 6, 15)]);
    }

    #[test]
    fn test_editing_single_section_keeps_others() {
        setup();
        let mut input = DateInput::new()
            .with_locale("en-US")
            .with_value(date(2025, 6, 15));

        // Type a new month; day and year are seeded from the value.
        type_digits(&mut input, "09");
        assert_eq!(input.value(), Some(date(2025, 9, 15)));
    }

    #[test]
    fn test_step_up_day_wraps_month_length() {
        setup();
        let mut input = DateInput::new().with_value(date(2025, 1, 31));
        // Focused section defaults to Day on first step.
        press(&mut input, Key::ArrowUp);
        assert_eq!(input.value(), Some(date(2025, 1, 1)));

        press(&mut input, Key::ArrowDown);
        assert_eq!(input.value(), Some(date(2025, 1, 31)));
    }

    #[test]
    fn test_step_year_clamps_leap_day() {
        setup();
        let mut input = DateInput::new().with_value(date(2024, 2, 29));
        // Move focus to the year section: en-US order is M/D/Y.
        press(&mut input, Key::ArrowRight);
        press(&mut input, Key::ArrowRight);
        press(&mut input, Key::ArrowRight);
        press(&mut input, Key::ArrowUp);
        assert_eq!(input.value(), Some(date(2025, 2, 28)));
    }

    #[test]
    fn test_step_emits_value_edited() {
        setup();
        let mut input = DateInput::new().with_value(date(2025, 6, 15));
        let edited = Arc::new(Mutex::new(Vec::new()));

        let edited_clone = edited.clone();
        input.value_edited.connect(move |d| {
            edited_clone.lock().push(*d);
        });

        press(&mut input, Key::ArrowUp);
        assert_eq!(*edited.lock(), vec![date(2025, 6, 16)]);
    }

    #[test]
    fn test_enter_commits_value() {
        setup();
        let mut input = DateInput::new().with_value(date(2025, 6, 15));
        let committed = Arc::new(Mutex::new(Vec::new()));

        let committed_clone = committed.clone();
        input.value_committed.connect(move |d| {
            committed_clone.lock().push(*d);
        });

        press(&mut input, Key::Enter);
        assert_eq!(*committed.lock(), vec![date(2025, 6, 15)]);
    }

    #[test]
    fn test_invalid_assembled_date_not_emitted() {
        setup();
        let mut input = DateInput::new().with_locale("en-US");
        let edited = Arc::new(Mutex::new(Vec::new()));

        let edited_clone = edited.clone();
        input.value_edited.connect(move |d| {
            edited_clone.lock().push(*d);
        });

        // February 31 does not exist.
        type_digits(&mut input, "02312025");
        assert!(edited.lock().is_empty());
        assert_eq!(input.value(), None);
    }

    #[test]
    fn test_focus_out_resets_editing_state() {
        setup();
        let mut input = DateInput::new().with_locale("en-US");
        let finished = Arc::new(Mutex::new(0usize));

        let finished_clone = finished.clone();
        input.editing_finished.connect(move |()| {
            *finished_clone.lock() += 1;
        });

        type_digits(&mut input, "06");
        let mut event = WidgetEvent::FocusOut(crate::widget::FocusOutEvent::new(
            crate::widget::FocusReason::Other,
        ));
        input.event(&mut event);

        assert_eq!(*finished.lock(), 1);
        // The abandoned draft is discarded.
        assert_eq!(input.value(), None);
    }
}
