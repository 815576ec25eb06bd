//! Calendar widget: a navigable month grid.
//!
//! `CalendarWidget` models one displayed month at a time. It owns the
//! displayed year/month, an optional selected date, optional range bounds,
//! and the week-start convention. The grid itself is exposed through
//! [`CalendarWidget::month_grid`] for the host to render; day selection
//! arrives through mouse presses on grid cells and is reported upward via
//! the `date_selected` signal.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate, Weekday};

use almanac_core::{Object, ObjectId, Signal};

use crate::geometry::Point;
use crate::widget::{
    FocusPolicy, MouseButton, SizeHint, Widget, WidgetBase, WidgetEvent,
};

use super::days_in_month;

/// Height of the month navigation header band.
const HEADER_HEIGHT: f32 = 28.0;
/// Height of the weekday-name row under the header.
const WEEKDAY_ROW_HEIGHT: f32 = 20.0;
/// Width of a day cell.
const CELL_WIDTH: f32 = 32.0;
/// Height of a day cell.
const CELL_HEIGHT: f32 = 26.0;
/// Grid rows reserved in the size hint. Six rows cover every month layout.
const GRID_ROWS: f32 = 6.0;

/// Week-start convention for the calendar grid.
///
/// Each variant maps to the weekday the grid's leftmost column represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarType {
    /// ISO 8601: weeks start on Monday.
    #[default]
    Iso8601,
    /// US convention: weeks start on Sunday.
    Us,
    /// Arabic convention: weeks start on Saturday.
    Arabic,
    /// Hebrew convention: weeks start on Sunday.
    Hebrew,
}

impl CalendarType {
    /// The weekday shown in the grid's first column.
    pub fn first_day_of_week(self) -> Weekday {
        match self {
            Self::Iso8601 => Weekday::Mon,
            Self::Us | Self::Hebrew => Weekday::Sun,
            Self::Arabic => Weekday::Sat,
        }
    }

    /// The canonical identifier for this calendar type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Iso8601 => "iso8601",
            Self::Us => "us",
            Self::Arabic => "arabic",
            Self::Hebrew => "hebrew",
        }
    }
}

impl fmt::Display for CalendarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized calendar type identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarTypeParseError {
    /// The rejected identifier.
    pub value: String,
}

impl fmt::Display for CalendarTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized calendar type: {:?}", self.value)
    }
}

impl std::error::Error for CalendarTypeParseError {}

impl FromStr for CalendarType {
    type Err = CalendarTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace([' ', '-'], "").as_str() {
            "iso8601" => Ok(Self::Iso8601),
            "us" => Ok(Self::Us),
            "arabic" => Ok(Self::Arabic),
            "hebrew" => Ok(Self::Hebrew),
            _ => {
                tracing::warn!(
                    target: "almanac::widget",
                    value = s,
                    "unrecognized calendar type identifier"
                );
                Err(CalendarTypeParseError {
                    value: s.to_string(),
                })
            }
        }
    }
}

/// A navigable month grid that reports day selections.
///
/// # Signals
///
/// - `date_selected(NaiveDate)`: Emitted when the user selects a day
pub struct CalendarWidget {
    /// Widget base.
    base: WidgetBase,

    /// Year of the displayed month.
    displayed_year: i32,
    /// Displayed month (1-12).
    displayed_month: u32,

    /// Currently selected date.
    selected_date: Option<NaiveDate>,

    /// Minimum selectable date.
    minimum_date: Option<NaiveDate>,
    /// Maximum selectable date.
    maximum_date: Option<NaiveDate>,

    /// Week-start convention.
    calendar_type: CalendarType,

    /// Whether to expose ISO week numbers alongside the grid.
    show_week_numbers: bool,

    /// Signal emitted when the user selects a day.
    pub date_selected: Signal<NaiveDate>,
}

impl CalendarWidget {
    /// Create a new calendar showing the current month.
    pub fn new() -> Self {
        let mut base = WidgetBase::new::<Self>();
        base.set_focus_policy(FocusPolicy::StrongFocus);

        let today = Local::now().date_naive();

        Self {
            base,
            displayed_year: today.year(),
            displayed_month: today.month(),
            selected_date: None,
            minimum_date: None,
            maximum_date: None,
            calendar_type: CalendarType::default(),
            show_week_numbers: false,
            date_selected: Signal::new(),
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Get the currently selected date.
    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    /// Set the selected date without emitting `date_selected`.
    ///
    /// This is the downward (consumer-driven) path; user selections go
    /// through [`select_date`](Self::select_date).
    pub fn set_selected_date(&mut self, date: Option<NaiveDate>) {
        if self.selected_date != date {
            self.selected_date = date;
            self.base.update();
        }
    }

    /// Set the selected date using builder pattern.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.selected_date = Some(date);
        self.show_date(date);
        self
    }

    /// Select a date as a user action.
    ///
    /// Out-of-range dates are ignored. A successful selection updates the
    /// displayed month and emits `date_selected`.
    pub fn select_date(&mut self, date: NaiveDate) {
        if !self.is_date_valid(date) {
            tracing::trace!(target: "almanac::widget", %date, "selection outside date range ignored");
            return;
        }

        self.selected_date = Some(date);
        self.show_date(date);
        self.base.update();
        self.date_selected.emit(date);
    }

    // =========================================================================
    // Date Constraints
    // =========================================================================

    /// Get the minimum selectable date.
    pub fn minimum_date(&self) -> Option<NaiveDate> {
        self.minimum_date
    }

    /// Set the minimum selectable date.
    pub fn set_minimum_date(&mut self, date: Option<NaiveDate>) {
        self.minimum_date = date;
        self.base.update();
    }

    /// Set the minimum date using builder pattern.
    pub fn with_minimum_date(mut self, date: NaiveDate) -> Self {
        self.minimum_date = Some(date);
        self
    }

    /// Get the maximum selectable date.
    pub fn maximum_date(&self) -> Option<NaiveDate> {
        self.maximum_date
    }

    /// Set the maximum selectable date.
    pub fn set_maximum_date(&mut self, date: Option<NaiveDate>) {
        self.maximum_date = date;
        self.base.update();
    }

    /// Set the maximum date using builder pattern.
    pub fn with_maximum_date(mut self, date: NaiveDate) -> Self {
        self.maximum_date = Some(date);
        self
    }

    /// Set both range bounds at once.
    pub fn set_date_range(&mut self, min: Option<NaiveDate>, max: Option<NaiveDate>) {
        self.minimum_date = min;
        self.maximum_date = max;
        self.base.update();
    }

    /// Check whether a date falls within the configured bounds.
    pub fn is_date_valid(&self, date: NaiveDate) -> bool {
        if let Some(min) = self.minimum_date
            && date < min
        {
            return false;
        }
        if let Some(max) = self.maximum_date
            && date > max
        {
            return false;
        }
        true
    }

    // =========================================================================
    // Display Options
    // =========================================================================

    /// Get the week-start convention.
    pub fn calendar_type(&self) -> CalendarType {
        self.calendar_type
    }

    /// Set the week-start convention.
    pub fn set_calendar_type(&mut self, calendar_type: CalendarType) {
        if self.calendar_type != calendar_type {
            self.calendar_type = calendar_type;
            self.base.update();
        }
    }

    /// Set the week-start convention using builder pattern.
    pub fn with_calendar_type(mut self, calendar_type: CalendarType) -> Self {
        self.calendar_type = calendar_type;
        self
    }

    /// The weekday shown in the grid's first column.
    pub fn first_day_of_week(&self) -> Weekday {
        self.calendar_type.first_day_of_week()
    }

    /// Check whether week numbers are shown.
    pub fn show_week_numbers(&self) -> bool {
        self.show_week_numbers
    }

    /// Set whether week numbers are shown.
    pub fn set_week_numbers(&mut self, show: bool) {
        if self.show_week_numbers != show {
            self.show_week_numbers = show;
            self.base.update();
        }
    }

    /// Set week numbers using builder pattern.
    pub fn with_week_numbers(mut self, show: bool) -> Self {
        self.show_week_numbers = show;
        self
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Get the displayed year and month.
    pub fn displayed_year_month(&self) -> (i32, u32) {
        (self.displayed_year, self.displayed_month)
    }

    /// Show the previous month, if any of it is within bounds.
    pub fn show_previous_month(&mut self) {
        let (year, month) = if self.displayed_month == 1 {
            (self.displayed_year - 1, 12)
        } else {
            (self.displayed_year, self.displayed_month - 1)
        };
        self.show_year_month(year, month);
    }

    /// Show the next month, if any of it is within bounds.
    pub fn show_next_month(&mut self) {
        let (year, month) = if self.displayed_month == 12 {
            (self.displayed_year + 1, 1)
        } else {
            (self.displayed_year, self.displayed_month + 1)
        };
        self.show_year_month(year, month);
    }

    /// Show the same month one year earlier.
    pub fn show_previous_year(&mut self) {
        self.show_year_month(self.displayed_year - 1, self.displayed_month);
    }

    /// Show the same month one year later.
    pub fn show_next_year(&mut self) {
        self.show_year_month(self.displayed_year + 1, self.displayed_month);
    }

    /// Show the month containing today.
    pub fn show_today(&mut self) {
        let today = Local::now().date_naive();
        self.show_date(today);
    }

    /// Show the month containing the given date.
    pub fn show_date(&mut self, date: NaiveDate) {
        self.show_year_month(date.year(), date.month());
    }

    /// Show a specific year/month if any of its days are within bounds.
    fn show_year_month(&mut self, year: i32, month: u32) {
        let Some(month_start) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return;
        };
        let month_end = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
            .unwrap_or(month_start);

        if let Some(min) = self.minimum_date
            && month_end < min
        {
            return;
        }
        if let Some(max) = self.maximum_date
            && month_start > max
        {
            return;
        }

        if (self.displayed_year, self.displayed_month) != (year, month) {
            self.displayed_year = year;
            self.displayed_month = month;
            self.base.update();
        }
    }

    // =========================================================================
    // Grid Model
    // =========================================================================

    /// The week rows of the displayed month.
    ///
    /// Each row holds seven cells ordered from the configured first day of
    /// the week; cells outside the displayed month are `None`.
    pub fn month_grid(&self) -> Vec<[Option<NaiveDate>; 7]> {
        let first = NaiveDate::from_ymd_opt(self.displayed_year, self.displayed_month, 1)
            .expect("displayed month is a valid year/month");
        let days = days_in_month(self.displayed_year, self.displayed_month);

        let first_column = self.first_day_of_week().num_days_from_monday();
        let offset = (7 + first.weekday().num_days_from_monday() - first_column) % 7;

        let total_cells = (offset + days).div_ceil(7) * 7;
        let mut rows = Vec::with_capacity((total_cells / 7) as usize);
        let mut row = [None; 7];

        for cell in 0..total_cells {
            let column = (cell % 7) as usize;
            if cell >= offset && cell - offset < days {
                let day = cell - offset + 1;
                row[column] =
                    NaiveDate::from_ymd_opt(self.displayed_year, self.displayed_month, day);
            }
            if column == 6 {
                rows.push(row);
                row = [None; 7];
            }
        }

        rows
    }

    /// ISO week numbers for each row of [`month_grid`](Self::month_grid).
    ///
    /// Empty when week numbers are disabled.
    pub fn week_numbers(&self) -> Vec<u32> {
        if !self.show_week_numbers {
            return Vec::new();
        }

        self.month_grid()
            .iter()
            .filter_map(|row| row.iter().flatten().next())
            .map(|date| date.iso_week().week())
            .collect()
    }

    /// The date under a point in the widget's local coordinates, if the
    /// point hits a day cell of the displayed month.
    pub fn date_at(&self, pos: Point) -> Option<NaiveDate> {
        let grid_top = HEADER_HEIGHT + WEEKDAY_ROW_HEIGHT;
        if pos.y < grid_top || pos.x < 0.0 {
            return None;
        }

        let week_number_columns = if self.show_week_numbers { 1 } else { 0 };
        let column = (pos.x / CELL_WIDTH) as usize;
        if column < week_number_columns {
            return None;
        }
        let column = column - week_number_columns;
        if column >= 7 {
            return None;
        }

        let row = ((pos.y - grid_top) / CELL_HEIGHT) as usize;
        *self.month_grid().get(row)?.get(column)?
    }

    // =========================================================================
    // Event Handling
    // =========================================================================

    fn handle_mouse_press(&mut self, pos: Point, button: MouseButton) -> bool {
        if button != MouseButton::Left || !self.base.is_enabled() {
            return false;
        }

        // Header band: outer quarters navigate months.
        if pos.y < HEADER_HEIGHT {
            let width = self.size_hint().preferred.width;
            if pos.x < width / 4.0 {
                self.show_previous_month();
                return true;
            }
            if pos.x > width * 3.0 / 4.0 {
                self.show_next_month();
                return true;
            }
            return false;
        }

        if let Some(date) = self.date_at(pos) {
            self.select_date(date);
            return true;
        }

        false
    }
}

impl Default for CalendarWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl Object for CalendarWidget {
    fn object_id(&self) -> ObjectId {
        self.base.object_id()
    }
}

impl Widget for CalendarWidget {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn size_hint(&self) -> SizeHint {
        let columns = if self.show_week_numbers { 8.0 } else { 7.0 };
        let width = columns * CELL_WIDTH;
        let height = HEADER_HEIGHT + WEEKDAY_ROW_HEIGHT + GRID_ROWS * CELL_HEIGHT;
        SizeHint::from_dimensions(width, height)
    }

    fn event(&mut self, event: &mut WidgetEvent) -> bool {
        if let WidgetEvent::MousePress(e) = event
            && self.handle_mouse_press(e.local_pos, e.button)
        {
            event.accept();
            return true;
        }
        false
    }
}

// Ensure CalendarWidget is Send + Sync
static_assertions::assert_impl_all!(CalendarWidget: Send, Sync);
