//! Almanac - headless date picker widgets for Rust.
//!
//! Almanac provides a [`DatePicker`] root widget that composes a segmented
//! [`DateInput`] with a popup [`CalendarWidget`]. The widgets are headless:
//! they own state, geometry, and event handling, and a host shell renders
//! them however it likes.
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
//!     println!("Picked: {:?}", date);
//! });
//!
//! assert_eq!(picker.placeholder(), "MM/DD/YYYY");
//! ```

pub use almanac_core::*;

pub mod geometry;
pub mod locale;
pub mod platform;
pub mod widget;

// Re-export widgets for convenience
pub use widget::widgets::{
    CalendarPlacement, CalendarType, CalendarWidget, DateInput, DatePicker, PopupState,
};
