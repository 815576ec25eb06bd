//! Cross-widget interaction tests for the widget system.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use parking_lot::Mutex;

use almanac_core::{Object, init_global_registry};

use super::widgets::{DatePicker, PopupState};
use super::{
    FocusInEvent, FocusReason, Key, KeyPressEvent, MousePressEvent, WheelEvent, Widget,
    WidgetEvent,
};
use crate::platform::StaticDateEntryProbe;

fn setup() {
    init_global_registry();
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn composed_picker() -> DatePicker {
    setup();
    DatePicker::new()
        .with_locale("en-US")
        .with_probe(StaticDateEntryProbe(false))
}

fn press_key(picker: &mut DatePicker, key: Key) {
    let mut event = WidgetEvent::KeyPress(KeyPressEvent::new(key));
    picker.event(&mut event);
}

#[test]
fn test_picker_parts_are_registered_descendants() {
    let picker = composed_picker();

    let registry = almanac_core::global_registry().unwrap();
    let picker_id = picker.object_id();

    assert!(
        registry
            .is_descendant_of(picker.input().object_id(), picker_id)
            .unwrap()
    );
    assert!(
        registry
            .is_descendant_of(picker.calendar().object_id(), picker_id)
            .unwrap()
    );
}

#[test]
fn test_typed_entry_flows_through_picker() {
    let mut picker = composed_picker();
    let emitted = Arc::new(Mutex::new(Vec::new()));

    let emitted_clone = emitted.clone();
    picker.value_changed.connect(move |value| {
        emitted_clone.lock().push(*value);
    });

    let mut event = WidgetEvent::FocusIn(FocusInEvent::new(FocusReason::Tab));
    picker.event(&mut event);
    assert!(picker.is_open());

    // Type a full date through the picker boundary; en-US section order is
    // month, day, year.
    for c in "06152025".chars() {
        press_key(&mut picker, Key::Char(c));
    }

    // In-progress assembly commits upward but keeps the popup open.
    assert_eq!(*emitted.lock(), vec![Some(date(2025, 6, 15))]);
    assert_eq!(picker.popup_state(), PopupState::Open);

    // The consumer feeds the value back, then finalizes.
    picker.set_value(Some(date(2025, 6, 15)));
    press_key(&mut picker, Key::Enter);

    assert_eq!(
        *emitted.lock(),
        vec![Some(date(2025, 6, 15)), Some(date(2025, 6, 15))]
    );
    assert_eq!(picker.popup_state(), PopupState::Closed);
}

#[test]
fn test_wheel_steps_through_picker() {
    let mut picker = composed_picker().with_value(date(2025, 6, 15));
    let count = Arc::new(AtomicUsize::new(0));

    let count_clone = count.clone();
    picker.value_changed.connect(move |_| {
        count_clone.fetch_add(1, Ordering::SeqCst);
    });

    let mut event = WidgetEvent::Wheel(WheelEvent::new(1.0));
    picker.event(&mut event);

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_calendar_click_through_picker_closes_and_commits() {
    let mut picker = composed_picker();
    picker
        .widget_base_mut()
        .set_geometry(crate::geometry::Rect::new(0.0, 0.0, 134.0, 28.0));
    let emitted = Arc::new(Mutex::new(Vec::new()));

    let emitted_clone = emitted.clone();
    picker.value_changed.connect(move |value| {
        emitted_clone.lock().push(*value);
    });

    picker.set_value(Some(date(2017, 12, 11)));
    picker.show_popup();

    // Click the popup cell holding December 1: column 4, first grid row
    // (ISO week start; the popup grid starts below its 48px header bands
    // and the popup itself sits below the 28px input).
    let click = crate::geometry::Point::new(4.5 * 32.0, 28.0 + 48.0 + 1.0);
    let mut event = WidgetEvent::MousePress(MousePressEvent::new(click, super::MouseButton::Left));
    picker.event(&mut event);

    assert_eq!(*emitted.lock(), vec![Some(date(2017, 12, 1))]);
    assert_eq!(picker.popup_state(), PopupState::Closed);
}

#[test]
fn test_native_mode_ignores_composed_input() {
    setup();
    let mut picker = DatePicker::new()
        .with_prefer_native(true)
        .with_probe(StaticDateEntryProbe(true));
    let count = Arc::new(AtomicUsize::new(0));

    let count_clone = count.clone();
    picker.value_changed.connect(move |_| {
        count_clone.fetch_add(1, Ordering::SeqCst);
    });

    // Focus and keys do nothing in native mode; the popup never mounts.
    let mut event = WidgetEvent::FocusIn(FocusInEvent::new(FocusReason::Mouse));
    picker.event(&mut event);
    press_key(&mut picker, Key::ArrowUp);

    assert_eq!(picker.popup_state(), PopupState::Unset);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    // The native path still reaches the single change handler.
    picker.commit_native("2025-06-15");
    assert_eq!(count.load(Ordering::SeqCst), 1);
}
