//! Core systems for Almanac widgets.
//!
//! This crate provides the foundational components the Almanac widget
//! toolkit is built on:
//!
//! - **Object Model**: Parent-child ownership, naming, ancestor queries
//! - **Signal/Slot System**: Type-safe inter-object communication
//! - **Timers**: One-shot and repeating timer system
//!
//! # Signal/Slot Example
//!
//! ```
//! use almanac_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Timer Example
//!
//! ```
//! use almanac_core::TimerManager;
//! use std::time::Duration;
//!
//! let mut timers = TimerManager::new();
//! let id = timers.start_one_shot(Duration::from_millis(100));
//!
//! // Later, from the host loop:
//! for fired in timers.process_expired() {
//!     println!("Timer {:?} fired!", fired);
//! }
//! # let _ = id;
//! ```

mod error;
pub mod logging;
pub mod object;
mod signal;
mod timer;

pub use error::{CoreError, Result, SignalError, TimerError};
pub use object::{
    Object, ObjectBase, ObjectError, ObjectId, ObjectRegistry, ObjectResult,
    SharedObjectRegistry, global_registry, init_global_registry,
};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use timer::{SharedTimerManager, TimerId, TimerKind, TimerManager};
