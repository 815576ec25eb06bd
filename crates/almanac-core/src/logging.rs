//! Logging facilities for Almanac.
//!
//! Almanac uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! The constants below can be used with `tracing` filter directives to
//! select logs for a specific subsystem, e.g.
//! `RUST_LOG=almanac_core::timer=trace`.

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "almanac_core";
    /// Object model target.
    pub const OBJECT: &str = "almanac_core::object";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "almanac_core::signal";
    /// Timer system target.
    pub const TIMER: &str = "almanac_core::timer";
}

/// Span names used throughout Almanac for tracing.
pub mod span_names {
    /// Timer processing span.
    pub const TIMER: &str = "almanac::timer";
    /// Signal emission span.
    pub const SIGNAL: &str = "almanac::signal";
    /// Widget event dispatch span.
    pub const WIDGET_EVENT: &str = "almanac::widget_event";
}
