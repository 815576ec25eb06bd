//! Platform capability probing for native date entry.
//!
//! The date picker can defer to the host platform's built-in date-entry
//! control instead of rendering its composed input + popup calendar. Whether
//! such a control exists is a platform question, answered through the
//! [`DateEntryProbe`] trait so the policy is injectable: production code
//! uses [`SystemDateEntryProbe`], tests substitute [`StaticDateEntryProbe`]
//! for deterministic behavior.
//!
//! The picker queries the probe on every rendering decision rather than
//! caching the answer once.

/// Probes whether the host platform offers a native date-entry control.
pub trait DateEntryProbe: Send + Sync {
    /// Check whether a native date-entry control is available.
    fn native_date_entry_supported(&self) -> bool;
}

/// Probes the actual build target.
///
/// macOS and Windows ship system date pickers (NSDatePicker and the common
/// controls date-time picker); other targets report no native support.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDateEntryProbe;

impl DateEntryProbe for SystemDateEntryProbe {
    fn native_date_entry_supported(&self) -> bool {
        cfg!(any(target_os = "macos", target_os = "windows"))
    }
}

/// A probe with a fixed answer, for tests and host overrides.
#[derive(Debug, Clone, Copy)]
pub struct StaticDateEntryProbe(pub bool);

impl DateEntryProbe for StaticDateEntryProbe {
    fn native_date_entry_supported(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_probe_reports_fixed_answer() {
        assert!(StaticDateEntryProbe(true).native_date_entry_supported());
        assert!(!StaticDateEntryProbe(false).native_date_entry_supported());
    }
}
