//! Locale detection and locale-aware date formatting.
//!
//! The date widgets need three things from a locale: which order the date
//! fields appear in, how a date reads in long form, and a symbolic
//! placeholder (`MM/DD/YYYY` vs `DD.MM.YYYY`) for empty inputs.
//!
//! With the `localization` feature enabled, long-form display formatting
//! goes through ICU4X and the system locale is detected via `sys-locale`.
//! Without it, a heuristic field-order table keeps the widgets usable with
//! sensible output for common locales. Numeric formatting and the
//! placeholder always use the heuristic path so the `YYYY`/`MM`/`DD` token
//! contract holds regardless of feature flags.
//!
//! # Example
//!
//! ```
//! use almanac::locale::{DateFormatter, DateLength};
//! use chrono::NaiveDate;
//!
//! let formatter = DateFormatter::with_locale("en-US");
//! let date = NaiveDate::from_ymd_opt(2017, 12, 11).unwrap();
//!
//! assert_eq!(formatter.format_date(date, DateLength::Numeric), "12/11/2017");
//! assert_eq!(formatter.placeholder(), "MM/DD/YYYY");
//! ```

use chrono::{Datelike, NaiveDate};

/// Fixed reference date used for placeholder derivation.
///
/// Chosen so that year, month, and day render as distinct numerals
/// (2017, 12, 11) that can be substituted by symbolic markers.
const PLACEHOLDER_SAMPLE: (i32, u32, u32) = (2017, 12, 11);

/// Static methods for detecting the system locale.
pub struct SystemLocale;

impl SystemLocale {
    /// Get the current system locale identifier.
    ///
    /// Returns a BCP 47 locale identifier (e.g., "en-US", "fr-FR"), falling
    /// back to "en-US" when detection fails.
    #[cfg(feature = "localization")]
    pub fn current() -> String {
        sys_locale::get_locale().unwrap_or_else(|| "en-US".to_string())
    }

    /// Get the current system locale identifier.
    ///
    /// Without the `localization` feature this reads the `LANG` environment
    /// variable (e.g., "en_US.UTF-8"), falling back to "en-US".
    #[cfg(not(feature = "localization"))]
    pub fn current() -> String {
        std::env::var("LANG")
            .ok()
            .and_then(|lang| {
                let trimmed = lang.split('.').next().unwrap_or("").replace('_', "-");
                if trimmed.is_empty() { None } else { Some(trimmed) }
            })
            .unwrap_or_else(|| "en-US".to_string())
    }
}

/// Requested length of a formatted date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateLength {
    /// Numeric format: zero-padded fields with a four-digit year,
    /// e.g. "12/11/2017" (en-US) or "11.12.2017" (de-DE).
    #[default]
    Numeric,
    /// Medium format: abbreviated month name, e.g. "Dec 11, 2017".
    Medium,
    /// Long format: full month name, e.g. "December 11, 2017".
    Long,
    /// Full format: weekday and full month name.
    Full,
}

/// Date component ordering for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    /// Day/Month/Year (most of the world).
    Dmy,
    /// Month/Day/Year (US).
    Mdy,
    /// Year/Month/Day (ISO, East Asian).
    Ymd,
}

impl DateOrder {
    /// Determine the date field order and separator for a locale.
    pub fn detect(locale: &str) -> (DateOrder, char) {
        let parts: Vec<&str> = locale.split(['-', '_']).collect();
        let lang = parts
            .first()
            .map(|s| s.to_lowercase())
            .unwrap_or_else(|| "en".to_string());
        let region = parts.get(1).map(|s| s.to_uppercase());

        // YMD locales (East Asian, Hungarian, Lithuanian, Persian)
        if matches!(lang.as_str(), "ja" | "zh" | "ko" | "hu" | "lt" | "mn" | "fa") {
            return (DateOrder::Ymd, '/');
        }

        // MDY locales (primarily US-influenced)
        if matches!(
            (lang.as_str(), region.as_deref()),
            ("en", Some("US")) | ("en", Some("PH")) | ("es", Some("US")) | ("fil", _)
        ) {
            return (DateOrder::Mdy, '/');
        }

        // DMY with period separator (German, Nordic, Central European)
        if matches!(
            lang.as_str(),
            "de" | "no" | "nb" | "nn" | "fi" | "et" | "lv" | "sl" | "sk" | "cs" | "hr" | "ro"
                | "bg"
        ) {
            return (DateOrder::Dmy, '.');
        }

        // DMY with dash separator (Dutch, Danish)
        if matches!(lang.as_str(), "nl" | "da" | "is") {
            return (DateOrder::Dmy, '-');
        }

        // Default: DMY with slash (most of the world)
        (DateOrder::Dmy, '/')
    }
}

/// Locale-aware date formatter.
///
/// Formats dates according to locale conventions and derives the symbolic
/// field-order placeholder used by empty date inputs.
pub struct DateFormatter {
    locale: String,
    /// Field order for numeric formatting.
    order: DateOrder,
    /// Separator character for numeric formatting.
    separator: char,
    #[cfg(feature = "localization")]
    icu_locale: icu::locale::Locale,
}

impl DateFormatter {
    /// Create a new date formatter using the system locale.
    pub fn new() -> Self {
        Self::with_locale(&SystemLocale::current())
    }

    /// Create a date formatter for a specific locale.
    pub fn with_locale(locale: &str) -> Self {
        let (order, separator) = DateOrder::detect(locale);

        #[cfg(feature = "localization")]
        let icu_locale: icu::locale::Locale = locale
            .parse()
            .unwrap_or_else(|_| "en-US".parse().expect("well-formed fallback locale"));

        Self {
            locale: locale.to_string(),
            order,
            separator,
            #[cfg(feature = "localization")]
            icu_locale,
        }
    }

    /// Get the locale identifier being used.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Get the date field order for this locale.
    pub fn field_order(&self) -> DateOrder {
        self.order
    }

    /// Format a date according to the locale.
    pub fn format_date(&self, date: NaiveDate, length: DateLength) -> String {
        match length {
            // Numeric output always goes through the heuristic path: the
            // placeholder substitution depends on a four-digit year and the
            // plain zero-padded fields it produces.
            DateLength::Numeric => self.format_numeric(date),
            #[cfg(feature = "localization")]
            _ => self.format_icu(date, length),
            #[cfg(not(feature = "localization"))]
            _ => self.format_heuristic(date, length),
        }
    }

    /// Derive the symbolic placeholder for this locale.
    ///
    /// Formats the fixed reference date 2017-12-11 numerically, then
    /// substitutes the first occurrence of `2017` with `YYYY`, then `12`
    /// with `MM`, then `11` with `DD`, in that order. This yields a
    /// locale-correct field-order placeholder without per-locale metadata.
    /// If a formatted fragment coincides with an already-substituted one
    /// the output can corrupt; accepted approximation.
    pub fn placeholder(&self) -> String {
        let (y, m, d) = PLACEHOLDER_SAMPLE;
        let sample = NaiveDate::from_ymd_opt(y, m, d).expect("reference date is valid");

        self.format_numeric(sample)
            .replacen("2017", "YYYY", 1)
            .replacen("12", "MM", 1)
            .replacen("11", "DD", 1)
    }

    /// Numeric formatting: zero-padded fields, four-digit year, locale
    /// field order and separator.
    fn format_numeric(&self, date: NaiveDate) -> String {
        let d = date.day();
        let m = date.month();
        let y = date.year();
        let sep = self.separator;

        match self.order {
            DateOrder::Dmy => format!("{d:02}{sep}{m:02}{sep}{y:04}"),
            DateOrder::Mdy => format!("{m:02}{sep}{d:02}{sep}{y:04}"),
            DateOrder::Ymd => format!("{y:04}{sep}{m:02}{sep}{d:02}"),
        }
    }

    /// Format a date through ICU4X, falling back to the heuristic path when
    /// the formatter cannot be constructed for this locale.
    #[cfg(feature = "localization")]
    fn format_icu(&self, date: NaiveDate, length: DateLength) -> String {
        use icu::calendar::Date;
        use icu::datetime::DateTimeFormatter as IcuDateTimeFormatter;
        use icu::datetime::fieldsets;

        let icu_date = match Date::try_new_iso(date.year(), date.month() as u8, date.day() as u8)
        {
            Ok(d) => d,
            Err(_) => return self.format_heuristic(date, length),
        };

        let result = match length {
            DateLength::Numeric => unreachable!("numeric formatting is heuristic-only"),
            DateLength::Medium => {
                IcuDateTimeFormatter::try_new(self.icu_locale.clone().into(), fieldsets::YMD::medium())
                    .ok()
                    .map(|f| f.format(&icu_date).to_string())
            }
            DateLength::Long => {
                IcuDateTimeFormatter::try_new(self.icu_locale.clone().into(), fieldsets::YMD::long())
                    .ok()
                    .map(|f| f.format(&icu_date).to_string())
            }
            DateLength::Full => {
                IcuDateTimeFormatter::try_new(self.icu_locale.clone().into(), fieldsets::YMDE::long())
                    .ok()
                    .map(|f| f.format(&icu_date).to_string())
            }
        };

        result.unwrap_or_else(|| self.format_heuristic(date, length))
    }

    /// Heuristic named-month formatting for builds without ICU4X (and as the
    /// ICU4X error fallback). Month and weekday names are English.
    fn format_heuristic(&self, date: NaiveDate, length: DateLength) -> String {
        let d = date.day();
        let y = date.year();

        match length {
            DateLength::Numeric => self.format_numeric(date),
            DateLength::Medium => {
                let month = date.format("%b").to_string();
                match self.order {
                    DateOrder::Dmy => format!("{d} {month} {y}"),
                    DateOrder::Mdy => format!("{month} {d}, {y}"),
                    DateOrder::Ymd => format!("{y} {month} {d}"),
                }
            }
            DateLength::Long => {
                let month = date.format("%B").to_string();
                match self.order {
                    DateOrder::Dmy => format!("{d} {month} {y}"),
                    DateOrder::Mdy => format!("{month} {d}, {y}"),
                    DateOrder::Ymd => format!("{y} {month} {d}"),
                }
            }
            DateLength::Full => {
                let weekday = date.format("%A").to_string();
                let month = date.format("%B").to_string();
                match self.order {
                    DateOrder::Dmy => format!("{weekday}, {d} {month} {y}"),
                    DateOrder::Mdy => format!("{weekday}, {month} {d}, {y}"),
                    DateOrder::Ymd => format!("{weekday}, {y} {month} {d}"),
                }
            }
        }
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a date as a fixed ISO `YYYY-MM-DD` string.
///
/// This is the interchange format for native date-entry controls.
pub fn iso_date_string(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse a fixed ISO `YYYY-MM-DD` string into a date.
///
/// Returns `None` for malformed input; no correction is attempted.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 12, 11).unwrap()
    }

    #[test]
    fn test_numeric_format_en_us() {
        let formatter = DateFormatter::with_locale("en-US");
        assert_eq!(formatter.format_date(sample(), DateLength::Numeric), "12/11/2017");
    }

    #[test]
    fn test_numeric_format_de_de() {
        let formatter = DateFormatter::with_locale("de-DE");
        assert_eq!(formatter.format_date(sample(), DateLength::Numeric), "11.12.2017");
    }

    #[test]
    fn test_numeric_format_ja_jp() {
        let formatter = DateFormatter::with_locale("ja-JP");
        assert_eq!(formatter.format_date(sample(), DateLength::Numeric), "2017/12/11");
    }

    #[test]
    fn test_placeholder_month_first() {
        let formatter = DateFormatter::with_locale("en-US");
        assert_eq!(formatter.placeholder(), "MM/DD/YYYY");
    }

    #[test]
    fn test_placeholder_day_first() {
        let formatter = DateFormatter::with_locale("de-DE");
        assert_eq!(formatter.placeholder(), "DD.MM.YYYY");
    }

    #[test]
    fn test_placeholder_year_first() {
        let formatter = DateFormatter::with_locale("ja-JP");
        assert_eq!(formatter.placeholder(), "YYYY/MM/DD");
    }

    #[test]
    fn test_placeholder_en_gb_day_first() {
        let formatter = DateFormatter::with_locale("en-GB");
        assert_eq!(formatter.placeholder(), "DD/MM/YYYY");
    }

    #[test]
    fn test_field_order_detection() {
        assert_eq!(DateOrder::detect("en-US"), (DateOrder::Mdy, '/'));
        assert_eq!(DateOrder::detect("en-GB"), (DateOrder::Dmy, '/'));
        assert_eq!(DateOrder::detect("de-DE"), (DateOrder::Dmy, '.'));
        assert_eq!(DateOrder::detect("nl-NL"), (DateOrder::Dmy, '-'));
        assert_eq!(DateOrder::detect("ko-KR"), (DateOrder::Ymd, '/'));
        // Underscore-separated identifiers are accepted too
        assert_eq!(DateOrder::detect("en_US"), (DateOrder::Mdy, '/'));
    }

    #[test]
    fn test_iso_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let raw = iso_date_string(date);
        assert_eq!(raw, "2025-03-07");
        assert_eq!(parse_iso_date(&raw), Some(date));
    }

    #[test]
    fn test_parse_iso_rejects_malformed() {
        assert_eq!(parse_iso_date("not-a-date"), None);
        assert_eq!(parse_iso_date("2025-13-40"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn test_long_format_contains_month_name() {
        let formatter = DateFormatter::with_locale("en-US");
        let formatted = formatter.format_date(sample(), DateLength::Long);
        assert!(formatted.contains("December"), "got: {formatted}");
        assert!(formatted.contains("2017"));
    }
}
