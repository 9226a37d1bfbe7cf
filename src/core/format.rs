//! Line formatting shared by every provider
//!
//! A record renders as `[<Level>][<timestamp>]<message>\n`, for example:
//!
//! ```text
//! [Info][Wed May 1 14:03:05.123 UTC+08 2024]hello 1
//! ```
//!
//! Local time zone abbreviations are not available through chrono, so the zone
//! is written as `UTC` followed by the signed hour offset.

use super::log_level::LogLevel;
use super::log_record::LogRecord;
use chrono::{DateTime, TimeZone};
use std::fmt;

/// strftime pattern for the timestamp segment of a line
pub const TIMESTAMP_PATTERN: &str = "%a %b %-d %H:%M:%S%.3f UTC%:::z %Y";

/// Render a timestamp with [`TIMESTAMP_PATTERN`]
#[must_use]
pub fn format_timestamp<Tz>(datetime: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    datetime.format(TIMESTAMP_PATTERN).to_string()
}

/// Render a full line from its parts. `level_name` is taken as-is.
#[must_use]
pub fn format_line<Tz>(level_name: &str, datetime: &DateTime<Tz>, message: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!("[{}][{}]{}\n", level_name, format_timestamp(datetime), message)
}

/// Render a line for a raw numeric level; out-of-range levels print as `unknown`
#[must_use]
pub fn format_raw<Tz>(raw_level: u8, datetime: &DateTime<Tz>, message: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format_line(LogLevel::name_of(raw_level), datetime, message)
}

/// Render a record, newline included
#[must_use]
pub fn format_record(record: &LogRecord) -> String {
    format_line(record.level().to_str(), record.timestamp(), record.message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Local};

    fn fixed_datetime(offset_hours: i32) -> DateTime<FixedOffset> {
        // 2024-05-01 14:03:05.123 at the given offset
        FixedOffset::east_opt(offset_hours * 3600)
            .expect("valid offset")
            .with_ymd_and_hms(2024, 5, 1, 14, 3, 5)
            .single()
            .expect("valid datetime")
            + chrono::Duration::milliseconds(123)
    }

    #[test]
    fn test_timestamp_positive_offset() {
        assert_eq!(
            format_timestamp(&fixed_datetime(8)),
            "Wed May 1 14:03:05.123 UTC+08 2024"
        );
    }

    #[test]
    fn test_timestamp_negative_offset() {
        assert_eq!(
            format_timestamp(&fixed_datetime(-7)),
            "Wed May 1 14:03:05.123 UTC-07 2024"
        );
    }

    #[test]
    fn test_line_layout() {
        let line = format_line("Info", &fixed_datetime(0), "hello 1");
        assert_eq!(line, "[Info][Wed May 1 14:03:05.123 UTC+00 2024]hello 1\n");
    }

    #[test]
    fn test_unknown_level() {
        let line = format_raw(0, &fixed_datetime(0), "x");
        assert!(line.starts_with("[unknown]["));
        let line = format_raw(3, &fixed_datetime(0), "x");
        assert!(line.starts_with("[Warn]["));
    }

    #[test]
    fn test_record_keeps_message_verbatim() {
        let record = LogRecord::with_timestamp(LogLevel::Error, "a\tb\nc", Local::now());
        let line = format_record(&record);
        assert!(line.starts_with("[Error]["));
        assert!(line.ends_with("]a\tb\nc\n"));
    }
}
