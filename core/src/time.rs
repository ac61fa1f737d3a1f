//! Time related utils.

use crate::Error;
use crate::Result;
use chrono::NaiveDateTime;
use chrono::Utc;

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Time format for ISO 8601 basic format: "20220313T072004Z"
const ISO8601: &str = "%Y%m%dT%H%M%SZ";

/// Create a new DateTime of current time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into ISO 8601 basic format: "20220313T072004Z"
///
/// Sub-second precision is dropped.
pub fn format_iso8601(t: DateTime) -> String {
    t.format(ISO8601).to_string()
}

/// Parse time from ISO 8601 basic format: "20220313T072004Z"
///
/// Only the exact 16 characters layout is accepted: eight digits, `T`, six
/// digits and `Z`.
pub fn parse_iso8601(s: &str) -> Result<DateTime> {
    if !is_iso8601_layout(s.as_bytes()) {
        return Err(Error::request_invalid(format!(
            "timestamp {s:?} is not in YYYYMMDDThhmmssZ format"
        )));
    }

    Ok(NaiveDateTime::parse_from_str(s, ISO8601)?.and_utc())
}

// chrono skips whitespace and accepts short fields, so the layout is checked
// byte by byte first.
fn is_iso8601_layout(b: &[u8]) -> bool {
    b.len() == 16
        && b[..8].iter().all(u8::is_ascii_digit)
        && b[8] == b'T'
        && b[9..15].iter().all(u8::is_ascii_digit)
        && b[15] == b'Z'
}
