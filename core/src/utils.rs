//! Utility functions and types.

use std::fmt::Debug;

/// Redacts a secret so it can be printed in `Debug` output and logs.
///
/// - Empty values are printed as `EMPTY`.
/// - Values shorter than 12 characters are fully hidden as `***`.
/// - Longer values keep their first three and last three characters.
///
/// Users can still tell two redacted keys apart without the key being leaked.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or_default())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let chars = self.0.chars().count();
        if chars == 0 {
            return f.write_str("EMPTY");
        }
        if chars < 12 {
            return f.write_str("***");
        }

        // Work on char boundaries so that non-ascii secrets never panic.
        let head: String = self.0.chars().take(3).collect();
        let tail: String = self.0.chars().skip(chars - 3).collect();
        write!(f, "{head}***{tail}")
    }
}
