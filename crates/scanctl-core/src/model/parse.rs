// ── Lenient parse helpers ──
//
// The wire encodes booleans as "0"/"1" strings, numbers as strings, and
// timestamps as RFC 3339. Every helper here degrades silently: an
// unparseable value becomes `None`, never an error. The upstream format
// distinguishes "explicitly false" from "not provided", which is why
// boolean-coded fields parse to `Option<YesNo>` rather than `bool`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Explicit yes/no as carried on the wire.
///
/// Wrapped in `Option` at the parse boundary: `Some(Yes)`, `Some(No)`,
/// or `None` for absent/unrecognized input. Models apply their own
/// defaults after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == Self::Yes
    }
}

/// Parse a string-coded boolean: `"1"` → yes, `"0"` → no, anything else
/// (including absence) → `None`.
pub fn parse_yes_no(value: Option<&str>) -> Option<YesNo> {
    match value {
        Some("1") => Some(YesNo::Yes),
        Some("0") => Some(YesNo::No),
        _ => None,
    }
}

/// Parse an optional stringified integer, silently dropping unparseable
/// values.
pub fn parse_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|s| s.trim().parse().ok())
}

/// Parse an optional stringified float.
pub fn parse_float(value: Option<&str>) -> Option<f64> {
    value.and_then(|s| s.trim().parse().ok())
}

/// Parse an RFC 3339 timestamp string.
pub fn parse_datetime(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whether a raw id field names a real sub-object: present and non-empty.
pub fn has_id(id: Option<&str>) -> bool {
    id.is_some_and(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_codes() {
        assert_eq!(parse_yes_no(Some("1")), Some(YesNo::Yes));
        assert_eq!(parse_yes_no(Some("0")), Some(YesNo::No));
        assert_eq!(parse_yes_no(Some("2")), None);
        assert_eq!(parse_yes_no(Some("")), None);
        assert_eq!(parse_yes_no(None), None);
    }

    #[test]
    fn int_parse_is_lenient() {
        assert_eq!(parse_int(Some("42")), Some(42));
        assert_eq!(parse_int(Some(" 42 ")), Some(42));
        assert_eq!(parse_int(Some("forty-two")), None);
        assert_eq!(parse_int(None), None);
    }

    #[test]
    fn datetime_parse_is_lenient() {
        let ts = parse_datetime(Some("2025-06-01T10:20:30Z"));
        assert!(ts.is_some());
        assert_eq!(parse_datetime(Some("yesterday")), None);
    }

    #[test]
    fn id_presence_requires_non_empty() {
        assert!(has_id(Some("abc")));
        assert!(!has_id(Some("")));
        assert!(!has_id(None));
    }
}
