//! String attributes of a timer instance.
//!
//! Hosts configure timers the way markup configures an element: with a
//! `time` attribute holding seconds and a `label` attribute holding the
//! display name. Both are plain strings and are normalized here. Invalid
//! values never fail, they fall back to defaults.
//!
//! ```rust
//! use countdown_ring::attr::{parse_time, normalize_label, DEFAULT_TIME};
//!
//! assert_eq!(parse_time("90"), 90);
//! assert_eq!(parse_time("abc"), DEFAULT_TIME);
//! assert_eq!(normalize_label(Some("  Pasta ")), "Pasta");
//! assert_eq!(normalize_label(None), "Timer");
//! ```

/// Duration in seconds used when `time` is missing or invalid.
pub const DEFAULT_TIME: u64 = 20;

/// Display name used when `label` is missing or blank.
pub const DEFAULT_LABEL: &str = "Timer";

/// Attributes a timer observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// Total seconds to count down from.
    Time,
    /// Display name.
    Label,
}

impl Attribute {
    /// Every observed attribute.
    pub const OBSERVED: [Attribute; 2] = [Attribute::Time, Attribute::Label];

    /// Looks up an attribute by its markup name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "time" => Some(Attribute::Time),
            "label" => Some(Attribute::Label),
            _ => None,
        }
    }

    /// Markup name of the attribute.
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Time => "time",
            Attribute::Label => "label",
        }
    }
}

/// Parses a `time` attribute value into whole seconds.
///
/// The value is read as a number; finite positive values are floored.
/// Anything else, including values that floor to zero, yields
/// [`DEFAULT_TIME`].
pub fn parse_time(value: &str) -> u64 {
    match value.trim().parse::<f64>() {
        Ok(seconds) => sanitize_time(seconds),
        Err(_) => DEFAULT_TIME,
    }
}

/// Applies the `time` fallback rule to a numeric value.
pub fn sanitize_time(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return DEFAULT_TIME;
    }
    match seconds.floor() as u64 {
        0 => DEFAULT_TIME,
        whole => whole,
    }
}

/// Trims a `label` value, substituting [`DEFAULT_LABEL`] when blank.
pub fn normalize_label(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => DEFAULT_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_valid() {
        assert_eq!(parse_time("5"), 5);
        assert_eq!(parse_time(" 125 "), 125);
        assert_eq!(parse_time("7.9"), 7);
        assert_eq!(parse_time("1e2"), 100);
    }

    #[test]
    fn test_parse_time_falls_back() {
        assert_eq!(parse_time(""), DEFAULT_TIME);
        assert_eq!(parse_time("0"), DEFAULT_TIME);
        assert_eq!(parse_time("-3"), DEFAULT_TIME);
        assert_eq!(parse_time("0.5"), DEFAULT_TIME);
        assert_eq!(parse_time("NaN"), DEFAULT_TIME);
        assert_eq!(parse_time("inf"), DEFAULT_TIME);
        assert_eq!(parse_time("ten"), DEFAULT_TIME);
    }

    #[test]
    fn test_sanitize_time() {
        assert_eq!(sanitize_time(42.0), 42);
        assert_eq!(sanitize_time(f64::INFINITY), DEFAULT_TIME);
        assert_eq!(sanitize_time(0.0), DEFAULT_TIME);
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label(Some("Eggs")), "Eggs");
        assert_eq!(normalize_label(Some("  Eggs\t")), "Eggs");
        assert_eq!(normalize_label(Some("   ")), DEFAULT_LABEL);
        assert_eq!(normalize_label(Some("")), DEFAULT_LABEL);
        assert_eq!(normalize_label(None), DEFAULT_LABEL);
    }

    #[test]
    fn test_attribute_names() {
        for attr in Attribute::OBSERVED {
            assert_eq!(Attribute::from_name(attr.name()), Some(attr));
        }
        assert_eq!(Attribute::from_name("color"), None);
    }
}
