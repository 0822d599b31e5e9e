//! Flag types and upstream value coercion.

use serde::{Deserialize, Serialize};

use crate::utils::now_rfc3339;

/// The full set of feature flags served by this process.
///
/// Replaced wholesale on every change, never merged field by field. The
/// timestamp is generated locally at replace time and is absent only for the
/// hardcoded startup default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSet {
    /// The `fear` feature flag.
    pub fear: bool,
    /// RFC 3339 time of the last update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl FlagSet {
    /// Create a flag set with a fresh timestamp.
    pub fn new(fear: bool) -> Self {
        Self {
            fear,
            timestamp: Some(now_rfc3339()),
        }
    }

    /// Create a flag set from a raw parameter store value.
    pub fn from_raw(raw: &str) -> Self {
        Self::new(flag_value(raw))
    }
}

impl Default for FlagSet {
    fn default() -> Self {
        Self {
            fear: true,
            timestamp: None,
        }
    }
}

/// Coerce a raw parameter store value to a flag boolean.
///
/// Exactly `"true"` is true; everything else, including absence upstream,
/// is false.
pub fn flag_value(raw: &str) -> bool {
    raw == "true"
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn only_the_exact_string_true_is_true() {
        assert!(flag_value("true"));
        assert!(!flag_value("false"));
        assert!(!flag_value(""));
        assert!(!flag_value("1"));
        assert!(!flag_value("True"));
        assert!(!flag_value(" true"));
    }

    #[test]
    fn default_flag_set_has_no_timestamp() {
        let flags = FlagSet::default();
        assert!(flags.fear);
        assert!(flags.timestamp.is_none());
    }

    #[test]
    fn from_raw_stamps_the_set() {
        let flags = FlagSet::from_raw("false");
        assert!(!flags.fear);
        assert!(flags.timestamp.is_some());
    }

    #[test]
    fn default_serializes_without_timestamp() {
        let json = serde_json::to_string(&FlagSet::default()).unwrap();
        assert_eq!(json, r#"{"fear":true}"#);
    }

    #[test]
    fn stamped_set_serializes_with_timestamp() {
        let json = serde_json::to_value(FlagSet::new(false)).unwrap();
        assert_eq!(json["fear"], false);
        assert!(json["timestamp"].is_string());
    }
}
