//! # Entry Names
//!
//! A [`PodName`] is the key of a POD entry. Names are restricted to an
//! identifier charset, `^[A-Za-z_][A-Za-z0-9_]*$`, so they hash canonically
//! and can be used as circuit identifiers or path components.
//!
//! ## Security Invariant
//!
//! The only way to obtain a `PodName` is through validation ([`PodName::new`],
//! `FromStr`, or `Deserialize`). Ordering is plain byte order, which is also
//! UTF-16 code unit order for this ASCII-only charset, so every
//! implementation sorts entries identically.

use std::borrow::Borrow;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PodError;

// Literal pattern; `test_name_pattern_compiles` covers the `expect`.
fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"))
}

/// A validated entry name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PodName(String);

impl PodName {
    /// Validate and wrap an entry name.
    pub fn new(name: impl Into<String>) -> Result<Self, PodError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Check `name` against the identifier charset without allocating.
    pub fn validate(name: &str) -> Result<(), PodError> {
        if name_regex().is_match(name) {
            return Ok(());
        }
        let reason = if name.is_empty() {
            "name is empty"
        } else if name.starts_with(|c: char| c.is_ascii_digit()) {
            "name starts with a digit"
        } else {
            "name contains characters outside [A-Za-z0-9_]"
        };
        Err(PodError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PodName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PodName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for PodName {
    type Err = PodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for PodName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for PodName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PodName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::new(name).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_pattern_compiles() {
        assert!(name_regex().is_match("_a1"));
        assert!(!name_regex().is_match("1a"));
    }

    #[test]
    fn test_valid_names() {
        for name in ["A", "a", "_", "_private", "ticketId", "x1", "snake_case_9"] {
            assert!(PodName::new(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "1a", "with space", "dash-ed", "dot.ted", "caf\u{e9}", "a\n"] {
            let err = PodName::new(name).unwrap_err();
            assert!(matches!(err, PodError::InvalidName { .. }), "{name:?}");
        }
    }

    #[test]
    fn test_reason_names_the_problem() {
        let err = PodName::new("9lives").unwrap_err();
        assert!(err.to_string().contains("digit"));
        let err = PodName::new("").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_ordering_is_byte_order() {
        let mut names: Vec<PodName> = ["b", "B", "_", "a", "A"]
            .iter()
            .map(|n| PodName::new(*n).unwrap())
            .collect();
        names.sort();
        let sorted: Vec<&str> = names.iter().map(PodName::as_str).collect();
        assert_eq!(sorted, vec!["A", "B", "_", "a", "b"]);
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<PodName>("\"ok_name\"").is_ok());
        assert!(serde_json::from_str::<PodName>("\"not ok\"").is_err());
    }
}
