//! Stop identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid stop id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop id {input:?}: {reason}")]
pub struct InvalidStopId {
    input: String,
    reason: &'static str,
}

/// A TfE stop identifier, e.g. `6200204700`.
///
/// Stop ids are non-empty runs of ASCII letters and digits. This type
/// guarantees that any `StopId` value is valid by construction.
///
/// # Examples
///
/// ```
/// use bus_board::domain::StopId;
///
/// let stop = StopId::parse("6200204700").unwrap();
/// assert_eq!(stop.as_str(), "6200204700");
///
/// assert!(StopId::parse("").is_err());
/// assert!(StopId::parse("6200 204700").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopId(String);

impl StopId {
    /// Parse a stop id from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStopId> {
        if s.is_empty() {
            return Err(InvalidStopId {
                input: s.to_string(),
                reason: "must not be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidStopId {
                input: s.to_string(),
                reason: "must be ASCII letters and digits",
            });
        }

        Ok(StopId(s.to_string()))
    }

    /// Returns the stop id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StopId {
    type Error = InvalidStopId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StopId::parse(&value)
    }
}

impl From<StopId> for String {
    fn from(stop: StopId) -> Self {
        stop.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_stop_ids() {
        assert!(StopId::parse("6200204700").is_ok());
        assert!(StopId::parse("36232869").is_ok());
        assert!(StopId::parse("A1").is_ok());
    }

    #[test]
    fn reject_empty() {
        let err = StopId::parse("").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn reject_punctuation_and_whitespace() {
        assert!(StopId::parse("6200-204700").is_err());
        assert!(StopId::parse(" 6200204700").is_err());
        assert!(StopId::parse("*").is_err());
        assert!(StopId::parse("62002ö4700").is_err());
    }

    #[test]
    fn display_and_debug() {
        let stop = StopId::parse("6200243375").unwrap();
        assert_eq!(format!("{stop}"), "6200243375");
        assert_eq!(format!("{stop:?}"), "StopId(6200243375)");
    }

    #[test]
    fn serde_uses_plain_string() {
        let stop = StopId::parse("6200243600").unwrap();
        let json = serde_json::to_string(&stop).unwrap();
        assert_eq!(json, "\"6200243600\"");

        let back: StopId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stop);

        let bad: Result<StopId, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }

    #[test]
    fn hash_consistent_with_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(StopId::parse("6200204700").unwrap());
        assert!(set.contains(&StopId::parse("6200204700").unwrap()));
        assert!(!set.contains(&StopId::parse("6200204380").unwrap()));
    }
}
