use std::{fmt, str::FromStr};

/// The human-facing identifier of a requirement.
///
/// Format: `REQ-` followed by exactly three decimal digits, e.g. `REQ-001` or
/// `REQ-042`. The key is stable across versions: a spawned version carries the
/// key of its archived ancestor. It is distinct from the internal storage
/// identifier ([`uuid::Uuid`]), which is unique per record.
///
/// Note that the quality rule engine, not this type, owns the `ID_FORMAT`
/// violation: candidate drafts carry their key as a raw string so that a
/// malformed key surfaces as a quality violation rather than a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequirementKey(u16);

impl RequirementKey {
    /// The prefix carried by every requirement key.
    pub const PREFIX: &'static str = "REQ-";

    /// Returns the numeric suffix of the key.
    #[must_use]
    pub const fn number(self) -> u16 {
        self.0
    }
}

/// Errors that can occur when parsing a requirement key.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseKeyError {
    /// The key does not start with `REQ-`.
    #[error("invalid requirement key '{0}': expected the 'REQ-' prefix")]
    Prefix(String),

    /// The suffix is not exactly three decimal digits.
    #[error("invalid requirement key '{0}': expected exactly three digits after 'REQ-'")]
    Digits(String),
}

impl FromStr for RequirementKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffix = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| ParseKeyError::Prefix(s.to_string()))?;

        if suffix.len() != 3 || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseKeyError::Digits(s.to_string()));
        }

        let number = suffix
            .parse()
            .map_err(|_| ParseKeyError::Digits(s.to_string()))?;

        Ok(Self(number))
    }
}

impl TryFrom<&str> for RequirementKey {
    type Error = ParseKeyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for RequirementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", Self::PREFIX, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_key() {
        let key: RequirementKey = "REQ-042".parse().unwrap();
        assert_eq!(key.number(), 42);
        assert_eq!(key.to_string(), "REQ-042");
    }

    #[test]
    fn display_pads_with_leading_zeros() {
        let key: RequirementKey = "REQ-007".parse().unwrap();
        assert_eq!(key.to_string(), "REQ-007");
    }

    #[test]
    fn rejects_too_few_digits() {
        assert_eq!(
            "REQ-1".parse::<RequirementKey>(),
            Err(ParseKeyError::Digits("REQ-1".to_string()))
        );
    }

    #[test]
    fn rejects_too_many_digits() {
        assert_eq!(
            "REQ-0001".parse::<RequirementKey>(),
            Err(ParseKeyError::Digits("REQ-0001".to_string()))
        );
    }

    #[test]
    fn rejects_wrong_prefix() {
        assert_eq!(
            "SYS-001".parse::<RequirementKey>(),
            Err(ParseKeyError::Prefix("SYS-001".to_string()))
        );
    }

    #[test]
    fn rejects_lowercase_prefix() {
        assert!("req-042".parse::<RequirementKey>().is_err());
    }

    #[test]
    fn rejects_non_numeric_suffix() {
        assert_eq!(
            "REQ-04a".parse::<RequirementKey>(),
            Err(ParseKeyError::Digits("REQ-04a".to_string()))
        );
    }

    #[test]
    fn zero_suffix_is_a_valid_key() {
        let key: RequirementKey = "REQ-000".parse().unwrap();
        assert_eq!(key.number(), 0);
    }
}
