use std::{fmt, str::FromStr};

/// A requirement version label of the form `vX.Y`.
///
/// New requirements start at `v1.0`. Updating an APPROVED requirement does not
/// mutate it in place; it spawns a successor whose label is the current label
/// incremented by 0.1 and reformatted to one decimal place, so `v1.9` is
/// followed by `v2.0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(String);

impl Version {
    /// The label given to the first version of a requirement.
    #[must_use]
    pub fn initial() -> Self {
        Self("v1.0".to_string())
    }

    /// The label of the next version: numeric suffix plus 0.1, one decimal
    /// place.
    #[must_use]
    pub fn bump(&self) -> Self {
        let number: f64 = self.0[1..]
            .parse()
            .expect("the numeric suffix is validated on construction");
        Self(format!("v{:.1}", number + 0.1))
    }

    /// Returns the label as a string slice, e.g. `"v1.0"`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::initial()
    }
}

/// Error returned when a string is not a valid version label.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid version label '{0}': expected the form vX.Y")]
pub struct ParseVersionError(String);

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffix = s
            .strip_prefix('v')
            .ok_or_else(|| ParseVersionError(s.to_string()))?;

        match suffix.parse::<f64>() {
            Ok(number) if number.is_finite() && number >= 0.0 => Ok(Self(s.to_string())),
            _ => Err(ParseVersionError(s.to_string())),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
