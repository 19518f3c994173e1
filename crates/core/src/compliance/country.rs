//! Country codes for classified payment origins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel code for origins that cannot be classified.
const UNKNOWN: &str = "UNKNOWN";

/// ISO-style country code resolved from a payment's origin address.
///
/// Codes are stored uppercase. Origins the classifier cannot place
/// resolve to the [`CountryCode::unknown`] sentinel, which is never
/// allowed regardless of policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Creates a country code, normalizing to uppercase.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    /// Returns the sentinel for unclassifiable origins.
    #[must_use]
    pub fn unknown() -> Self {
        Self(UNKNOWN.to_string())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the unclassifiable sentinel.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CountryCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}
