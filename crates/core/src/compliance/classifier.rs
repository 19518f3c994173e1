//! Origin address to country classification.
//!
//! Classification is pluggable so deployments can swap in a real
//! geolocation database without touching the compliance gate.

use crate::compliance::country::CountryCode;

/// Classifies a network origin address into a country.
pub trait GeoClassifier: Send + Sync {
    /// Resolves an origin address to a country code.
    ///
    /// Must return [`CountryCode::unknown`] for addresses it cannot
    /// place, never guess.
    fn resolve(&self, address: &str) -> CountryCode;
}

/// Static IP prefix table, checked in order.
///
/// 192.168.* is local network traffic and classifies as VN (dev).
const PREFIX_TABLE: &[(&str, &str)] = &[
    ("203.113", "VN"),
    ("125.209", "KR"),
    ("126.", "JP"),
    ("91.185", "FR"),
    ("185.220", "DE"),
    ("8.8.", "US"),
    ("192.168.", "VN"),
];

/// Classifier backed by a static table of IP address prefixes.
///
/// Good enough for the sandbox deployment; a production deployment
/// would implement [`GeoClassifier`] over a real geolocation database.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixGeoClassifier;

impl PrefixGeoClassifier {
    /// Creates the prefix table classifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl GeoClassifier for PrefixGeoClassifier {
    fn resolve(&self, address: &str) -> CountryCode {
        PREFIX_TABLE
            .iter()
            .find(|(prefix, _)| address.starts_with(prefix))
            .map_or_else(CountryCode::unknown, |(_, code)| CountryCode::new(*code))
    }
}
