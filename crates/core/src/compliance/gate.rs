//! Compliance gate applying the jurisdiction allow-list.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};
use vireo_shared::types::UserId;

use crate::compliance::classifier::GeoClassifier;
use crate::compliance::country::CountryCode;

/// Outcome of a compliance evaluation.
#[derive(Debug, Clone)]
pub struct ComplianceDecision {
    /// Country the origin resolved to.
    pub country: CountryCode,
    /// Whether the payment may proceed.
    pub allowed: bool,
}

/// Gate deciding whether a payment origin is permitted.
///
/// Holds a classifier and a fixed set of allowed jurisdictions.
/// Evaluation has no side effects on funds or transactions; every
/// decision is emitted as a structured audit event.
pub struct ComplianceGate {
    classifier: Arc<dyn GeoClassifier>,
    allowed_countries: HashSet<String>,
}

impl ComplianceGate {
    /// Creates a gate over the given classifier and allow-list.
    ///
    /// Country codes are normalized to uppercase.
    #[must_use]
    pub fn new(
        classifier: Arc<dyn GeoClassifier>,
        allowed_countries: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            classifier,
            allowed_countries: allowed_countries
                .into_iter()
                .map(|code| code.to_uppercase())
                .collect(),
        }
    }

    /// Resolves an origin address without applying policy.
    #[must_use]
    pub fn resolve(&self, origin: &str) -> CountryCode {
        self.classifier.resolve(origin)
    }

    /// Evaluates whether a payment from `origin` may proceed.
    ///
    /// Unclassifiable origins are always blocked, even if someone
    /// lists the sentinel in the allow-set.
    #[must_use]
    pub fn evaluate(&self, user_id: &UserId, origin: &str) -> ComplianceDecision {
        let country = self.classifier.resolve(origin);
        let allowed = !country.is_unknown() && self.allowed_countries.contains(country.as_str());

        if allowed {
            info!(
                user_id = %user_id,
                origin = %origin,
                country = %country,
                "compliance check passed"
            );
        } else {
            warn!(
                user_id = %user_id,
                origin = %origin,
                country = %country,
                "payment origin blocked by compliance policy"
            );
        }

        ComplianceDecision { country, allowed }
    }
}
