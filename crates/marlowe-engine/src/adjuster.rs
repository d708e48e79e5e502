//! Confidence adjustment for missing data
//!
//! A provider that was queried but returned no admissible evidence is a
//! missing source. Each missing source deducts its configured penalty from
//! the raw confidence; the result never drops below zero.

use crate::config::EngineConfig;
use marlowe_domain::{clamp_score, DataAvailabilityReport, ProviderReport};
use std::collections::{BTreeMap, BTreeSet};

/// Applies per-provider penalties
#[derive(Debug, Clone)]
pub struct ConfidenceAdjuster {
    penalties: BTreeMap<String, f64>,
    default_penalty: f64,
}

impl ConfidenceAdjuster {
    /// Adjuster using the configured penalty table
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            penalties: config.penalties.clone(),
            default_penalty: config.default_penalty,
        }
    }

    /// Penalty for a provider
    pub fn penalty_for(&self, provider: &str) -> f64 {
        self.penalties
            .get(provider)
            .copied()
            .unwrap_or(self.default_penalty)
    }

    /// Build the availability report for one investigation
    ///
    /// `contributing` holds the providers that returned at least one
    /// admissible candidate.
    pub fn availability(
        &self,
        reports: &[ProviderReport],
        contributing: &BTreeSet<String>,
    ) -> DataAvailabilityReport {
        let mut availability = DataAvailabilityReport::new();
        for report in reports {
            availability.mark_reachable(&report.provider, report.reachable);
            if !contributing.contains(&report.provider) {
                availability.mark_missing(&report.provider, self.penalty_for(&report.provider));
            }
        }
        availability
    }

    /// Final confidence after subtracting the availability penalties
    pub fn adjust(&self, raw_confidence: f64, availability: &DataAvailabilityReport) -> f64 {
        clamp_score(raw_confidence - availability.confidence_reduction)
    }
}

impl Default for ConfidenceAdjuster {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
