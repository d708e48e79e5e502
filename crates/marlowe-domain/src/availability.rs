//! Data availability reporting

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which providers answered, which yielded nothing, and what that cost
///
/// The cumulative reduction only ever grows: marking a provider missing adds
/// its (non-negative) penalty once, and nothing removes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataAvailabilityReport {
    /// Provider id → whether the provider answered at all
    pub reachable: BTreeMap<String, bool>,

    /// Providers that yielded no admissible evidence, in the order marked
    pub missing_sources: Vec<String>,

    /// Total confidence points deducted for missing sources
    pub confidence_reduction: f64,
}

impl DataAvailabilityReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record whether a provider answered
    pub fn mark_reachable(&mut self, provider: &str, reachable: bool) {
        self.reachable.insert(provider.to_string(), reachable);
    }

    /// Record a provider as missing and add its penalty
    ///
    /// Negative or NaN penalties count as zero. Marking the same provider
    /// twice has no further effect.
    pub fn mark_missing(&mut self, provider: &str, penalty: f64) {
        if self.is_missing(provider) {
            return;
        }
        self.missing_sources.push(provider.to_string());
        if penalty.is_finite() && penalty > 0.0 {
            self.confidence_reduction += penalty;
        }
    }

    /// Whether a provider has been marked missing
    pub fn is_missing(&self, provider: &str) -> bool {
        self.missing_sources.iter().any(|p| p == provider)
    }

    /// Whether any provider is missing
    pub fn has_missing(&self) -> bool {
        !self.missing_sources.is_empty()
    }

    /// Whether a provider answered (false for unknown providers)
    pub fn is_reachable(&self, provider: &str) -> bool {
        self.reachable.get(provider).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_missing_accumulates() {
        let mut report = DataAvailabilityReport::new();
        report.mark_missing("economic_data", 25.0);
        report.mark_missing("web_search", 30.0);

        assert_eq!(report.missing_sources, vec!["economic_data", "web_search"]);
        assert_eq!(report.confidence_reduction, 55.0);
    }

    #[test]
    fn test_mark_missing_is_idempotent() {
        let mut report = DataAvailabilityReport::new();
        report.mark_missing("web_search", 30.0);
        report.mark_missing("web_search", 30.0);

        assert_eq!(report.missing_sources.len(), 1);
        assert_eq!(report.confidence_reduction, 30.0);
    }

    #[test]
    fn test_negative_penalty_ignored() {
        let mut report = DataAvailabilityReport::new();
        report.mark_missing("odd", -10.0);
        report.mark_missing("nan", f64::NAN);

        assert!(report.has_missing());
        assert_eq!(report.confidence_reduction, 0.0);
    }

    #[test]
    fn test_reachability() {
        let mut report = DataAvailabilityReport::new();
        report.mark_reachable("web_search", true);
        report.mark_reachable("economic_data", false);

        assert!(report.is_reachable("web_search"));
        assert!(!report.is_reachable("economic_data"));
        assert!(!report.is_reachable("unknown"));
    }
}
