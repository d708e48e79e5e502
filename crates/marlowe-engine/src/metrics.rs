//! Metrics collected across investigations

use marlowe_domain::{Investigation, InvestigationStatus, Verdict};
use std::collections::{BTreeMap, HashMap};

/// Counters accumulated by the engine
///
/// Tracks investigations per verdict, candidate throughput, and provider
/// failures.
#[derive(Debug, Clone, Default)]
pub struct EngineMetrics {
    /// Completed investigations per verdict
    pub verdicts: HashMap<Verdict, usize>,

    /// Investigations that ended in a system fault
    pub failed: usize,

    /// Candidates returned by connectors
    pub candidates_examined: usize,

    /// Candidates admitted as evidence
    pub admitted: usize,

    /// Candidates rejected (validation failures and duplicates)
    pub rejected: usize,

    /// Calls per provider that produced no answer
    pub provider_failures: BTreeMap<String, usize>,

    /// Summed processing time (microseconds)
    pub total_processing_us: u64,
}

impl EngineMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one investigation into the counters
    pub fn record_investigation(&mut self, investigation: &Investigation) {
        match investigation.status {
            InvestigationStatus::Completed => {
                *self.verdicts.entry(investigation.verdict).or_insert(0) += 1;
            }
            InvestigationStatus::Failed => self.failed += 1,
        }

        for report in &investigation.provider_reports {
            self.candidates_examined += report.fetched;
            self.admitted += report.admitted;
            self.rejected += report.rejected + report.corroborated;
            if !report.reachable {
                self.record_provider_failure(&report.provider);
            }
        }
        self.total_processing_us += investigation.processing_time_us;
    }

    /// Record a provider that did not answer
    pub fn record_provider_failure(&mut self, provider: &str) {
        *self.provider_failures.entry(provider.to_string()).or_insert(0) += 1;
    }

    /// Completed investigations across all verdicts
    pub fn total_completed(&self) -> usize {
        self.verdicts.values().sum()
    }

    /// All investigations, completed or failed
    pub fn total_investigations(&self) -> usize {
        self.total_completed() + self.failed
    }

    /// Provider failures across all providers
    pub fn total_provider_failures(&self) -> usize {
        self.provider_failures.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Investigation Metrics Summary".to_string(),
            "=============================".to_string(),
            format!("Investigations: {}", self.total_investigations()),
            format!("Failed: {}", self.failed),
            format!(
                "Candidates: {} examined, {} admitted, {} rejected",
                self.candidates_examined, self.admitted, self.rejected
            ),
            format!("Total processing time: {}us", self.total_processing_us),
            String::new(),
        ];

        if !self.verdicts.is_empty() {
            lines.push("Verdicts:".to_string());
            for verdict in Verdict::all() {
                if let Some(count) = self.verdicts.get(&verdict) {
                    lines.push(format!("  {}: {}", verdict, count));
                }
            }
            lines.push(String::new());
        }

        if !self.provider_failures.is_empty() {
            lines.push("Provider failures:".to_string());
            for (provider, count) in &self.provider_failures {
                lines.push(format!("  {}: {}", provider, count));
            }
            lines.push(format!("  Total: {}", self.total_provider_failures()));
        }

        lines.join("\n")
    }
}
