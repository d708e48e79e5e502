//! Investigation records - the immutable result of one investigation

use crate::{ClaimId, DataAvailabilityReport, SourceEvidence, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an investigation (UUIDv7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvestigationId(uuid::Uuid);

impl InvestigationId {
    /// Generate a new identifier
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Parse an identifier from its hyphenated UUID string
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid UUIDv7 string: {}", e))
    }
}

impl Default for InvestigationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvestigationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal state of an investigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestigationStatus {
    /// The pipeline ran to completion
    Completed,

    /// An internal fault forced the terminal failure state
    Failed,
}

/// Outcome of querying one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderReport {
    /// Provider identifier
    pub provider: String,

    /// Whether the provider answered (an empty answer still counts)
    pub reachable: bool,

    /// Candidates returned
    pub fetched: usize,

    /// Candidates admitted into the evidence pool
    pub admitted: usize,

    /// Candidates rejected by validation
    pub rejected: usize,

    /// Admissible candidates already admitted from another provider
    #[serde(default)]
    pub corroborated: usize,

    /// Provider error, when unreachable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Wall-clock time spent on this provider
    pub elapsed_ms: u64,
}

impl ProviderReport {
    /// Report for a provider with no connector configured
    pub fn unconfigured(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            reachable: false,
            fetched: 0,
            admitted: 0,
            rejected: 0,
            corroborated: 0,
            error: Some("connector not configured".to_string()),
            elapsed_ms: 0,
        }
    }

    /// Whether this provider returned admissible evidence
    ///
    /// A candidate that duplicates evidence admitted from another provider
    /// still counts.
    pub fn contributed(&self) -> bool {
        self.admitted + self.corroborated > 0
    }
}

/// A named indicator value matched in admitted evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReading {
    /// Indicator name (e.g. "unemployment rate")
    pub indicator: String,

    /// Value exactly as it appeared in the evidence (e.g. "3.9%")
    pub value: String,

    /// Provider of the evidence the value was read from
    pub provider: String,

    /// URL of the evidence the value was read from
    pub url: String,
}

/// The complete, auditable result of investigating one claim
///
/// Invariants upheld by the engine:
/// - empty `evidence` implies `verdict == InsufficientEvidence` and `confidence == 0`
/// - `confidence` is within `[0, 100]`
/// - `reasoning` never contains fabricated-data vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investigation {
    /// Unique identifier
    pub id: InvestigationId,

    /// Claim investigated
    pub claim_id: ClaimId,

    /// Investigating agent / category tag
    pub agent: String,

    /// Admitted evidence
    pub evidence: Vec<SourceEvidence>,

    /// Every provider the engine depends on, in configuration order
    pub providers_queried: Vec<String>,

    /// Providers that contributed admitted evidence
    pub providers_used: Vec<String>,

    /// Veracity verdict
    pub verdict: Verdict,

    /// Final confidence score [0, 100]
    pub confidence: f64,

    /// Human-readable explanation
    pub reasoning: String,

    /// Whether the no-fabrication invariants held for this record
    pub compliant: bool,

    /// Terminal state
    pub status: InvestigationStatus,

    /// Provider availability and the confidence it cost
    pub availability: DataAvailabilityReport,

    /// Indicator values read from the evidence
    pub indicators: Vec<IndicatorReading>,

    /// Per-provider outcomes
    pub provider_reports: Vec<ProviderReport>,

    /// Measured processing time in microseconds (always at least 1)
    pub processing_time_us: u64,

    /// Creation timestamp (ms since Unix epoch)
    pub created_at: u64,
}

impl Investigation {
    /// Whether the investigation ran to completion
    pub fn is_completed(&self) -> bool {
        self.status == InvestigationStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_investigation_id_roundtrip() {
        let id = InvestigationId::new();
        let parsed = InvestigationId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_unconfigured_report() {
        let report = ProviderReport::unconfigured("economic_data");
        assert!(!report.reachable);
        assert!(!report.contributed());
        assert!(report.error.is_some());
    }

    #[test]
    fn test_corroborating_report_contributed() {
        let mut report = ProviderReport::unconfigured("web_search");
        report.reachable = true;
        report.error = None;
        report.fetched = 1;
        report.corroborated = 1;
        assert!(report.contributed());
    }
}
