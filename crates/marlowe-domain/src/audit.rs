//! Audit trail records
//!
//! Every authenticity decision, admitted or rejected, produces exactly one
//! [`AuditEntry`]. Entries are immutable once recorded.

use crate::{AuthenticityTier, InvestigationId, ProvenanceEntry};
use serde::{Deserialize, Serialize};

/// Outcome of validating one evidence candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Whether the candidate is admissible
    pub valid: bool,

    /// Assigned authenticity tier
    pub tier: AuthenticityTier,

    /// Provenance chain (empty when it could not be constructed)
    pub provenance: Vec<ProvenanceEntry>,

    /// Reasons the candidate was rejected (empty when valid)
    pub errors: Vec<String>,

    /// Hex SHA-256 of the candidate payload, when computable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl ValidationOutcome {
    /// An admitted outcome
    pub fn admitted(
        tier: AuthenticityTier,
        provenance: Vec<ProvenanceEntry>,
        checksum: String,
    ) -> Self {
        Self {
            valid: true,
            tier,
            provenance,
            errors: Vec::new(),
            checksum: Some(checksum),
        }
    }

    /// A rejected outcome
    pub fn rejected(
        errors: Vec<String>,
        provenance: Vec<ProvenanceEntry>,
        checksum: Option<String>,
    ) -> Self {
        Self {
            valid: false,
            tier: AuthenticityTier::Rejected,
            provenance,
            errors,
            checksum,
        }
    }

    /// Downgrade this outcome to rejected, appending a reason
    pub fn reject(mut self, reason: impl Into<String>) -> Self {
        self.valid = false;
        self.tier = AuthenticityTier::Rejected;
        self.errors.push(reason.into());
        self
    }
}

/// Reference to the candidate a decision was made about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRef {
    /// Candidate URL, as returned by the provider
    pub url: String,

    /// Candidate title
    pub title: String,

    /// Whether the candidate entered the evidence pool
    pub admitted: bool,
}

/// One append-only audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Position in the recorder's global sequence (starts at 1)
    pub sequence: u64,

    /// Operation name (e.g. "validate_candidate")
    pub operation: String,

    /// Provider that returned the candidate
    pub provider: String,

    /// Investigation the decision belongs to
    pub investigation_id: InvestigationId,

    /// Millisecond timestamp of the decision
    pub timestamp: u64,

    /// Validation result
    pub outcome: ValidationOutcome,

    /// The candidate the decision was about
    pub candidate: CandidateRef,
}

impl AuditEntry {
    /// Whether this entry records an admission
    pub fn is_admitted(&self) -> bool {
        self.candidate.admitted && self.outcome.valid
    }
}
