//! Marlowe Domain Layer
//!
//! Core value objects shared by every Marlowe crate. Nothing in here performs
//! I/O; connectors, validation and the investigation pipeline live in other
//! crates and depend on these types.
//!
//! ## Key Concepts
//!
//! - **Claim**: the read-only statement under investigation
//! - **Evidence candidate**: a raw snippet returned by a provider
//! - **Source evidence**: a candidate that passed authenticity validation
//! - **Audit entry**: one append-only record of a validation decision
//! - **Investigation**: the final, immutable outcome of one investigation
//!
//! ## Architecture
//!
//! - Pure data and invariants only
//! - Serializable with serde so records can leave the process intact
//! - Trait seams for external interactions live next to their implementations

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod availability;
pub mod claim;
pub mod evidence;
pub mod investigation;
pub mod provenance;
pub mod topic;
pub mod verdict;

// Re-exports for convenience
pub use audit::{AuditEntry, CandidateRef, ValidationOutcome};
pub use availability::DataAvailabilityReport;
pub use claim::{Claim, ClaimId};
pub use evidence::{EvidenceCandidate, SourceEvidence};
pub use investigation::{
    IndicatorReading, Investigation, InvestigationId, InvestigationStatus, ProviderReport,
};
pub use provenance::ProvenanceEntry;
pub use topic::Topic;
pub use verdict::{AuthenticityTier, Verdict};

/// Lower bound of every 0-100 score in the system
pub const SCORE_MIN: f64 = 0.0;

/// Upper bound of every 0-100 score in the system
pub const SCORE_MAX: f64 = 100.0;

/// Clamp a score into `[0, 100]`, mapping NaN to zero
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return SCORE_MIN;
    }
    value.clamp(SCORE_MIN, SCORE_MAX)
}
