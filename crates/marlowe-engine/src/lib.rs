//! Marlowe Investigation Engine
//!
//! Investigates a claim by querying independent evidence providers,
//! admitting only authentic evidence, and producing a verdict with a
//! confidence score, a human-readable explanation, and an audit trail.
//!
//! # Guarantees
//!
//! - Evidence is only ever admitted through the authenticity validator, and
//!   every admission is recorded in the audit trail.
//! - A provider that fails, times out, or returns nothing usable is reported
//!   as missing and lowers confidence; nothing is substituted for it.
//! - An empty evidence pool always yields INSUFFICIENT_EVIDENCE at 0.
//! - `investigate_claim` always returns a record, even on internal faults.
//!
//! # Examples
//!
//! ```
//! use marlowe_connectors::StaticConnector;
//! use marlowe_domain::{Claim, EvidenceCandidate, Verdict};
//! use marlowe_engine::InvestigationEngine;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let bls = StaticConnector::new("economic_data", vec![
//!     EvidenceCandidate::new(
//!         "https://www.bls.gov/news.release/empsit.nr0.htm",
//!         "Employment Situation Summary",
//!         "The unemployment rate was 3.9 percent in March.",
//!         "BLS",
//!         95.0,
//!         90.0,
//!     ),
//!     EvidenceCandidate::new(
//!         "https://fred.stlouisfed.org/series/UNRATE",
//!         "Unemployment Rate",
//!         "The unemployment rate stood at 3.9 percent for March 2024.",
//!         "FRED",
//!         92.0,
//!         85.0,
//!     ),
//! ]);
//!
//! let engine = InvestigationEngine::builder()
//!     .connector(Arc::new(bls))
//!     .build()
//!     .unwrap();
//!
//! let claim = Claim::new("Unemployment was 3.9% in March", "economy");
//! let investigation = engine.investigate_claim(&claim).await;
//!
//! assert_eq!(investigation.verdict, Verdict::MostlyTrue);
//! assert!(engine.validate_compliance_invariant());
//! # }
//! ```

pub mod adjuster;
pub mod aggregator;
pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod metrics;
pub mod pool;
pub mod reasoning;
pub mod topics;

pub use adjuster::ConfidenceAdjuster;
pub use aggregator::{assess, Assessment, AssessmentBasis};
pub use audit::AuditRecorder;
pub use config::EngineConfig;
pub use engine::{ConnectorSlot, InvestigationEngine, InvestigationEngineBuilder, InvestigationPhase};
pub use error::EngineError;
pub use indicators::{IndicatorExtractor, IndicatorPattern};
pub use metrics::EngineMetrics;
pub use reasoning::{ReasoningComposer, FORBIDDEN_TERMS};
pub use topics::{KeywordTopicSelector, TopicSelector};
