//! Marlowe Authenticity Validator
//!
//! Decides whether a raw evidence candidate is admissible evidence.
//!
//! Checks, in order:
//! 1. The URL's domain is not on the exclusion list (known placeholder/test domains)
//! 2. The content is non-empty and not a placeholder string
//! 3. A provenance chain (provider → host → document) can be constructed
//! 4. The payload is internally consistent and gets a SHA-256 checksum
//!
//! The validator is stateless and never fails: every call yields one
//! [`ValidationOutcome`](marlowe_domain::ValidationOutcome), which the engine
//! records in the audit trail whether or not the candidate is admitted.
//!
//! # Examples
//!
//! ```
//! use marlowe_validator::{AuthenticityValidator, ValidationConfig};
//! use marlowe_domain::{AuthenticityTier, EvidenceCandidate};
//!
//! let validator = AuthenticityValidator::new(ValidationConfig::default()).unwrap();
//! let candidate = EvidenceCandidate::new(
//!     "https://www.bls.gov/news.release/empsit.nr0.htm",
//!     "Employment Situation Summary",
//!     "The unemployment rate was 3.9 percent in March.",
//!     "Bureau of Labor Statistics",
//!     95.0,
//!     90.0,
//! );
//!
//! let outcome = validator.validate(&candidate, "economic_data");
//! assert!(outcome.valid);
//! assert_eq!(outcome.tier, AuthenticityTier::Verified);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod validator;

pub use config::ValidationConfig;
pub use error::ValidatorError;
pub use validator::{payload_checksum, AuthenticityValidator};
