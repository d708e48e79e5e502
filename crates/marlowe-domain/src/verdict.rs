//! Veracity verdicts and authenticity tiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical outcome of an investigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Strong, high-credibility corroboration
    MostlyTrue,

    /// Corroborated, with weaker or mixed support
    PartiallyTrue,

    /// Several sources, none credible enough to classify
    Unverified,

    /// No evidence, or too little to classify
    InsufficientEvidence,
}

impl Verdict {
    /// Get the verdict name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::MostlyTrue => "MOSTLY_TRUE",
            Verdict::PartiallyTrue => "PARTIALLY_TRUE",
            Verdict::Unverified => "UNVERIFIED",
            Verdict::InsufficientEvidence => "INSUFFICIENT_EVIDENCE",
        }
    }

    /// Parse a verdict from its string name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "MOSTLY_TRUE" => Some(Verdict::MostlyTrue),
            "PARTIALLY_TRUE" => Some(Verdict::PartiallyTrue),
            "UNVERIFIED" => Some(Verdict::Unverified),
            "INSUFFICIENT_EVIDENCE" => Some(Verdict::InsufficientEvidence),
            _ => None,
        }
    }

    /// All verdicts, strongest first
    pub fn all() -> [Verdict; 4] {
        [
            Verdict::MostlyTrue,
            Verdict::PartiallyTrue,
            Verdict::Unverified,
            Verdict::InsufficientEvidence,
        ]
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticity tier assigned by the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthenticityTier {
    /// Admitted, from a high-credibility source
    Verified,

    /// Admitted, but the source credibility is below the verified threshold
    Unverified,

    /// Not admissible as evidence
    Rejected,
}

impl AuthenticityTier {
    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthenticityTier::Verified => "VERIFIED",
            AuthenticityTier::Unverified => "UNVERIFIED",
            AuthenticityTier::Rejected => "REJECTED",
        }
    }

    /// Whether evidence in this tier may enter the evidence pool
    pub fn is_admissible(&self) -> bool {
        !matches!(self, AuthenticityTier::Rejected)
    }
}

impl fmt::Display for AuthenticityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
