//! Evidence candidates and admitted source evidence

use crate::{AuthenticityTier, ProvenanceEntry};
use serde::{Deserialize, Serialize};

/// A raw, unvalidated snippet returned by a provider
///
/// Candidates are produced by connectors only. They carry no authority until
/// the authenticity validator admits them as [`SourceEvidence`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceCandidate {
    /// Where the snippet was retrieved from
    pub url: String,

    /// Headline or series title
    pub title: String,

    /// Snippet body
    pub content: String,

    /// Human-readable source label (e.g. "Bureau of Labor Statistics")
    pub source: String,

    /// Credibility of the publishing source [0, 100]
    pub credibility: f64,

    /// Relevance of the snippet to the claim [0, 100]
    pub relevance: f64,

    /// Publication date as reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,

    /// Author as reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl EvidenceCandidate {
    /// Create a candidate with the required fields
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
        credibility: f64,
        relevance: f64,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            content: content.into(),
            source: source.into(),
            credibility,
            relevance,
            published_at: None,
            author: None,
        }
    }

    /// Set the publication date
    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    /// Set the author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// A candidate that passed authenticity validation
///
/// Every `SourceEvidence` held by an investigation has a matching admitted
/// audit entry carrying the same checksum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEvidence {
    /// The admitted candidate, unchanged
    pub candidate: EvidenceCandidate,

    /// Provider that returned the candidate
    pub provider: String,

    /// Hex SHA-256 of the candidate payload
    pub checksum: String,

    /// Authenticity tier assigned at admission (never `Rejected`)
    pub tier: AuthenticityTier,

    /// Provenance chain from provider to document
    pub provenance: Vec<ProvenanceEntry>,

    /// Millisecond timestamp of admission
    pub admitted_at: u64,
}

impl SourceEvidence {
    /// Credibility score of the underlying candidate
    pub fn credibility(&self) -> f64 {
        self.candidate.credibility
    }

    /// Relevance score of the underlying candidate
    pub fn relevance(&self) -> f64 {
        self.candidate.relevance
    }

    /// URL of the underlying candidate
    pub fn url(&self) -> &str {
        &self.candidate.url
    }
}
