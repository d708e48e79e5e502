//! Provenance tracking

use serde::{Deserialize, Serialize};

/// A single link in the chain from provider to document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceEntry {
    /// Source identifier (e.g., "provider:web_search", "host:www.bls.gov")
    pub source: String,

    /// Timestamp when this provenance was recorded (ms since Unix epoch)
    pub timestamp: u64,

    /// Optional rationale or detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,

    /// Link type (e.g., "provider", "host", "document")
    pub source_type: String,
}

impl ProvenanceEntry {
    /// Create a new provenance entry
    pub fn new(source: String, timestamp: u64, source_type: String) -> Self {
        Self {
            source,
            timestamp,
            rationale: None,
            source_type,
        }
    }

    /// Create a provenance entry with rationale
    pub fn with_rationale(mut self, rationale: String) -> Self {
        self.rationale = Some(rationale);
        self
    }
}
