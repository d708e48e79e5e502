//! Evidence pool of one investigation

use crate::error::EngineError;
use marlowe_domain::SourceEvidence;
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct PoolState {
    items: Vec<SourceEvidence>,
    checksums: HashSet<String>,
}

/// Admitted evidence for one investigation, deduplicated by checksum
#[derive(Debug, Default)]
pub struct EvidencePool {
    state: Mutex<PoolState>,
}

impl EvidencePool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Add evidence unless an item with the same checksum is already held
    ///
    /// Returns `Ok(false)` for a duplicate.
    pub fn admit(&self, evidence: SourceEvidence) -> Result<bool, EngineError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| EngineError::Pool(format!("evidence pool unavailable: {}", e)))?;

        if !state.checksums.insert(evidence.checksum.clone()) {
            return Ok(false);
        }
        state.items.push(evidence);
        Ok(true)
    }

    /// Admitted evidence in a stable order (provider, url, checksum)
    pub fn sorted(&self) -> Result<Vec<SourceEvidence>, EngineError> {
        let state = self
            .state
            .lock()
            .map_err(|e| EngineError::Pool(format!("evidence pool unavailable: {}", e)))?;

        let mut items = state.items.clone();
        items.sort_by(|a, b| {
            (&a.provider, &a.candidate.url, &a.checksum)
                .cmp(&(&b.provider, &b.candidate.url, &b.checksum))
        });
        Ok(items)
    }

    /// Number of admitted items
    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.items.len()).unwrap_or(0)
    }

    /// Whether nothing was admitted
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marlowe_domain::{AuthenticityTier, EvidenceCandidate};

    fn evidence(provider: &str, url: &str, checksum: &str) -> SourceEvidence {
        SourceEvidence {
            candidate: EvidenceCandidate::new(url, "t", "content", "src", 90.0, 80.0),
            provider: provider.to_string(),
            checksum: checksum.to_string(),
            tier: AuthenticityTier::Verified,
            provenance: Vec::new(),
            admitted_at: 0,
        }
    }

    #[test]
    fn test_duplicates_rejected() {
        let pool = EvidencePool::new();
        assert!(pool.admit(evidence("economic_data", "https://a.gov", "c1")).unwrap());
        assert!(!pool.admit(evidence("web_search", "https://a.gov", "c1")).unwrap());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_sorted_order_is_stable() {
        let pool = EvidencePool::new();
        pool.admit(evidence("web_search", "https://b.com", "c2")).unwrap();
        pool.admit(evidence("economic_data", "https://z.gov", "c3")).unwrap();
        pool.admit(evidence("economic_data", "https://a.gov", "c1")).unwrap();

        let urls: Vec<_> = pool
            .sorted()
            .unwrap()
            .into_iter()
            .map(|e| e.candidate.url)
            .collect();
        assert_eq!(urls, vec!["https://a.gov", "https://z.gov", "https://b.com"]);
    }

    #[test]
    fn test_empty_pool() {
        let pool = EvidencePool::new();
        assert!(pool.is_empty());
        assert!(pool.sorted().unwrap().is_empty());
    }
}
