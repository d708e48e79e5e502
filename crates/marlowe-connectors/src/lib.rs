//! Marlowe Source Connectors
//!
//! The contract between the investigation engine and external data providers.
//! Provider-specific adapters live with the application embedding the engine;
//! this crate ships only an in-process connector.
//!
//! # Architecture
//!
//! Every provider is consumed through [`SourceConnector`]. A connector call
//! yields a [`ConnectorOutcome`]: either the candidates the provider returned
//! (possibly none) or a [`ConnectorError`]. The engine never lets a connector
//! error escape; it is recorded as a missing source instead.
//!
//! # Connectors
//!
//! - [`StaticConnector`]: deterministic in-process connector for tests and offline runs
//!
//! # Examples
//!
//! ```
//! use marlowe_connectors::{SourceConnector, StaticConnector};
//! use marlowe_domain::{Claim, EvidenceCandidate};
//! use std::collections::BTreeSet;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let connector = StaticConnector::new("web_search", vec![EvidenceCandidate::new(
//!     "https://www.reuters.com/markets/",
//!     "Markets wrap",
//!     "Stocks closed higher on Friday.",
//!     "Reuters",
//!     85.0,
//!     70.0,
//! )]);
//!
//! let claim = Claim::new("Stocks rose on Friday", "market");
//! let candidates = connector.fetch(&claim, &BTreeSet::new()).await.unwrap();
//! assert_eq!(candidates.len(), 1);
//! # }
//! ```

#![warn(missing_docs)]

use async_trait::async_trait;
use marlowe_domain::{Claim, EvidenceCandidate, Topic};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors a provider can report
///
/// Every variant is a "provider unavailable" condition to the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectorError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Credentials missing or refused
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Provider rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Provider answered with something that could not be decoded
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Call exceeded its time budget
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Provider is not available (e.g. connector failed to construct)
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Anything else
    #[error("Connector error: {0}")]
    Other(String),
}

/// Result of one connector call
pub type ConnectorOutcome = Result<Vec<EvidenceCandidate>, ConnectorError>;

/// A pluggable provider of evidence candidates
///
/// Implementations fetch raw candidates for a claim from one provider. They
/// must never invent candidates: on failure they return an error, and when
/// the provider has nothing they return an empty list.
#[async_trait]
pub trait SourceConnector: Send + Sync {
    /// Stable provider identifier used in audit records and availability reports
    fn provider_id(&self) -> &str;

    /// Fetch candidates for a claim
    ///
    /// `topics` are the sub-query topics selected from the claim text.
    async fn fetch(&self, claim: &Claim, topics: &BTreeSet<Topic>) -> ConnectorOutcome;
}

/// What a [`StaticConnector`] answers with
#[derive(Debug, Clone)]
enum StaticResponse {
    Candidates(Vec<EvidenceCandidate>),
    Failure(ConnectorError),
}

/// Deterministic connector returning a fixed answer
///
/// Returns pre-configured candidates (or a pre-configured error) without any
/// I/O. Clones share the call counter.
///
/// # Examples
///
/// ```
/// use marlowe_connectors::{ConnectorError, SourceConnector, StaticConnector};
/// use marlowe_domain::Claim;
/// use std::collections::BTreeSet;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let connector = StaticConnector::failing("economic_data", ConnectorError::RateLimited);
/// let claim = Claim::new("CPI rose 3.2%", "economy");
///
/// assert!(connector.fetch(&claim, &BTreeSet::new()).await.is_err());
/// assert_eq!(connector.call_count(), 1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StaticConnector {
    provider_id: String,
    response: StaticResponse,
    delay: Option<Duration>,
    call_count: Arc<AtomicUsize>,
}

impl StaticConnector {
    /// Connector that always returns `candidates`
    pub fn new(provider_id: impl Into<String>, candidates: Vec<EvidenceCandidate>) -> Self {
        Self {
            provider_id: provider_id.into(),
            response: StaticResponse::Candidates(candidates),
            delay: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Connector that answers but has nothing
    pub fn empty(provider_id: impl Into<String>) -> Self {
        Self::new(provider_id, Vec::new())
    }

    /// Connector that always fails with `error`
    pub fn failing(provider_id: impl Into<String>, error: ConnectorError) -> Self {
        Self {
            provider_id: provider_id.into(),
            response: StaticResponse::Failure(error),
            delay: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Wait `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times `fetch` was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceConnector for StaticConnector {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    async fn fetch(&self, _claim: &Claim, _topics: &BTreeSet<Topic>) -> ConnectorOutcome {
        let calls = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Static connector {} called ({} call(s))", self.provider_id, calls);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.response {
            StaticResponse::Candidates(candidates) => Ok(candidates.clone()),
            StaticResponse::Failure(error) => Err(error.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_candidate() -> EvidenceCandidate {
        EvidenceCandidate::new(
            "https://fred.stlouisfed.org/series/UNRATE",
            "Unemployment Rate",
            "The unemployment rate was 3.9% in March 2024.",
            "FRED",
            95.0,
            85.0,
        )
    }

    #[tokio::test]
    async fn test_static_connector_returns_candidates() {
        let connector = StaticConnector::new("economic_data", vec![sample_candidate()]);
        let claim = Claim::new("Unemployment is 3.9%", "economy");

        let candidates = connector.fetch(&claim, &BTreeSet::new()).await.unwrap();
        assert_eq!(candidates, vec![sample_candidate()]);
        assert_eq!(connector.provider_id(), "economic_data");
    }

    #[tokio::test]
    async fn test_static_connector_empty() {
        let connector = StaticConnector::empty("web_search");
        let claim = Claim::new("Anything", "market");

        let candidates = connector.fetch(&claim, &BTreeSet::new()).await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_static_connector_failure() {
        let connector = StaticConnector::failing(
            "web_search",
            ConnectorError::Unauthorized("missing key".to_string()),
        );
        let claim = Claim::new("Anything", "market");

        let result = connector.fetch(&claim, &BTreeSet::new()).await;
        assert!(matches!(result, Err(ConnectorError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_call_count_shared_between_clones() {
        let connector = StaticConnector::empty("web_search");
        let clone = connector.clone();
        let claim = Claim::new("Anything", "market");

        connector.fetch(&claim, &BTreeSet::new()).await.unwrap();
        clone.fetch(&claim, &BTreeSet::new()).await.unwrap();

        assert_eq!(connector.call_count(), 2);
    }

    #[tokio::test]
    async fn test_static_connector_delay() {
        let connector = StaticConnector::empty("slow").with_delay(Duration::from_millis(20));
        let claim = Claim::new("Anything", "market");

        let start = std::time::Instant::now();
        connector.fetch(&claim, &BTreeSet::new()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ConnectorError::RateLimited.to_string(), "Rate limit exceeded");
        assert_eq!(
            ConnectorError::Communication("refused".to_string()).to_string(),
            "Communication error: refused"
        );
    }
}
