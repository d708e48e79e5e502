//! Investigation orchestration
//!
//! One investigation runs through these phases:
//!
//! ```text
//! Started -> Dispatching -> Aggregating -> Adjusting -> Composing -> Completed
//!                \____________\______________\____________\______-> Failed
//! ```
//!
//! Connectors are dispatched concurrently, one task each, under a per-call
//! timeout. A connector error, timeout, or panic marks that provider missing
//! and never aborts the investigation. Once every task has joined, the
//! validated candidates are admitted and audited in configured provider
//! order, so a candidate returned by two providers is always kept by the
//! one listed first. Only an internal fault (audit or pool failure) ends in
//! `Failed`, and even then a record is returned.

use crate::adjuster::ConfidenceAdjuster;
use crate::aggregator::assess;
use crate::audit::AuditRecorder;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::indicators::IndicatorExtractor;
use crate::metrics::EngineMetrics;
use crate::pool::EvidencePool;
use crate::reasoning::{ReasoningComposer, ReasoningInput};
use crate::topics::{KeywordTopicSelector, TopicSelector};
use marlowe_connectors::{ConnectorError, SourceConnector};
use marlowe_domain::{
    AuditEntry, CandidateRef, Claim, DataAvailabilityReport, EvidenceCandidate, Investigation,
    InvestigationId, InvestigationStatus, ProviderReport, SourceEvidence, Topic,
    ValidationOutcome, Verdict, SCORE_MAX, SCORE_MIN,
};
use marlowe_validator::AuthenticityValidator;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Agent identifier stamped on every investigation
pub const AGENT_ID: &str = "marlowe-investigator";

/// Audit operation name for candidate validation
pub const VALIDATE_OPERATION: &str = "validate_candidate";

/// Rejection reason for a candidate already in the pool
pub const DUPLICATE_REASON: &str = "duplicate of admitted evidence";

/// Lifecycle phase of an investigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestigationPhase {
    Started,
    Dispatching,
    Aggregating,
    Adjusting,
    Composing,
    Completed,
    Failed,
}

impl fmt::Display for InvestigationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InvestigationPhase::Started => "started",
            InvestigationPhase::Dispatching => "dispatching",
            InvestigationPhase::Aggregating => "aggregating",
            InvestigationPhase::Adjusting => "adjusting",
            InvestigationPhase::Composing => "composing",
            InvestigationPhase::Completed => "completed",
            InvestigationPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A provider the engine queries, with or without a working connector
#[derive(Clone)]
pub struct ConnectorSlot {
    provider_id: String,
    connector: Option<Arc<dyn SourceConnector>>,
}

impl ConnectorSlot {
    /// Slot backed by a connector
    pub fn connected(connector: Arc<dyn SourceConnector>) -> Self {
        Self {
            provider_id: connector.provider_id().to_string(),
            connector: Some(connector),
        }
    }

    /// Slot for a provider whose connector could not be configured
    pub fn unconfigured(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            connector: None,
        }
    }

    /// Provider identifier
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Whether a connector is present
    pub fn is_configured(&self) -> bool {
        self.connector.is_some()
    }
}

impl fmt::Debug for ConnectorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorSlot")
            .field("provider_id", &self.provider_id)
            .field("configured", &self.is_configured())
            .finish()
    }
}

/// Builder for [`InvestigationEngine`]
pub struct InvestigationEngineBuilder {
    config: EngineConfig,
    slots: Vec<ConnectorSlot>,
    topic_selector: Arc<dyn TopicSelector>,
}

impl InvestigationEngineBuilder {
    fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            slots: Vec::new(),
            topic_selector: Arc::new(KeywordTopicSelector::default()),
        }
    }

    /// Use `config` instead of the defaults
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a connector
    pub fn connector(mut self, connector: Arc<dyn SourceConnector>) -> Self {
        self.slots.push(ConnectorSlot::connected(connector));
        self
    }

    /// Add a provider slot (possibly unconfigured)
    pub fn slot(mut self, slot: ConnectorSlot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Replace the topic selection strategy
    pub fn topic_selector(mut self, selector: Arc<dyn TopicSelector>) -> Self {
        self.topic_selector = selector;
        self
    }

    /// Validate the configuration and build the engine
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] for an invalid configuration or a
    /// provider id that appears twice.
    pub fn build(self) -> Result<InvestigationEngine, EngineError> {
        self.config.validate().map_err(EngineError::Config)?;

        let mut seen = HashSet::new();
        for slot in &self.slots {
            if slot.provider_id.trim().is_empty() {
                return Err(EngineError::Config("provider id must not be empty".to_string()));
            }
            if !seen.insert(slot.provider_id.clone()) {
                return Err(EngineError::Config(format!(
                    "provider '{}' configured twice",
                    slot.provider_id
                )));
            }
        }

        let validator = AuthenticityValidator::new(self.config.validation.clone())?;
        let extractor = IndicatorExtractor::new(&self.config.indicators)?;

        Ok(InvestigationEngine {
            adjuster: ConfidenceAdjuster::from_config(&self.config),
            audit: Arc::new(AuditRecorder::new(self.config.audit_capacity)),
            composer: ReasoningComposer::new()?,
            validator: Arc::new(validator),
            extractor,
            topic_selector: self.topic_selector,
            slots: self.slots,
            config: self.config,
            metrics: Mutex::new(EngineMetrics::new()),
            last_investigation: Mutex::new(None),
        })
    }
}

/// Claim investigation engine
///
/// Holds the configured connectors, the shared audit trail, and the
/// most recent investigation. Safe to share across tasks; concurrent
/// investigations only contend on the audit log.
pub struct InvestigationEngine {
    config: EngineConfig,
    slots: Vec<ConnectorSlot>,
    validator: Arc<AuthenticityValidator>,
    audit: Arc<AuditRecorder>,
    adjuster: ConfidenceAdjuster,
    extractor: IndicatorExtractor,
    composer: ReasoningComposer,
    topic_selector: Arc<dyn TopicSelector>,
    metrics: Mutex<EngineMetrics>,
    last_investigation: Mutex<Option<Investigation>>,
}

impl InvestigationEngine {
    /// Start building an engine
    pub fn builder() -> InvestigationEngineBuilder {
        InvestigationEngineBuilder::new()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Provider ids the engine queries, in configuration order
    pub fn provider_requirements(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.provider_id.clone()).collect()
    }

    /// Copy of the audit trail, oldest entry first
    pub fn audit_trail(&self) -> Vec<AuditEntry> {
        self.audit.snapshot()
    }

    /// The audit recorder
    pub fn audit(&self) -> &AuditRecorder {
        &self.audit
    }

    /// Snapshot of the accumulated metrics
    pub fn metrics(&self) -> EngineMetrics {
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent investigation, if any
    pub fn last_investigation(&self) -> Option<Investigation> {
        self.last_investigation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Investigate a claim
    ///
    /// Always returns a record. Provider failures lower confidence; an
    /// internal fault yields a `Failed` record with confidence 0.
    pub async fn investigate_claim(&self, claim: &Claim) -> Investigation {
        let started = Instant::now();
        let id = InvestigationId::new();
        let created_at = current_timestamp_ms();

        info!("Investigation {} started for claim {}", id, claim.id);
        self.enter(id, InvestigationPhase::Started);

        let investigation = match self.run_pipeline(id, claim, created_at, started).await {
            Ok(investigation) => {
                self.enter(id, InvestigationPhase::Completed);
                investigation
            }
            Err(e) => {
                error!("Investigation {} failed: {}", id, e);
                self.enter(id, InvestigationPhase::Failed);
                self.failed_investigation(id, claim, created_at, started, &e)
            }
        };

        info!(
            "Investigation {} finished: {} ({:.1}) from {} evidence item(s), {} missing source(s)",
            id,
            investigation.verdict,
            investigation.confidence,
            investigation.evidence.len(),
            investigation.availability.missing_sources.len()
        );

        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record_investigation(&investigation);
        *self
            .last_investigation
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(investigation.clone());
        self.audit.close(id);

        investigation
    }

    /// Check the compliance invariants against the audit trail and the most
    /// recent investigation
    ///
    /// True before any investigation has run.
    pub fn validate_compliance_invariant(&self) -> bool {
        let trail = self.audit.snapshot();
        for entry in trail.iter().filter(|e| e.is_admitted()) {
            if !entry.outcome.tier.is_admissible() || self.validator.is_excluded_url(&entry.candidate.url) {
                warn!(
                    "Audit entry {} admits inadmissible evidence from {}",
                    entry.sequence, entry.candidate.url
                );
                return false;
            }
        }

        let last = self
            .last_investigation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match last.as_ref() {
            None => true,
            Some(investigation) => {
                if !investigation.compliant {
                    return false;
                }
                let violations = self.compliance_violations(
                    investigation.id,
                    &investigation.evidence,
                    investigation.verdict,
                    investigation.confidence,
                    &investigation.reasoning,
                );
                for violation in &violations {
                    warn!("Investigation {}: {}", investigation.id, violation);
                }
                violations.is_empty()
            }
        }
    }

    fn enter(&self, id: InvestigationId, phase: InvestigationPhase) {
        debug!("Investigation {} entered phase {}", id, phase);
    }

    async fn run_pipeline(
        &self,
        id: InvestigationId,
        claim: &Claim,
        created_at: u64,
        started: Instant,
    ) -> Result<Investigation, EngineError> {
        let topics = self.topic_selector.select(&claim.body);
        debug!(
            "Investigation {} topics: {}",
            id,
            topics.iter().map(Topic::as_str).collect::<Vec<_>>().join(", ")
        );

        self.audit.open(id)?;

        self.enter(id, InvestigationPhase::Dispatching);
        let fetches = self.dispatch(claim, &topics).await;
        let pool = EvidencePool::new();
        let reports = self.settle(id, fetches, &pool)?;
        let evidence = pool.sorted()?;

        self.enter(id, InvestigationPhase::Aggregating);
        let assessment = assess(&evidence);
        let indicators = self.extractor.extract(&evidence);

        self.enter(id, InvestigationPhase::Adjusting);
        let contributing: BTreeSet<String> = reports
            .iter()
            .filter(|r| r.contributed())
            .map(|r| r.provider.clone())
            .collect();
        let availability = self.adjuster.availability(&reports, &contributing);
        let confidence = if evidence.is_empty() {
            SCORE_MIN
        } else {
            self.adjuster.adjust(assessment.raw_confidence, &availability)
        };

        self.enter(id, InvestigationPhase::Composing);
        let providers_queried = self.provider_requirements();
        let providers_used: Vec<String> = providers_queried
            .iter()
            .filter(|p| contributing.contains(*p))
            .cloned()
            .collect();
        let reasoning = self.composer.compose(&ReasoningInput {
            assessment: &assessment,
            confidence,
            availability: &availability,
            providers_queried: &providers_queried,
            providers_used: &providers_used,
            reports: &reports,
            indicators: &indicators,
        });

        let violations =
            self.compliance_violations(id, &evidence, assessment.verdict, confidence, &reasoning);
        for violation in &violations {
            warn!("Investigation {}: {}", id, violation);
        }

        Ok(Investigation {
            id,
            claim_id: claim.id,
            agent: AGENT_ID.to_string(),
            evidence,
            providers_queried,
            providers_used,
            verdict: assessment.verdict,
            confidence,
            reasoning,
            compliant: violations.is_empty(),
            status: InvestigationStatus::Completed,
            availability,
            indicators,
            provider_reports: reports,
            processing_time_us: elapsed_us(started),
            created_at,
        })
    }

    /// Run every connector concurrently; one fetch per slot, in slot order
    async fn dispatch(&self, claim: &Claim, topics: &BTreeSet<Topic>) -> Vec<ProviderFetch> {
        let pending: Vec<(String, Option<JoinHandle<ProviderFetch>>)> = self
            .slots
            .iter()
            .map(|slot| {
                let handle = slot.connector.as_ref().map(|connector| {
                    let task = ProviderTask {
                        provider_id: slot.provider_id.clone(),
                        connector: Arc::clone(connector),
                        claim: claim.clone(),
                        topics: topics.clone(),
                        validator: Arc::clone(&self.validator),
                        timeout: self.config.connector_timeout(),
                    };
                    tokio::spawn(task.run())
                });
                (slot.provider_id.clone(), handle)
            })
            .collect();

        let mut fetches = Vec::with_capacity(pending.len());
        for (provider_id, handle) in pending {
            let Some(handle) = handle else {
                warn!("Provider {} has no configured connector", provider_id);
                fetches.push(ProviderFetch::unanswered(ProviderReport::unconfigured(&provider_id)));
                continue;
            };

            match handle.await {
                Ok(fetch) => fetches.push(fetch),
                Err(join_error) => {
                    warn!("Connector task for {} aborted: {}", provider_id, join_error);
                    let mut report = ProviderReport::unconfigured(&provider_id);
                    report.error = Some(format!("connector task failed: {}", join_error));
                    fetches.push(ProviderFetch::unanswered(report));
                }
            }
        }
        fetches
    }

    /// Admit validated candidates and audit every decision, provider by
    /// provider in slot order
    ///
    /// An admissible candidate whose checksum is already pooled is audited as
    /// a duplicate and counted as corroboration for its provider.
    fn settle(
        &self,
        id: InvestigationId,
        fetches: Vec<ProviderFetch>,
        pool: &EvidencePool,
    ) -> Result<Vec<ProviderReport>, EngineError> {
        let mut reports = Vec::with_capacity(fetches.len());

        for ProviderFetch { mut report, validated } in fetches {
            for (candidate, mut outcome) in validated {
                let mut admitted = false;

                if outcome.valid {
                    let evidence = SourceEvidence {
                        candidate: candidate.clone(),
                        provider: report.provider.clone(),
                        checksum: outcome.checksum.clone().unwrap_or_default(),
                        tier: outcome.tier,
                        provenance: outcome.provenance.clone(),
                        admitted_at: current_timestamp_ms(),
                    };
                    if pool.admit(evidence)? {
                        admitted = true;
                        report.admitted += 1;
                    } else {
                        outcome = outcome.reject(DUPLICATE_REASON);
                        report.corroborated += 1;
                    }
                } else {
                    report.rejected += 1;
                    debug!(
                        "Rejected {} from {}: {}",
                        candidate.url,
                        report.provider,
                        outcome.errors.join("; ")
                    );
                }

                self.audit.record(AuditEntry {
                    sequence: 0,
                    operation: VALIDATE_OPERATION.to_string(),
                    provider: report.provider.clone(),
                    investigation_id: id,
                    timestamp: current_timestamp_ms(),
                    outcome,
                    candidate: CandidateRef {
                        url: candidate.url,
                        title: candidate.title,
                        admitted,
                    },
                })?;
            }
            reports.push(report);
        }

        Ok(reports)
    }

    fn compliance_violations(
        &self,
        id: InvestigationId,
        evidence: &[SourceEvidence],
        verdict: Verdict,
        confidence: f64,
        reasoning: &str,
    ) -> Vec<String> {
        let mut violations = Vec::new();

        if !(SCORE_MIN..=SCORE_MAX).contains(&confidence) {
            violations.push(format!("confidence {} outside [0, 100]", confidence));
        }
        if evidence.is_empty() && (verdict != Verdict::InsufficientEvidence || confidence != SCORE_MIN) {
            violations.push("empty evidence must yield INSUFFICIENT_EVIDENCE at 0".to_string());
        }
        if self.composer.contains_forbidden(reasoning) {
            violations.push("reasoning contains forbidden vocabulary".to_string());
        }

        let admitted = self.audit.admitted_checksums(id);
        for item in evidence {
            if !admitted.contains(&item.checksum) {
                violations.push(format!("evidence {} has no admitted audit entry", item.url()));
            }
            if !item.tier.is_admissible() || self.validator.is_excluded_url(item.url()) {
                violations.push(format!("evidence {} is not admissible", item.url()));
            }
        }

        violations
    }

    fn failed_investigation(
        &self,
        id: InvestigationId,
        claim: &Claim,
        created_at: u64,
        started: Instant,
        error: &EngineError,
    ) -> Investigation {
        let providers_queried = self.provider_requirements();
        let reasoning = self.composer.compose_fault(error, &providers_queried);

        Investigation {
            id,
            claim_id: claim.id,
            agent: AGENT_ID.to_string(),
            evidence: Vec::new(),
            providers_queried,
            providers_used: Vec::new(),
            verdict: Verdict::InsufficientEvidence,
            confidence: SCORE_MIN,
            reasoning,
            compliant: false,
            status: InvestigationStatus::Failed,
            availability: DataAvailabilityReport::new(),
            indicators: Vec::new(),
            provider_reports: Vec::new(),
            processing_time_us: elapsed_us(started),
            created_at,
        }
    }
}

/// What one provider returned, validated but not yet admitted
struct ProviderFetch {
    report: ProviderReport,
    validated: Vec<(EvidenceCandidate, ValidationOutcome)>,
}

impl ProviderFetch {
    fn unanswered(report: ProviderReport) -> Self {
        Self {
            report,
            validated: Vec::new(),
        }
    }
}

/// Work for one provider: fetch and validate
struct ProviderTask {
    provider_id: String,
    connector: Arc<dyn SourceConnector>,
    claim: Claim,
    topics: BTreeSet<Topic>,
    validator: Arc<AuthenticityValidator>,
    timeout: Duration,
}

impl ProviderTask {
    async fn run(self) -> ProviderFetch {
        let started = Instant::now();
        let mut report = ProviderReport {
            provider: self.provider_id.clone(),
            reachable: false,
            fetched: 0,
            admitted: 0,
            rejected: 0,
            corroborated: 0,
            error: None,
            elapsed_ms: 0,
        };

        let outcome = match timeout(self.timeout, self.connector.fetch(&self.claim, &self.topics)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ConnectorError::Timeout(self.timeout)),
        };

        let validated = match outcome {
            Err(e) => {
                warn!("Provider {} unavailable: {}", self.provider_id, e);
                report.error = Some(e.to_string());
                Vec::new()
            }
            Ok(candidates) => {
                report.reachable = true;
                report.fetched = candidates.len();
                debug!("Provider {} returned {} candidate(s)", self.provider_id, candidates.len());

                candidates
                    .into_iter()
                    .map(|candidate| {
                        let outcome = self.validator.validate(&candidate, &self.provider_id);
                        (candidate, outcome)
                    })
                    .collect()
            }
        };

        report.elapsed_ms = started.elapsed().as_millis() as u64;
        ProviderFetch { report, validated }
    }
}

/// Elapsed time in microseconds, measured in nanoseconds and rounded up
///
/// A clock too coarse to register any elapsed time still yields 1.
fn elapsed_us(started: Instant) -> u64 {
    let micros = started.elapsed().as_nanos().div_ceil(1_000);
    u64::try_from(micros).unwrap_or(u64::MAX).max(1)
}

fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
