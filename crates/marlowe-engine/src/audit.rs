//! Append-only audit trail
//!
//! Every validation decision made during any investigation is recorded here.
//! Entries are never modified once written. The log is bounded: when full,
//! the oldest entries are evicted and counted. Entries of an investigation
//! that is still open are never evicted, so the log may exceed its capacity
//! until that investigation closes.

use crate::error::EngineError;
use marlowe_domain::{AuditEntry, InvestigationId};
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default number of retained entries
pub const DEFAULT_AUDIT_CAPACITY: usize = 10_000;

#[derive(Debug, Default)]
struct AuditLog {
    entries: VecDeque<AuditEntry>,
    next_sequence: u64,
    evicted: u64,
    open: HashSet<InvestigationId>,
}

impl AuditLog {
    fn evict_to(&mut self, capacity: usize) {
        while self.entries.len() > capacity {
            let Some(index) = self
                .entries
                .iter()
                .position(|e| !self.open.contains(&e.investigation_id))
            else {
                break;
            };
            self.entries.remove(index);
            self.evicted += 1;
        }
    }
}

/// Thread-safe bounded audit recorder
#[derive(Debug)]
pub struct AuditRecorder {
    capacity: usize,
    log: Mutex<AuditLog>,
}

impl AuditRecorder {
    /// Create a recorder retaining at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            log: Mutex::new(AuditLog::default()),
        }
    }

    /// Mark an investigation as in flight; its entries are kept until
    /// [`close`](Self::close)
    pub fn open(&self, investigation_id: InvestigationId) -> Result<(), EngineError> {
        let mut log = self.lock()?;
        log.open.insert(investigation_id);
        Ok(())
    }

    /// Release an investigation's entries for eviction
    ///
    /// Eviction happens on the next [`record`](Self::record), so the entries
    /// of the investigation that just finished stay readable until then.
    pub fn close(&self, investigation_id: InvestigationId) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .open
            .remove(&investigation_id);
    }

    /// Append an entry, assigning its sequence number
    ///
    /// Fails only if the log lock is poisoned; callers treat that as a
    /// system fault.
    pub fn record(&self, mut entry: AuditEntry) -> Result<u64, EngineError> {
        let mut log = self.lock()?;

        let sequence = log.next_sequence;
        log.next_sequence += 1;
        entry.sequence = sequence;

        log.entries.push_back(entry);
        log.evict_to(self.capacity);
        Ok(sequence)
    }

    fn lock(&self) -> Result<MutexGuard<'_, AuditLog>, EngineError> {
        self.log
            .lock()
            .map_err(|e| EngineError::Audit(format!("audit log unavailable: {}", e)))
    }

    /// Copy of the retained entries, oldest first
    pub fn snapshot(&self) -> Vec<AuditEntry> {
        let log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        log.entries.iter().cloned().collect()
    }

    /// Checksums admitted during one investigation
    pub fn admitted_checksums(&self, investigation_id: InvestigationId) -> HashSet<String> {
        let log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        log.entries
            .iter()
            .filter(|e| e.investigation_id == investigation_id && e.is_admitted())
            .filter_map(|e| e.outcome.checksum.clone())
            .collect()
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Whether nothing is retained
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries ever recorded, including evicted ones
    pub fn total_recorded(&self) -> u64 {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_sequence
    }

    /// Entries dropped to honour the capacity
    pub fn evicted(&self) -> u64 {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).evicted
    }

    /// Maximum retained entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Poison the log lock, for exercising fault handling
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = self.log.lock();
                panic!("poisoning audit log");
            })
            .join()
        });
    }
}

impl Default for AuditRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marlowe_domain::{AuthenticityTier, CandidateRef, ValidationOutcome};

    fn entry(investigation_id: InvestigationId, url: &str, admitted: bool) -> AuditEntry {
        let outcome = if admitted {
            ValidationOutcome::admitted(AuthenticityTier::Verified, Vec::new(), url.to_string())
        } else {
            ValidationOutcome::rejected(vec!["bad".to_string()], Vec::new(), None)
        };
        AuditEntry {
            sequence: 0,
            operation: "validate_candidate".to_string(),
            provider: "economic_data".to_string(),
            investigation_id,
            timestamp: 1,
            outcome,
            candidate: CandidateRef {
                url: url.to_string(),
                title: "t".to_string(),
                admitted,
            },
        }
    }

    #[test]
    fn test_sequences_are_assigned_in_order() {
        let recorder = AuditRecorder::new(10);
        let id = InvestigationId::new();

        assert_eq!(recorder.record(entry(id, "https://a.gov", true)).unwrap(), 0);
        assert_eq!(recorder.record(entry(id, "https://b.gov", false)).unwrap(), 1);

        let trail = recorder.snapshot();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].sequence, 0);
        assert_eq!(trail[1].sequence, 1);
        assert_eq!(trail[0].candidate.url, "https://a.gov");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let recorder = AuditRecorder::new(2);
        let id = InvestigationId::new();

        for url in ["https://a.gov", "https://b.gov", "https://c.gov"] {
            recorder.record(entry(id, url, true)).unwrap();
        }

        let trail = recorder.snapshot();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].candidate.url, "https://b.gov");
        assert_eq!(recorder.total_recorded(), 3);
        assert_eq!(recorder.evicted(), 1);
    }

    #[test]
    fn test_open_investigation_is_never_evicted() {
        let recorder = AuditRecorder::new(1);
        let running = InvestigationId::new();
        let other = InvestigationId::new();

        recorder.open(running).unwrap();
        recorder.record(entry(running, "https://a.gov", true)).unwrap();
        recorder.record(entry(running, "https://b.gov", true)).unwrap();
        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.evicted(), 0);

        recorder.close(running);
        assert_eq!(recorder.len(), 2);

        recorder.record(entry(other, "https://c.gov", true)).unwrap();
        let trail = recorder.snapshot();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].candidate.url, "https://c.gov");
        assert_eq!(recorder.evicted(), 2);
    }

    #[test]
    fn test_admitted_checksums_scoped_to_investigation() {
        let recorder = AuditRecorder::default();
        let first = InvestigationId::new();
        let second = InvestigationId::new();

        recorder.record(entry(first, "https://a.gov", true)).unwrap();
        recorder.record(entry(first, "https://b.gov", false)).unwrap();
        recorder.record(entry(second, "https://c.gov", true)).unwrap();

        let checksums = recorder.admitted_checksums(first);
        assert_eq!(checksums.len(), 1);
        assert!(checksums.contains("https://a.gov"));
    }

    #[test]
    fn test_poisoned_log_fails_record_but_still_reads() {
        let recorder = AuditRecorder::new(4);
        let id = InvestigationId::new();
        recorder.record(entry(id, "https://a.gov", true)).unwrap();

        recorder.poison();

        assert!(matches!(
            recorder.record(entry(id, "https://b.gov", true)),
            Err(EngineError::Audit(_))
        ));
        assert_eq!(recorder.snapshot().len(), 1);
    }

    #[test]
    fn test_concurrent_records() {
        let recorder = std::sync::Arc::new(AuditRecorder::new(1000));
        let id = InvestigationId::new();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let recorder = std::sync::Arc::clone(&recorder);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        let url = format!("https://t{}.gov/{}", t, i);
                        recorder.record(entry(id, &url, true)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let trail = recorder.snapshot();
        assert_eq!(trail.len(), 200);
        assert!(trail.windows(2).all(|w| w[0].sequence < w[1].sequence));
    }
}
