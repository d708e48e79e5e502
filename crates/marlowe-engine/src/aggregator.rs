//! Veracity aggregation
//!
//! Turns the admitted evidence pool into a verdict and a raw confidence
//! score. Rules are evaluated in order and the first that applies wins:
//!
//! 1. no evidence: INSUFFICIENT_EVIDENCE, confidence 0
//! 2. two or more high-credibility items: MOSTLY_TRUE when raw >= 75,
//!    otherwise PARTIALLY_TRUE
//! 3. one high and at least one medium item: PARTIALLY_TRUE, capped at 70
//! 4. three or more items: UNVERIFIED, capped at 60
//! 5. anything else: INSUFFICIENT_EVIDENCE, raw unchanged
//!
//! Raw confidence is `0.6 * mean credibility + 0.4 * mean relevance`,
//! capped at 100.

use marlowe_domain::{clamp_score, SourceEvidence, Verdict};

/// Credibility at or above which an item counts as high
pub const HIGH_CREDIBILITY: f64 = 80.0;

/// Credibility at or above which an item counts as medium
pub const MEDIUM_CREDIBILITY: f64 = 60.0;

/// Raw confidence needed for MOSTLY_TRUE
pub const MOSTLY_TRUE_THRESHOLD: f64 = 75.0;

/// Cap for one-high-plus-medium corroboration
pub const MIXED_SUPPORT_CAP: f64 = 70.0;

/// Cap for broad but low-credibility evidence
pub const BROAD_SUPPORT_CAP: f64 = 60.0;

const CREDIBILITY_WEIGHT: f64 = 0.6;
const RELEVANCE_WEIGHT: f64 = 0.4;

/// Which rule produced the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentBasis {
    /// Evidence pool was empty
    NoEvidence,
    /// Two or more high-credibility items
    HighCorroboration,
    /// One high-credibility item with medium support
    MixedCorroboration,
    /// Three or more items without high-credibility corroboration
    BroadLowCredibility,
    /// Too little evidence to classify
    Sparse,
}

/// Verdict and raw confidence computed from evidence
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub verdict: Verdict,
    pub raw_confidence: f64,
    pub average_credibility: f64,
    pub average_relevance: f64,
    pub high_count: usize,
    pub medium_count: usize,
    pub evidence_count: usize,
    pub basis: AssessmentBasis,
}

impl Assessment {
    fn empty() -> Self {
        Self {
            verdict: Verdict::InsufficientEvidence,
            raw_confidence: 0.0,
            average_credibility: 0.0,
            average_relevance: 0.0,
            high_count: 0,
            medium_count: 0,
            evidence_count: 0,
            basis: AssessmentBasis::NoEvidence,
        }
    }

    /// Plain-language account of how the verdict was reached
    pub fn explanation(&self) -> String {
        let averages = format!(
            "mean credibility {:.1}, mean relevance {:.1}",
            self.average_credibility, self.average_relevance
        );
        match self.basis {
            AssessmentBasis::NoEvidence => {
                "No data available: no provider returned admissible evidence for this claim."
                    .to_string()
            }
            AssessmentBasis::HighCorroboration => format!(
                "{} high-credibility sources corroborate the claim ({}).",
                self.high_count, averages
            ),
            AssessmentBasis::MixedCorroboration => format!(
                "One high-credibility source is supported by {} medium-credibility source(s) ({}); confidence capped at {:.0}.",
                self.medium_count, averages, MIXED_SUPPORT_CAP
            ),
            AssessmentBasis::BroadLowCredibility => format!(
                "{} sources were found but without high-credibility corroboration ({}); confidence capped at {:.0}.",
                self.evidence_count, averages, BROAD_SUPPORT_CAP
            ),
            AssessmentBasis::Sparse => format!(
                "Evidence is too thin to classify: {} item(s), {} high-credibility, {} medium-credibility ({}).",
                self.evidence_count, self.high_count, self.medium_count, averages
            ),
        }
    }
}

/// Assess an evidence pool
pub fn assess(evidence: &[SourceEvidence]) -> Assessment {
    if evidence.is_empty() {
        return Assessment::empty();
    }

    let count = evidence.len() as f64;
    let average_credibility = evidence.iter().map(|e| e.credibility()).sum::<f64>() / count;
    let average_relevance = evidence.iter().map(|e| e.relevance()).sum::<f64>() / count;
    let raw = (CREDIBILITY_WEIGHT * average_credibility + RELEVANCE_WEIGHT * average_relevance)
        .min(100.0);

    let high_count = evidence
        .iter()
        .filter(|e| e.credibility() >= HIGH_CREDIBILITY)
        .count();
    let medium_count = evidence
        .iter()
        .filter(|e| (MEDIUM_CREDIBILITY..HIGH_CREDIBILITY).contains(&e.credibility()))
        .count();

    let (verdict, raw_confidence, basis) = if high_count >= 2 {
        let verdict = if raw >= MOSTLY_TRUE_THRESHOLD {
            Verdict::MostlyTrue
        } else {
            Verdict::PartiallyTrue
        };
        (verdict, raw, AssessmentBasis::HighCorroboration)
    } else if high_count >= 1 && medium_count >= 1 {
        (
            Verdict::PartiallyTrue,
            raw.min(MIXED_SUPPORT_CAP),
            AssessmentBasis::MixedCorroboration,
        )
    } else if evidence.len() >= 3 {
        (
            Verdict::Unverified,
            raw.min(BROAD_SUPPORT_CAP),
            AssessmentBasis::BroadLowCredibility,
        )
    } else {
        (Verdict::InsufficientEvidence, raw, AssessmentBasis::Sparse)
    };

    Assessment {
        verdict,
        raw_confidence: clamp_score(raw_confidence),
        average_credibility,
        average_relevance,
        high_count,
        medium_count,
        evidence_count: evidence.len(),
        basis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marlowe_domain::{AuthenticityTier, EvidenceCandidate};
    use proptest::prelude::*;

    fn item(credibility: f64, relevance: f64) -> SourceEvidence {
        let url = format!("https://www.bls.gov/{}/{}", credibility, relevance);
        SourceEvidence {
            candidate: EvidenceCandidate::new(&url, "t", "content", "src", credibility, relevance),
            provider: "economic_data".to_string(),
            checksum: url,
            tier: AuthenticityTier::Verified,
            provenance: Vec::new(),
            admitted_at: 0,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_pool() {
        let assessment = assess(&[]);
        assert_eq!(assessment.verdict, Verdict::InsufficientEvidence);
        assert_eq!(assessment.raw_confidence, 0.0);
        assert!(assessment.explanation().starts_with("No data available"));
    }

    #[test]
    fn test_strong_corroboration() {
        let assessment = assess(&[item(95.0, 90.0), item(92.0, 85.0)]);
        assert_eq!(assessment.verdict, Verdict::MostlyTrue);
        assert!(approx(assessment.raw_confidence, 91.1));
        assert_eq!(assessment.high_count, 2);
    }

    #[test]
    fn test_high_corroboration_below_threshold() {
        let assessment = assess(&[item(80.0, 40.0), item(82.0, 50.0)]);
        // 0.6 * 81 + 0.4 * 45 = 66.6
        assert_eq!(assessment.verdict, Verdict::PartiallyTrue);
        assert!(approx(assessment.raw_confidence, 66.6));
        assert_eq!(assessment.basis, AssessmentBasis::HighCorroboration);
    }

    #[test]
    fn test_mixed_support_is_capped() {
        let assessment = assess(&[item(95.0, 90.0), item(65.0, 60.0)]);
        // raw 78 before the cap
        assert_eq!(assessment.verdict, Verdict::PartiallyTrue);
        assert_eq!(assessment.raw_confidence, 70.0);
    }

    #[test]
    fn test_broad_low_credibility() {
        let assessment = assess(&[item(50.0, 90.0), item(55.0, 90.0), item(85.0, 90.0)]);
        assert_eq!(assessment.verdict, Verdict::Unverified);
        assert_eq!(assessment.raw_confidence, 60.0);
        assert_eq!(assessment.basis, AssessmentBasis::BroadLowCredibility);
    }

    #[test]
    fn test_sparse_keeps_raw() {
        let assessment = assess(&[item(70.0, 50.0)]);
        assert_eq!(assessment.verdict, Verdict::InsufficientEvidence);
        assert!(approx(assessment.raw_confidence, 62.0));
        assert_eq!(assessment.basis, AssessmentBasis::Sparse);
    }

    #[test]
    fn test_medium_boundaries() {
        let assessment = assess(&[item(80.0, 80.0), item(60.0, 80.0)]);
        assert_eq!(assessment.high_count, 1);
        assert_eq!(assessment.medium_count, 1);
        assert_eq!(assessment.basis, AssessmentBasis::MixedCorroboration);
    }

    proptest! {
        #[test]
        fn test_raw_confidence_in_range(
            scores in prop::collection::vec((0.0f64..=100.0, 0.0f64..=100.0), 0..12)
        ) {
            let items: Vec<_> = scores.iter().map(|(c, r)| item(*c, *r)).collect();
            let assessment = assess(&items);
            prop_assert!((0.0..=100.0).contains(&assessment.raw_confidence));
            if items.is_empty() {
                prop_assert_eq!(assessment.verdict, Verdict::InsufficientEvidence);
            }
        }
    }
}
