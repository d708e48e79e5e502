//! Reasoning composition
//!
//! Builds the human-readable explanation attached to every investigation.
//! The DATA AVAILABILITY section is always present. Output is scrubbed of
//! vocabulary that would suggest invented data before it is returned.

use crate::aggregator::Assessment;
use crate::error::EngineError;
use marlowe_domain::{DataAvailabilityReport, IndicatorReading, ProviderReport, Verdict};
use regex::Regex;
use std::fmt::Write;

/// Terms that must never appear in reasoning (case-insensitive)
pub const FORBIDDEN_TERMS: [&str; 4] = ["estimated", "simulated", "placeholder", "mock"];

/// Replacement for scrubbed terms
pub const REDACTION: &str = "[withheld]";

/// Statement appended whenever a source is missing
pub const NO_FALLBACK_STATEMENT: &str =
    "No synthetic or fallback data used: missing sources were not substituted.";

/// Everything the composer needs for a completed investigation
#[derive(Debug, Clone, Copy)]
pub struct ReasoningInput<'a> {
    pub assessment: &'a Assessment,
    pub confidence: f64,
    pub availability: &'a DataAvailabilityReport,
    pub providers_queried: &'a [String],
    pub providers_used: &'a [String],
    pub reports: &'a [ProviderReport],
    pub indicators: &'a [IndicatorReading],
}

/// Composes and scrubs reasoning text
#[derive(Debug, Clone)]
pub struct ReasoningComposer {
    forbidden: Regex,
}

impl ReasoningComposer {
    /// Create a composer
    pub fn new() -> Result<Self, EngineError> {
        let alternatives: Vec<String> = FORBIDDEN_TERMS.iter().map(|t| regex::escape(t)).collect();
        let forbidden = Regex::new(&format!("(?i){}", alternatives.join("|")))
            .map_err(|e| EngineError::Internal(format!("reasoning filter: {}", e)))?;
        Ok(Self { forbidden })
    }

    /// Reasoning for a completed investigation
    pub fn compose(&self, input: &ReasoningInput<'_>) -> String {
        let mut text = String::new();
        let _ = writeln!(
            text,
            "VERDICT: {} (confidence {:.1}/100)",
            input.assessment.verdict, input.confidence
        );

        text.push_str("\nASSESSMENT:\n");
        let _ = writeln!(text, "{}", input.assessment.explanation());
        if input.assessment.evidence_count > 0 {
            let _ = writeln!(
                text,
                "Confidence before availability adjustment: {:.1}",
                input.assessment.raw_confidence
            );
        }

        if !input.indicators.is_empty() {
            text.push_str("\nKEY INDICATORS:\n");
            for reading in input.indicators {
                let _ = writeln!(
                    text,
                    "- {}: {} ({}, {})",
                    reading.indicator, reading.value, reading.provider, reading.url
                );
            }
        }

        text.push_str("\nDATA AVAILABILITY:\n");
        let _ = writeln!(text, "- Providers queried: {}", list(input.providers_queried));
        let _ = writeln!(
            text,
            "- Providers with admitted evidence: {}",
            list(input.providers_used)
        );

        if input.availability.has_missing() {
            text.push_str("- Missing sources:\n");
            for provider in &input.availability.missing_sources {
                let reason = input
                    .reports
                    .iter()
                    .find(|r| &r.provider == provider)
                    .map(missing_reason)
                    .unwrap_or_else(|| "no admissible evidence".to_string());
                let _ = writeln!(text, "  - {}: {}", provider, reason);
            }
        } else {
            text.push_str("- All queried providers contributed admissible evidence.\n");
        }
        let _ = writeln!(
            text,
            "- Confidence reduction applied: {:.1}%",
            input.availability.confidence_reduction
        );

        if input.availability.has_missing() {
            let _ = writeln!(text, "\n{}", NO_FALLBACK_STATEMENT);
        }

        self.scrub(text.trim_end())
    }

    /// Reasoning for an investigation aborted by a system fault
    pub fn compose_fault(&self, error: &EngineError, providers_queried: &[String]) -> String {
        let mut text = String::new();
        let _ = writeln!(
            text,
            "VERDICT: {} (confidence 0.0/100)",
            Verdict::InsufficientEvidence
        );
        text.push_str("\nSYSTEM FAULT:\n");
        let _ = writeln!(
            text,
            "The investigation was aborted before a verdict could be reached: {}",
            error
        );
        text.push_str("\nDATA AVAILABILITY:\n");
        let _ = writeln!(text, "- Providers queried: {}", list(providers_queried));
        text.push_str("- No evidence is reported for this investigation.\n");
        text.push_str("- Confidence reduction applied: 100.0%\n");
        let _ = writeln!(text, "\n{}", NO_FALLBACK_STATEMENT);

        self.scrub(text.trim_end())
    }

    /// Replace every forbidden term with [`REDACTION`]
    pub fn scrub(&self, text: &str) -> String {
        self.forbidden.replace_all(text, REDACTION).into_owned()
    }

    /// Whether `text` contains a forbidden term
    pub fn contains_forbidden(&self, text: &str) -> bool {
        self.forbidden.is_match(text)
    }
}

fn list(providers: &[String]) -> String {
    if providers.is_empty() {
        "none".to_string()
    } else {
        providers.join(", ")
    }
}

fn missing_reason(report: &ProviderReport) -> String {
    match &report.error {
        Some(error) => error.clone(),
        None if report.fetched == 0 => "returned no results".to_string(),
        None => format!("all {} candidate(s) rejected", report.fetched),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjuster::ConfidenceAdjuster;
    use crate::aggregator::assess;
    use marlowe_domain::{AuthenticityTier, EvidenceCandidate, SourceEvidence};
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn composer() -> ReasoningComposer {
        ReasoningComposer::new().unwrap()
    }

    fn item(credibility: f64, relevance: f64) -> SourceEvidence {
        let url = format!("https://www.bls.gov/{}", credibility);
        SourceEvidence {
            candidate: EvidenceCandidate::new(&url, "t", "content", "src", credibility, relevance),
            provider: "economic_data".to_string(),
            checksum: url,
            tier: AuthenticityTier::Verified,
            provenance: Vec::new(),
            admitted_at: 0,
        }
    }

    fn report(provider: &str, reachable: bool, fetched: usize, admitted: usize, error: Option<&str>) -> ProviderReport {
        ProviderReport {
            provider: provider.to_string(),
            reachable,
            fetched,
            admitted,
            rejected: fetched - admitted,
            corroborated: 0,
            error: error.map(str::to_string),
            elapsed_ms: 1,
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_complete_reasoning_has_availability_section() {
        let assessment = assess(&[item(95.0, 90.0), item(92.0, 85.0)]);
        let reports = vec![report("economic_data", true, 2, 2, None)];
        let availability = ConfidenceAdjuster::default()
            .availability(&reports, &BTreeSet::from(["economic_data".to_string()]));
        let queried = strings(&["economic_data"]);

        let text = composer().compose(&ReasoningInput {
            assessment: &assessment,
            confidence: assessment.raw_confidence,
            availability: &availability,
            providers_queried: &queried,
            providers_used: &queried,
            reports: &reports,
            indicators: &[],
        });

        assert!(text.starts_with("VERDICT: MOSTLY_TRUE (confidence 91.1/100)"));
        assert!(text.contains("DATA AVAILABILITY:"));
        assert!(text.contains("Confidence reduction applied: 0.0%"));
        assert!(!text.contains(NO_FALLBACK_STATEMENT));
    }

    #[test]
    fn test_missing_sources_listed_with_reduction() {
        let assessment = assess(&[]);
        let reports = vec![
            report("economic_data", false, 0, 0, Some("Rate limit exceeded")),
            report("web_search", true, 2, 0, None),
        ];
        let availability = ConfidenceAdjuster::default().availability(&reports, &BTreeSet::new());
        let queried = strings(&["economic_data", "web_search"]);

        let text = composer().compose(&ReasoningInput {
            assessment: &assessment,
            confidence: 0.0,
            availability: &availability,
            providers_queried: &queried,
            providers_used: &[],
            reports: &reports,
            indicators: &[],
        });

        assert!(text.contains("No data available"));
        assert!(text.contains("- economic_data: Rate limit exceeded"));
        assert!(text.contains("- web_search: all 2 candidate(s) rejected"));
        assert!(text.contains("Confidence reduction applied: 55.0%"));
        assert!(text.contains("Providers with admitted evidence: none"));
        assert!(text.contains(NO_FALLBACK_STATEMENT));
    }

    #[test]
    fn test_indicators_listed() {
        let assessment = assess(&[item(95.0, 90.0)]);
        let reports = vec![report("economic_data", true, 1, 1, None)];
        let availability = ConfidenceAdjuster::default()
            .availability(&reports, &BTreeSet::from(["economic_data".to_string()]));
        let queried = strings(&["economic_data"]);
        let indicators = vec![IndicatorReading {
            indicator: "unemployment rate".to_string(),
            value: "3.9%".to_string(),
            provider: "economic_data".to_string(),
            url: "https://www.bls.gov/cps".to_string(),
        }];

        let text = composer().compose(&ReasoningInput {
            assessment: &assessment,
            confidence: assessment.raw_confidence,
            availability: &availability,
            providers_queried: &queried,
            providers_used: &queried,
            reports: &reports,
            indicators: &indicators,
        });

        assert!(text.contains("KEY INDICATORS:"));
        assert!(text.contains("- unemployment rate: 3.9% (economic_data, https://www.bls.gov/cps)"));
    }

    #[test]
    fn test_provider_names_are_scrubbed() {
        let assessment = assess(&[]);
        let reports = vec![report("mock_feed", false, 0, 0, Some("Simulated outage"))];
        let availability = ConfidenceAdjuster::default().availability(&reports, &BTreeSet::new());
        let queried = strings(&["mock_feed"]);

        let text = composer().compose(&ReasoningInput {
            assessment: &assessment,
            confidence: 0.0,
            availability: &availability,
            providers_queried: &queried,
            providers_used: &[],
            reports: &reports,
            indicators: &[],
        });

        assert!(!composer().contains_forbidden(&text));
        assert!(text.contains("[withheld]_feed"));
    }

    #[test]
    fn test_fault_reasoning() {
        let error = EngineError::Audit("audit log unavailable: placeholder".to_string());
        let text = composer().compose_fault(&error, &strings(&["economic_data"]));

        assert!(text.contains("SYSTEM FAULT:"));
        assert!(text.contains("Audit error"));
        assert!(text.contains("DATA AVAILABILITY:"));
        assert!(!composer().contains_forbidden(&text));
    }

    #[test]
    fn test_scrub_is_case_insensitive() {
        let scrubbed = composer().scrub("ESTIMATED value from a Mock source");
        assert_eq!(scrubbed, "[withheld] value from a [withheld] source");
    }

    proptest! {
        #[test]
        fn test_scrubbed_text_never_contains_forbidden_terms(
            parts in prop::collection::vec(
                prop_oneof![
                    "[a-zA-Z ]{0,12}",
                    Just("estimated".to_string()),
                    Just("SIMULATED".to_string()),
                    Just("PlaceHolder".to_string()),
                    Just("mock".to_string()),
                ],
                0..10,
            )
        ) {
            let text = parts.concat();
            let scrubbed = composer().scrub(&text);
            let lowered = scrubbed.to_lowercase();
            for term in FORBIDDEN_TERMS {
                prop_assert!(!lowered.contains(term));
            }
        }
    }
}
