//! Candidate authenticity checks

use crate::{ValidationConfig, ValidatorError};
use marlowe_domain::{AuthenticityTier, EvidenceCandidate, ProvenanceEntry, ValidationOutcome};
use sha2::{Digest, Sha256};
use std::fmt::Write;
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

/// Field separator for the checksum payload (ASCII unit separator)
const FIELD_SEPARATOR: &[u8] = b"\x1f";

fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Hex SHA-256 over the candidate's canonical payload
///
/// Covers url, title, content, source and both scores, so two candidates
/// with the same checksum carry the same evidence.
pub fn payload_checksum(candidate: &EvidenceCandidate) -> String {
    let mut hasher = Sha256::new();
    for field in [
        candidate.url.as_str(),
        candidate.title.as_str(),
        candidate.content.as_str(),
        candidate.source.as_str(),
    ] {
        hasher.update(field.as_bytes());
        hasher.update(FIELD_SEPARATOR);
    }
    hasher.update(candidate.credibility.to_bits().to_be_bytes());
    hasher.update(candidate.relevance.to_bits().to_be_bytes());

    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}

/// The authenticity validator
///
/// Stateless apart from its configuration; safe to share across tasks.
#[derive(Debug, Clone)]
pub struct AuthenticityValidator {
    config: ValidationConfig,
}

impl AuthenticityValidator {
    /// Create a validator with the given configuration
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Config`] if the configuration is invalid.
    pub fn new(config: ValidationConfig) -> Result<Self, ValidatorError> {
        config.validate().map_err(ValidatorError::Config)?;
        Ok(Self { config })
    }

    /// Create a validator with the default configuration
    pub fn default_config() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    /// The active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate one candidate returned by `provider_id`
    ///
    /// All four checks run and every failure is reported, so the audit trail
    /// shows the full reason a candidate was refused.
    pub fn validate(&self, candidate: &EvidenceCandidate, provider_id: &str) -> ValidationOutcome {
        let mut errors = Vec::new();

        // 1. Domain exclusion
        let parsed = match Url::parse(candidate.url.trim()) {
            Ok(url) => Some(url),
            Err(e) => {
                errors.push(format!("invalid url '{}': {}", candidate.url, e));
                None
            }
        };
        if let Some(url) = &parsed {
            match url.host_str() {
                Some(host) if self.is_excluded_host(host) => {
                    errors.push(format!("excluded domain: {}", host));
                }
                Some(_) => {}
                None => errors.push(format!("url '{}' has no host", candidate.url)),
            }
        }

        // 2. Content
        if let Some(reason) = self.check_content(candidate) {
            errors.push(reason);
        }

        // 3. Provenance
        let provenance = match self.build_provenance(parsed.as_ref(), provider_id) {
            Ok(chain) => chain,
            Err(reason) => {
                errors.push(format!("provenance chain cannot be constructed: {}", reason));
                Vec::new()
            }
        };

        // 4. Consistency and checksum
        errors.extend(self.check_consistency(candidate));
        let checksum = payload_checksum(candidate);

        if !errors.is_empty() {
            return ValidationOutcome::rejected(errors, provenance, Some(checksum));
        }

        let tier = if candidate.credibility >= self.config.verified_credibility_threshold {
            AuthenticityTier::Verified
        } else {
            AuthenticityTier::Unverified
        };
        ValidationOutcome::admitted(tier, provenance, checksum)
    }

    /// Whether a URL points at an excluded domain
    ///
    /// Unparseable URLs and URLs without a host count as excluded.
    pub fn is_excluded_url(&self, url: &str) -> bool {
        match Url::parse(url.trim()) {
            Ok(parsed) => parsed.host_str().map_or(true, |h| self.is_excluded_host(h)),
            Err(_) => true,
        }
    }

    fn is_excluded_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_lowercase();
        self.config.excluded_domains.iter().any(|domain| {
            let domain = domain.trim().to_lowercase();
            host == domain || host.ends_with(&format!(".{}", domain))
        })
    }

    fn check_content(&self, candidate: &EvidenceCandidate) -> Option<String> {
        let content = candidate.content.trim();
        if content.is_empty() {
            return Some("content is empty".to_string());
        }

        let lowered = content.to_lowercase();
        if self
            .config
            .placeholder_values
            .iter()
            .any(|v| v.to_lowercase() == lowered)
        {
            return Some(format!("placeholder content: '{}'", content));
        }

        let title = candidate.title.to_lowercase();
        for phrase in &self.config.placeholder_phrases {
            let phrase = phrase.to_lowercase();
            if lowered.contains(&phrase) || title.contains(&phrase) {
                return Some(format!("placeholder content: contains '{}'", phrase));
            }
        }

        if content.chars().count() < self.config.min_content_length {
            return Some(format!(
                "content too short: {} chars (min: {})",
                content.chars().count(),
                self.config.min_content_length
            ));
        }

        None
    }

    fn build_provenance(
        &self,
        url: Option<&Url>,
        provider_id: &str,
    ) -> Result<Vec<ProvenanceEntry>, String> {
        if provider_id.trim().is_empty() {
            return Err("provider id is empty".to_string());
        }
        let url = url.ok_or_else(|| "url is not resolvable".to_string())?;
        if !self
            .config
            .allowed_schemes
            .iter()
            .any(|s| s.eq_ignore_ascii_case(url.scheme()))
        {
            return Err(format!("scheme '{}' is not allowed", url.scheme()));
        }
        let host = url
            .host_str()
            .ok_or_else(|| "url has no host".to_string())?;

        let now = current_timestamp_ms();
        Ok(vec![
            ProvenanceEntry::new(
                format!("provider:{}", provider_id),
                now,
                "provider".to_string(),
            ),
            ProvenanceEntry::new(format!("host:{}", host), now, "host".to_string()),
            ProvenanceEntry::new(url.to_string(), now, "document".to_string()),
        ])
    }

    fn check_consistency(&self, candidate: &EvidenceCandidate) -> Vec<String> {
        let mut errors = Vec::new();
        for (name, value) in [
            ("credibility", candidate.credibility),
            ("relevance", candidate.relevance),
        ] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                errors.push(format!("{} {} outside [0, 100]", name, value));
            }
        }
        errors
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Admitted candidates never point at an excluded domain
        #[test]
        fn test_admitted_never_excluded(
            sub in "[a-z]{1,8}",
            domain_idx in 0usize..10,
            content in "[A-Za-z ]{0,60}",
        ) {
            let validator = AuthenticityValidator::default_config();
            let domain = &validator.config().excluded_domains[domain_idx];
            let candidate = EvidenceCandidate::new(
                format!("https://{}.{}/page", sub, domain),
                "Title",
                content,
                "Source",
                90.0,
                90.0,
            );
            let outcome = validator.validate(&candidate, "web_search");
            prop_assert!(!outcome.valid);
        }

        /// Validity and tier always agree
        #[test]
        fn test_valid_iff_admissible_tier(
            credibility in -50.0f64..150.0,
            relevance in -50.0f64..150.0,
        ) {
            let validator = AuthenticityValidator::default_config();
            let candidate = EvidenceCandidate::new(
                "https://www.federalreserve.gov/monetarypolicy.htm",
                "Policy statement",
                "The Committee decided to maintain the target range.",
                "Federal Reserve",
                credibility,
                relevance,
            );
            let outcome = validator.validate(&candidate, "economic_data");
            prop_assert_eq!(outcome.valid, outcome.tier.is_admissible());
        }
    }
}
