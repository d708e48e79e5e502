//! Validator configuration

use serde::{Deserialize, Serialize};

/// Configuration for authenticity checks
///
/// Fields missing from a TOML table take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Domains whose evidence is never admitted; subdomains are excluded too
    pub excluded_domains: Vec<String>,

    /// Phrases that mark content as placeholder text (case-insensitive substring)
    pub placeholder_phrases: Vec<String>,

    /// Whole-content values that mark content as placeholder (case-insensitive)
    pub placeholder_values: Vec<String>,

    /// Minimum trimmed content length in characters
    pub min_content_length: usize,

    /// Credibility at or above which admitted evidence is VERIFIED
    pub verified_credibility_threshold: f64,

    /// URL schemes a provenance chain may start from
    pub allowed_schemes: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            excluded_domains: strings(&[
                "example.com",
                "example.org",
                "example.net",
                "test.com",
                "localhost",
                "placeholder.com",
                "mock.com",
                "mockapi.io",
                "fake.com",
                "dummy.com",
            ]),
            placeholder_phrases: strings(&[
                "lorem ipsum",
                "placeholder",
                "sample data",
                "test data",
                "mock data",
                "dummy data",
                "fake data",
                "simulated data",
                "insert text here",
                "to be determined",
            ]),
            placeholder_values: strings(&[
                "n/a", "na", "tbd", "todo", "null", "none", "undefined", "...", "-",
            ]),
            min_content_length: 10,
            verified_credibility_threshold: 80.0,
            allowed_schemes: strings(&["https", "http"]),
        }
    }
}

impl ValidationConfig {
    /// Strict preset: HTTPS only, longer content, higher bar for VERIFIED
    pub fn strict() -> Self {
        Self {
            min_content_length: 40,
            verified_credibility_threshold: 90.0,
            allowed_schemes: strings(&["https"]),
            ..Self::default()
        }
    }

    /// Lenient preset: short snippets allowed, lower bar for VERIFIED
    ///
    /// The exclusion and placeholder lists are kept; they are never relaxed.
    pub fn lenient() -> Self {
        Self {
            min_content_length: 1,
            verified_credibility_threshold: 70.0,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.verified_credibility_threshold) {
            return Err(format!(
                "verified_credibility_threshold {} outside [0, 100]",
                self.verified_credibility_threshold
            ));
        }
        if self.allowed_schemes.is_empty() {
            return Err("allowed_schemes must not be empty".to_string());
        }
        if self.excluded_domains.iter().any(|d| d.trim().is_empty()) {
            return Err("excluded_domains must not contain empty entries".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ValidationConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.excluded_domains.contains(&"example.com".to_string()));
        assert_eq!(config.verified_credibility_threshold, 80.0);
    }

    #[test]
    fn test_strict_config() {
        let config = ValidationConfig::strict();
        assert!(config.validate().is_ok());
        assert_eq!(config.allowed_schemes, vec!["https".to_string()]);
        assert_eq!(config.verified_credibility_threshold, 90.0);
    }

    #[test]
    fn test_lenient_keeps_exclusions() {
        let config = ValidationConfig::lenient();
        assert_eq!(config.excluded_domains, ValidationConfig::default().excluded_domains);
        assert_eq!(config.min_content_length, 1);
    }

    #[test]
    fn test_invalid_threshold() {
        let mut config = ValidationConfig::default();
        config.verified_credibility_threshold = 120.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_schemes_invalid() {
        let mut config = ValidationConfig::default();
        config.allowed_schemes.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ValidationConfig::from_toml("min_content_length = 25").unwrap();
        assert_eq!(config.min_content_length, 25);
        assert_eq!(config.excluded_domains, ValidationConfig::default().excluded_domains);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ValidationConfig::strict();
        let toml_str = config.to_toml().unwrap();
        let parsed = ValidationConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
