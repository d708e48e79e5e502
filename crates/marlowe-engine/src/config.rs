//! Configuration for the investigation engine

use crate::indicators::IndicatorPattern;
use marlowe_validator::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Configuration for the investigation engine
///
/// Penalties are additive confidence points deducted when a provider yields
/// no admissible evidence. They are policy, not measured quantities.
///
/// # Examples
///
/// ```
/// use marlowe_engine::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.penalty_for("economic_data"), 25.0);
/// assert_eq!(config.penalty_for("web_search"), 30.0);
/// assert_eq!(config.penalty_for("unlisted"), 20.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Time budget for a single connector call (milliseconds)
    pub connector_timeout_ms: u64,

    /// Maximum audit entries retained before the oldest are evicted
    pub audit_capacity: usize,

    /// Penalty for providers missing from `penalties`
    pub default_penalty: f64,

    /// Per-provider penalty table
    pub penalties: BTreeMap<String, f64>,

    /// Indicator patterns matched against admitted evidence
    pub indicators: Vec<IndicatorPattern>,

    /// Authenticity validation settings
    pub validation: ValidationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let penalties = [
            ("economic_data", 25.0),
            ("web_search", 30.0),
            ("market_data", 20.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            connector_timeout_ms: 15_000,
            audit_capacity: 10_000,
            default_penalty: 20.0,
            penalties,
            indicators: IndicatorPattern::defaults(),
            validation: ValidationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Strict preset: short timeouts and strict validation
    pub fn strict() -> Self {
        Self {
            connector_timeout_ms: 5_000,
            validation: ValidationConfig::strict(),
            ..Self::default()
        }
    }

    /// Lenient preset: long timeouts and lenient validation
    pub fn lenient() -> Self {
        Self {
            connector_timeout_ms: 60_000,
            validation: ValidationConfig::lenient(),
            ..Self::default()
        }
    }

    /// Connector timeout as a Duration
    pub fn connector_timeout(&self) -> Duration {
        Duration::from_millis(self.connector_timeout_ms)
    }

    /// Penalty applied when `provider` yields no admissible evidence
    pub fn penalty_for(&self, provider: &str) -> f64 {
        self.penalties
            .get(provider)
            .copied()
            .unwrap_or(self.default_penalty)
    }

    /// Set one provider's penalty
    pub fn with_penalty(mut self, provider: impl Into<String>, penalty: f64) -> Self {
        self.penalties.insert(provider.into(), penalty);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.connector_timeout_ms == 0 {
            return Err("connector_timeout_ms must be greater than 0".to_string());
        }
        if self.audit_capacity == 0 {
            return Err("audit_capacity must be greater than 0".to_string());
        }
        let check_penalty = |name: &str, value: f64| {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                Err(format!("penalty for {} ({}) outside [0, 100]", name, value))
            } else {
                Ok(())
            }
        };
        check_penalty("default", self.default_penalty)?;
        for (provider, penalty) in &self.penalties {
            check_penalty(provider, *penalty)?;
        }
        for pattern in &self.indicators {
            pattern.compile()?;
        }
        self.validation.validate()
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
