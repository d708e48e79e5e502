//! Indicator extraction
//!
//! Pulls named figures (unemployment rate, CPI, GDP growth...) out of
//! admitted evidence text. Patterns are regular expressions with a named
//! `value` group; the first evidence item that matches a pattern supplies
//! that indicator's reading.

use crate::error::EngineError;
use marlowe_domain::{IndicatorReading, SourceEvidence};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A named indicator and the pattern that reads it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorPattern {
    /// Indicator name shown in reasoning
    pub name: String,

    /// Regular expression with a `value` capture group
    pub pattern: String,
}

impl IndicatorPattern {
    /// Create a new pattern
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }

    /// Built-in economic and market indicators
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(
                "unemployment rate",
                r"(?i)unemployment rate[^0-9%]{0,40}(?P<value>\d+(?:\.\d+)?\s?(?:%|percent))",
            ),
            Self::new(
                "inflation rate",
                r"(?i)(?:inflation|cpi|consumer price index)[^0-9%]{0,40}(?P<value>\d+(?:\.\d+)?\s?(?:%|percent))",
            ),
            Self::new(
                "gdp growth",
                r"(?i)(?:gdp|gross domestic product)[^0-9%]{0,40}(?P<value>-?\d+(?:\.\d+)?\s?(?:%|percent))",
            ),
            Self::new(
                "interest rate",
                r"(?i)(?:federal funds rate|fed funds|interest rate)[^0-9%]{0,40}(?P<value>\d+(?:\.\d+)?(?:\s?-\s?\d+(?:\.\d+)?)?\s?(?:%|percent))",
            ),
            Self::new(
                "s&p 500",
                r"(?i)s&p 500[^0-9]{0,40}(?P<value>\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d{4,}(?:\.\d+)?)",
            ),
        ]
    }

    /// Compile the pattern, checking it has a `value` group
    pub fn compile(&self) -> Result<Regex, String> {
        let regex = Regex::new(&self.pattern)
            .map_err(|e| format!("indicator '{}': {}", self.name, e))?;
        if !regex.capture_names().flatten().any(|n| n == "value") {
            return Err(format!("indicator '{}': pattern has no 'value' group", self.name));
        }
        Ok(regex)
    }
}

/// Compiled indicator patterns
#[derive(Debug, Clone)]
pub struct IndicatorExtractor {
    patterns: Vec<(String, Regex)>,
}

impl IndicatorExtractor {
    /// Compile a set of patterns
    pub fn new(patterns: &[IndicatorPattern]) -> Result<Self, EngineError> {
        let patterns = patterns
            .iter()
            .map(|p| p.compile().map(|regex| (p.name.clone(), regex)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(EngineError::Config)?;
        Ok(Self { patterns })
    }

    /// Read indicators from evidence, in pattern order
    ///
    /// Each indicator is read at most once, from the first matching item.
    pub fn extract(&self, evidence: &[SourceEvidence]) -> Vec<IndicatorReading> {
        self.patterns
            .iter()
            .filter_map(|(name, regex)| {
                evidence.iter().find_map(|item| {
                    let captures = regex.captures(&item.candidate.content)?;
                    let value = captures.name("value")?.as_str().trim();
                    Some(IndicatorReading {
                        indicator: name.clone(),
                        value: value.to_string(),
                        provider: item.provider.clone(),
                        url: item.candidate.url.clone(),
                    })
                })
            })
            .collect()
    }

    /// Number of compiled patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether no patterns are configured
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
