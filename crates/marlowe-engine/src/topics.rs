//! Topic selection
//!
//! Chooses sub-query topics from claim text. The engine only needs a
//! [`TopicSelector`]; [`KeywordTopicSelector`] is the built-in strategy and
//! any `Fn(&str) -> BTreeSet<Topic>` closure works too.

use marlowe_domain::Topic;
use std::collections::BTreeSet;

/// Strategy mapping claim text to topics
pub trait TopicSelector: Send + Sync {
    /// Topics for `claim_text`; implementations return at least one topic
    fn select(&self, claim_text: &str) -> BTreeSet<Topic>;
}

impl<F> TopicSelector for F
where
    F: Fn(&str) -> BTreeSet<Topic> + Send + Sync,
{
    fn select(&self, claim_text: &str) -> BTreeSet<Topic> {
        self(claim_text)
    }
}

/// Keyword-driven topic selection
///
/// Single-word keywords match whole words; keywords containing a space
/// match as substrings. Falls back to the general topic when nothing
/// matches.
#[derive(Debug, Clone)]
pub struct KeywordTopicSelector {
    rules: Vec<(Topic, Vec<String>)>,
}

impl KeywordTopicSelector {
    /// Selector with no rules (always general)
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a topic and its keywords
    pub fn with_rule(mut self, topic: impl AsRef<str>, keywords: &[&str]) -> Self {
        self.rules.push((
            Topic::new(topic),
            keywords.iter().map(|k| k.to_lowercase()).collect(),
        ));
        self
    }

    fn words(text: &str) -> BTreeSet<String> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '&'))
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for KeywordTopicSelector {
    fn default() -> Self {
        Self::empty()
            .with_rule(
                "labor_market",
                &["unemployment", "jobless", "payroll", "payrolls", "jobs", "employment", "labor", "labour", "wages"],
            )
            .with_rule(
                "inflation",
                &["inflation", "cpi", "pce", "prices", "consumer price", "deflation"],
            )
            .with_rule(
                "economic_growth",
                &["gdp", "growth", "recession", "economy", "gross domestic product"],
            )
            .with_rule(
                "interest_rates",
                &["rates", "fed", "fomc", "yield", "yields", "interest rate", "federal reserve", "federal funds"],
            )
            .with_rule(
                "equity_markets",
                &["stock", "stocks", "equity", "equities", "s&p", "nasdaq", "dow", "shares"],
            )
    }
}

impl TopicSelector for KeywordTopicSelector {
    fn select(&self, claim_text: &str) -> BTreeSet<Topic> {
        let lowered = claim_text.to_lowercase();
        let words = Self::words(&lowered);

        let mut topics: BTreeSet<Topic> = self
            .rules
            .iter()
            .filter(|(_, keywords)| {
                keywords.iter().any(|k| {
                    if k.contains(' ') {
                        lowered.contains(k.as_str())
                    } else {
                        words.contains(k)
                    }
                })
            })
            .map(|(topic, _)| topic.clone())
            .collect();

        if topics.is_empty() {
            topics.insert(Topic::general());
        }
        topics
    }
}
