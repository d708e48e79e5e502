//! Investigation topics selected from claim text

use serde::{Deserialize, Serialize};
use std::fmt;

/// A sub-query topic derived from a claim (e.g. "inflation", "labor_market")
///
/// Connectors use topics to decide which series or search terms to fetch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Catch-all topic used when nothing more specific applies
    pub const GENERAL: &'static str = "general";

    /// Create a topic; names are normalised to lowercase
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_lowercase())
    }

    /// The catch-all topic
    pub fn general() -> Self {
        Self::new(Self::GENERAL)
    }

    /// Topic name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
