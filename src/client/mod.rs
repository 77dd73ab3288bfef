pub mod aggregator;
pub mod http;
pub mod references;
pub mod sources;

pub use aggregator::{AggregatorConfig, DrugInfoAggregator, ResultBundle};
pub use http::SourceHttpClient;
pub use references::{reference_links, ReferenceLink};

use crate::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-request timeout applied to every upstream call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client configuration for the upstream drug data sources
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout duration
    pub timeout: Duration,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: REQUEST_TIMEOUT,
            connect_timeout: Duration::from_secs(5),
            user_agent: format!("drug-info-hub/{} (Drug Information Aggregator)", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Drug name wrapper; guaranteed non-empty and trimmed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DrugQuery(String);

impl DrugQuery {
    /// Create a new query from user input, rejecting blank names
    pub fn new(name: &str) -> Result<Self> {
        let cleaned = name.trim();

        if cleaned.is_empty() {
            return Err(crate::Error::invalid_input("query", "drug name cannot be empty"));
        }

        Ok(Self(cleaned.to_string()))
    }

    /// Get the query as entered (trimmed)
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased form for sources that match case-sensitively
    #[must_use]
    pub fn lowercase(&self) -> String {
        self.0.to_lowercase()
    }

    /// Percent-encoded form for URL templates
    #[must_use]
    pub fn url_encoded(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl std::fmt::Display for DrugQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DrugQuery {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for DrugQuery {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<DrugQuery> for String {
    fn from(query: DrugQuery) -> Self {
        query.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_trims_input() {
        let query = DrugQuery::new("  Ibuprofen \n").unwrap();
        assert_eq!(query.as_str(), "Ibuprofen");
        assert_eq!(query.lowercase(), "ibuprofen");
    }

    #[test]
    fn test_query_rejects_blank() {
        assert!(matches!(
            DrugQuery::new("   "),
            Err(crate::Error::InvalidInput { .. })
        ));
        assert!("".parse::<DrugQuery>().is_err());
    }

    #[test]
    fn test_query_url_encoding() {
        let query = DrugQuery::new("acetylsalicylic acid").unwrap();
        assert_eq!(query.url_encoded(), "acetylsalicylic%20acid");
    }

    #[test]
    fn test_default_timeout_is_ten_seconds() {
        assert_eq!(HttpClientConfig::default().timeout, Duration::from_secs(10));
    }
}
