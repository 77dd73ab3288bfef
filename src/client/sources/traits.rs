use crate::client::DrugQuery;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Sentinel substituted for a text field the upstream did not return
pub const NOT_AVAILABLE: &str = "Not available";

/// Identity of each upstream source, in fixed dispatch order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    /// RxNav concept lookup (identifier lookup)
    #[serde(rename = "rxnav")]
    RxNav,
    /// openFDA drug labels (label data)
    OpenFda,
    /// DrugBank-style pharmacology records
    DrugBank,
    /// Wikipedia summary (encyclopedic)
    Wikipedia,
    /// DailyMed structured product labels
    DailyMed,
    /// ChEMBL molecules (bioactivity)
    Chembl,
}

impl SourceId {
    /// Every source, in dispatch order
    pub const ALL: [Self; 6] = [
        Self::RxNav,
        Self::OpenFda,
        Self::DrugBank,
        Self::Wikipedia,
        Self::DailyMed,
        Self::Chembl,
    ];

    /// Name shown to users and used in failure messages
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::RxNav => "RxNav",
            Self::OpenFda => "openFDA",
            Self::DrugBank => "DrugBank",
            Self::Wikipedia => "Wikipedia",
            Self::DailyMed => "DailyMed",
            Self::Chembl => "ChEMBL",
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Drug label sections from openFDA
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelInfo {
    pub uses: String,
    pub warnings: String,
    pub side_effects: String,
}

/// Pharmacology summary from the two-step DrugBank lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PharmacologyInfo {
    pub mechanism: String,
    /// At most three target names
    pub targets: Vec<String>,
    /// At most two indications
    pub indications: Vec<String>,
}

/// A structured product label entry from DailyMed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLabel {
    pub title: String,
    /// Detail page; `None` for the "no records" sentinel
    pub url: Option<String>,
}

/// A ChEMBL molecule hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compound {
    pub name: String,
    pub chembl_id: String,
    pub molecule_type: String,
}

/// Normalized payload, one variant per source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SourcePayload {
    Identifiers(Vec<String>),
    Label(LabelInfo),
    Pharmacology(PharmacologyInfo),
    Summary(String),
    ProductLabels(Vec<ProductLabel>),
    Bioactivity(Vec<Compound>),
}

/// Outcome of one source lookup
///
/// A failure carries only its message, a success only its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum SourceResult {
    Success(SourcePayload),
    Failure(String),
}

impl SourceResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub const fn payload(&self) -> Option<&SourcePayload> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Failure(_) => None,
        }
    }

    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(message) => Some(message),
        }
    }
}

/// Errors that can occur inside a source adapter
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    /// A documented hard "no match" condition; the text is shown verbatim
    #[error("{0}")]
    NoMatch(String),

    #[error("{0}")]
    Other(String),
}

impl SourceError {
    /// User-facing failure text for `source`
    #[must_use]
    pub fn failure_message(&self, source: SourceId) -> String {
        match self {
            Self::NoMatch(message) => message.clone(),
            other => format!("{source} error: {other}"),
        }
    }
}

/// Trait for drug information sources
#[async_trait]
pub trait DrugSource: Send + Sync {
    /// Which source this adapter talks to
    fn id(&self) -> SourceId;

    /// Query the upstream and normalize its response
    async fn fetch(&self, query: &DrugQuery) -> Result<SourcePayload, SourceError>;

    /// Run [`Self::fetch`] and fold any error into a [`SourceResult::Failure`]
    async fn lookup(&self, query: &DrugQuery) -> SourceResult {
        let source = self.id();
        info!("Querying {} for: {}", source, query);

        match self.fetch(query).await {
            Ok(payload) => SourceResult::Success(payload),
            Err(e) => {
                warn!("{} lookup for '{}' failed: {}", source, query, e);
                SourceResult::Failure(e.failure_message(source))
            }
        }
    }
}

/// Fall back to [`NOT_AVAILABLE`] for a missing or blank text field
pub(crate) fn text_or_sentinel(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_prefixes_source() {
        let err = SourceError::Status {
            code: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.failure_message(SourceId::Chembl), "ChEMBL error: HTTP 500: boom");
        assert_eq!(
            SourceError::Timeout.failure_message(SourceId::RxNav),
            "RxNav error: Request timed out"
        );
    }

    #[test]
    fn test_no_match_message_is_verbatim() {
        let err = SourceError::NoMatch("No Wikipedia page found".to_string());
        assert_eq!(err.failure_message(SourceId::Wikipedia), "No Wikipedia page found");
    }

    #[test]
    fn test_source_order_is_fixed() {
        let mut shuffled = vec![SourceId::Chembl, SourceId::RxNav, SourceId::Wikipedia];
        shuffled.sort();
        assert_eq!(shuffled, vec![SourceId::RxNav, SourceId::Wikipedia, SourceId::Chembl]);
    }

    #[test]
    fn test_source_id_json_names() {
        assert_eq!(serde_json::to_value(SourceId::RxNav).unwrap(), "rxnav");
        assert_eq!(serde_json::to_value(SourceId::Chembl).unwrap(), "chembl");
        let parsed: SourceId = serde_json::from_str("\"rxnav\"").unwrap();
        assert_eq!(parsed, SourceId::RxNav);
    }

    #[test]
    fn test_text_or_sentinel() {
        assert_eq!(text_or_sentinel(None), NOT_AVAILABLE);
        assert_eq!(text_or_sentinel(Some("  ".to_string())), NOT_AVAILABLE);
        assert_eq!(text_or_sentinel(Some(" Pain relief ".to_string())), "Pain relief");
    }

    #[test]
    fn test_result_serialization_shape() {
        let failure = SourceResult::Failure("openFDA error: Request timed out".to_string());
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["data"], "openFDA error: Request timed out");

        let success = SourceResult::Success(SourcePayload::Summary("Ibuprofen is an NSAID.".to_string()));
        let json = serde_json::to_value(&success).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["kind"], "summary");
    }
}
