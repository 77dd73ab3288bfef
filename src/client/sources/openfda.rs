use super::endpoint;
use super::traits::{text_or_sentinel, DrugSource, LabelInfo, SourceError, SourceId, SourcePayload};
use crate::client::{DrugQuery, SourceHttpClient};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// `drug/label.json` response; `results` is absent on some error bodies
#[derive(Debug, Default, Deserialize)]
struct LabelResponse {
    #[serde(default)]
    results: Vec<LabelRecord>,
}

/// The label sections we surface; each is an array of paragraphs
#[derive(Debug, Default, Deserialize)]
struct LabelRecord {
    #[serde(default)]
    indications_and_usage: Vec<String>,
    #[serde(default)]
    warnings: Vec<String>,
    #[serde(default)]
    adverse_reactions: Vec<String>,
}

/// openFDA drug label search by generic name
pub struct OpenFdaSource {
    http: SourceHttpClient,
    base_url: String,
}

impl OpenFdaSource {
    pub fn new(http: SourceHttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn search_expression(query: &DrugQuery) -> String {
        format!("openfda.generic_name:\"{}\"", query.lowercase())
    }

    fn to_label(record: LabelRecord) -> LabelInfo {
        LabelInfo {
            uses: text_or_sentinel(record.indications_and_usage.into_iter().next()),
            warnings: text_or_sentinel(record.warnings.into_iter().next()),
            side_effects: text_or_sentinel(record.adverse_reactions.into_iter().next()),
        }
    }
}

#[async_trait]
impl DrugSource for OpenFdaSource {
    fn id(&self) -> SourceId {
        SourceId::OpenFda
    }

    async fn fetch(&self, query: &DrugQuery) -> Result<SourcePayload, SourceError> {
        let mut url = endpoint(&self.base_url, "drug/label.json")?;
        url.query_pairs_mut()
            .append_pair("search", &Self::search_expression(query))
            .append_pair("limit", "1");

        // openFDA reports "no matches" as a 404 with a NOT_FOUND error body
        let response: Option<LabelResponse> = self
            .http
            .get_json_or_none(SourceId::OpenFda.display_name(), url)
            .await?;

        let record = response
            .and_then(|r| r.results.into_iter().next())
            .ok_or_else(|| SourceError::NoMatch(format!("No FDA label data found for '{query}'")))?;

        debug!("openFDA label found for {}", query);
        Ok(SourcePayload::Label(Self::to_label(record)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::sources::NOT_AVAILABLE;

    #[test]
    fn test_search_expression_lowercases() {
        let query = DrugQuery::new("IBUPROFEN").unwrap();
        assert_eq!(
            OpenFdaSource::search_expression(&query),
            "openfda.generic_name:\"ibuprofen\""
        );
    }

    #[test]
    fn test_missing_sections_use_sentinel() {
        let record: LabelRecord = serde_json::from_value(serde_json::json!({
            "indications_and_usage": ["Temporarily relieves minor aches and pains"],
            "effective_time": "20240101"
        }))
        .unwrap();

        let label = OpenFdaSource::to_label(record);
        assert_eq!(label.uses, "Temporarily relieves minor aches and pains");
        assert_eq!(label.warnings, NOT_AVAILABLE);
        assert_eq!(label.side_effects, NOT_AVAILABLE);
    }
}
