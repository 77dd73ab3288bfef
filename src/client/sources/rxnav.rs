use super::traits::{DrugSource, SourceError, SourceId, SourcePayload, NOT_AVAILABLE};
use super::endpoint;
use crate::client::{DrugQuery, SourceHttpClient};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// `drugs.json` response envelope
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DrugsResponse {
    #[serde(default)]
    drug_group: DrugGroup,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DrugGroup {
    #[serde(default)]
    concept_group: Vec<ConceptGroup>,
}

/// One term type (SBD, SCD, BPCK...) and its concepts
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConceptGroup {
    #[serde(default)]
    concept_properties: Vec<ConceptProperty>,
}

#[derive(Debug, Default, Deserialize)]
struct ConceptProperty {
    name: Option<String>,
    rxcui: Option<String>,
}

/// RxNav (NLM) concept lookup by drug name
pub struct RxNavSource {
    http: SourceHttpClient,
    base_url: String,
}

impl RxNavSource {
    pub fn new(http: SourceHttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Flatten every concept group into `"name (RxCUI: id)"` lines
    fn flatten(response: DrugsResponse) -> Vec<String> {
        response
            .drug_group
            .concept_group
            .into_iter()
            .flat_map(|group| group.concept_properties)
            .map(|concept| {
                format!(
                    "{} (RxCUI: {})",
                    concept.name.as_deref().unwrap_or(NOT_AVAILABLE),
                    concept.rxcui.as_deref().unwrap_or("N/A")
                )
            })
            .collect()
    }
}

#[async_trait]
impl DrugSource for RxNavSource {
    fn id(&self) -> SourceId {
        SourceId::RxNav
    }

    async fn fetch(&self, query: &DrugQuery) -> Result<SourcePayload, SourceError> {
        let mut url = endpoint(&self.base_url, "drugs.json")?;
        url.query_pairs_mut().append_pair("name", query.as_str());

        let response: DrugsResponse = self.http.get_json(SourceId::RxNav.display_name(), url).await?;
        let identifiers = Self::flatten(response);
        debug!("RxNav returned {} concepts for {}", identifiers.len(), query);

        Ok(SourcePayload::Identifiers(identifiers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_skips_groups_without_properties() {
        let response: DrugsResponse = serde_json::from_value(serde_json::json!({
            "drugGroup": {
                "name": null,
                "conceptGroup": [
                    {"tty": "BPCK"},
                    {"tty": "SBD", "conceptProperties": [
                        {"rxcui": "310965", "name": "ibuprofen 200 MG Oral Tablet", "tty": "SBD"}
                    ]}
                ]
            }
        }))
        .unwrap();

        assert_eq!(
            RxNavSource::flatten(response),
            vec!["ibuprofen 200 MG Oral Tablet (RxCUI: 310965)".to_string()]
        );
    }

    #[test]
    fn test_flatten_empty_group_is_empty_list() {
        let response: DrugsResponse =
            serde_json::from_value(serde_json::json!({"drugGroup": {"name": null}})).unwrap();
        assert!(RxNavSource::flatten(response).is_empty());

        let response: DrugsResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(RxNavSource::flatten(response).is_empty());
    }

    #[test]
    fn test_flatten_missing_fields_use_placeholders() {
        let response: DrugsResponse = serde_json::from_value(serde_json::json!({
            "drugGroup": {"conceptGroup": [{"conceptProperties": [{"tty": "SCD"}]}]}
        }))
        .unwrap();
        assert_eq!(
            RxNavSource::flatten(response),
            vec!["Not available (RxCUI: N/A)".to_string()]
        );
    }
}
