use super::endpoint;
use super::traits::{
    text_or_sentinel, DrugSource, PharmacologyInfo, SourceError, SourceId, SourcePayload,
};
use crate::client::{DrugQuery, SourceHttpClient};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

const MAX_TARGETS: usize = 3;
const MAX_INDICATIONS: usize = 2;

/// One hit from the name search; only the identifier matters
#[derive(Debug, Deserialize)]
struct DrugHit {
    drugbank_id: Option<String>,
}

/// Drug detail record
#[derive(Debug, Default, Deserialize)]
struct DrugDetail {
    mechanism_of_action: Option<String>,
    #[serde(default)]
    targets: Vec<NamedEntry>,
    #[serde(default)]
    indications: Vec<NamedEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct NamedEntry {
    name: Option<String>,
}

/// Pharmacology data via a DrugBank-style two-step lookup
///
/// The name search resolves a DrugBank id, which is then used to fetch the
/// drug record. The detail request is only issued when the search matched.
pub struct DrugBankSource {
    http: SourceHttpClient,
    base_url: String,
}

impl DrugBankSource {
    pub fn new(http: SourceHttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn resolve_id(&self, query: &DrugQuery) -> Result<String, SourceError> {
        let mut url = endpoint(&self.base_url, "drugs")?;
        url.query_pairs_mut().append_pair("q", query.as_str());

        let hits: Vec<DrugHit> = self.http.get_json(SourceId::DrugBank.display_name(), url).await?;

        hits.into_iter()
            .find_map(|hit| hit.drugbank_id.filter(|id| !id.trim().is_empty()))
            .ok_or_else(|| SourceError::NoMatch(format!("No DrugBank match found for '{query}'")))
    }

    fn summarize(detail: DrugDetail) -> PharmacologyInfo {
        let names = |entries: Vec<NamedEntry>, limit: usize| -> Vec<String> {
            entries
                .into_iter()
                .filter_map(|entry| entry.name)
                .filter(|name| !name.trim().is_empty())
                .take(limit)
                .collect()
        };

        PharmacologyInfo {
            mechanism: text_or_sentinel(detail.mechanism_of_action),
            targets: names(detail.targets, MAX_TARGETS),
            indications: names(detail.indications, MAX_INDICATIONS),
        }
    }
}

#[async_trait]
impl DrugSource for DrugBankSource {
    fn id(&self) -> SourceId {
        SourceId::DrugBank
    }

    async fn fetch(&self, query: &DrugQuery) -> Result<SourcePayload, SourceError> {
        let drugbank_id = self.resolve_id(query).await?;
        debug!("Resolved {} to DrugBank id {}", query, drugbank_id);

        let url = endpoint(&self.base_url, &format!("drugs/{}", urlencoding::encode(drugbank_id.trim())))?;
        let detail: DrugDetail = self.http.get_json(SourceId::DrugBank.display_name(), url).await?;

        Ok(SourcePayload::Pharmacology(Self::summarize(detail)))
    }
}
