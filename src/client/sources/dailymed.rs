use super::endpoint;
use super::traits::{DrugSource, ProductLabel, SourceError, SourceId, SourcePayload};
use crate::client::{DrugQuery, SourceHttpClient};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Title of the single entry returned when DailyMed has no labels
pub const NO_DAILYMED_RECORDS: &str = "No DailyMed records found";

const PAGE_SIZE: usize = 2;

#[derive(Debug, Default, Deserialize)]
struct SplListResponse {
    #[serde(default)]
    data: Vec<SplEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct SplEntry {
    title: Option<String>,
    setid: Option<String>,
}

/// DailyMed structured product labels (SPL)
pub struct DailyMedSource {
    http: SourceHttpClient,
    api_url: String,
    site_url: String,
}

impl DailyMedSource {
    /// `api_url` serves `spls.json`; `site_url` hosts the human-readable pages
    pub fn new(http: SourceHttpClient, api_url: impl Into<String>, site_url: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            site_url: site_url.into(),
        }
    }

    fn detail_url(&self, setid: &str) -> String {
        format!(
            "{}/drugInfo.cfm?setid={}",
            self.site_url.trim_end_matches('/'),
            urlencoding::encode(setid)
        )
    }

    fn to_labels(&self, response: SplListResponse) -> Vec<ProductLabel> {
        let labels: Vec<ProductLabel> = response
            .data
            .into_iter()
            .take(PAGE_SIZE)
            .map(|entry| ProductLabel {
                title: entry
                    .title
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| "Untitled label".to_string()),
                url: entry
                    .setid
                    .filter(|id| !id.trim().is_empty())
                    .map(|id| self.detail_url(id.trim())),
            })
            .collect();

        if labels.is_empty() {
            vec![ProductLabel {
                title: NO_DAILYMED_RECORDS.to_string(),
                url: None,
            }]
        } else {
            labels
        }
    }
}

#[async_trait]
impl DrugSource for DailyMedSource {
    fn id(&self) -> SourceId {
        SourceId::DailyMed
    }

    async fn fetch(&self, query: &DrugQuery) -> Result<SourcePayload, SourceError> {
        let mut url = endpoint(&self.api_url, "spls.json")?;
        url.query_pairs_mut()
            .append_pair("drug_name", query.as_str())
            .append_pair("pagesize", &PAGE_SIZE.to_string());

        let response: SplListResponse = self.http.get_json(SourceId::DailyMed.display_name(), url).await?;
        debug!("DailyMed returned {} labels for {}", response.data.len(), query);

        Ok(SourcePayload::ProductLabels(self.to_labels(response)))
    }
}
