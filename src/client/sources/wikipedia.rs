use super::endpoint;
use super::traits::{text_or_sentinel, DrugSource, SourceError, SourceId, SourcePayload};
use crate::client::{DrugQuery, SourceHttpClient};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Failure text when the search finds nothing
pub const NO_PAGE_FOUND: &str = "No Wikipedia page found";

/// Number of sentences requested for the summary
const SUMMARY_SENTENCES: u8 = 3;

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: SearchQueryBlock,
}

#[derive(Debug, Default, Deserialize)]
struct SearchQueryBlock {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    query: ExtractQueryBlock,
}

#[derive(Debug, Default, Deserialize)]
struct ExtractQueryBlock {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    extract: Option<String>,
}

/// Wikipedia summary via the MediaWiki action API
///
/// Searches for the drug name, takes the top hit and fetches a plain-text
/// intro of it. Disambiguation is not attempted: the first result wins.
pub struct WikipediaSource {
    http: SourceHttpClient,
    api_url: String,
}

impl WikipediaSource {
    pub fn new(http: SourceHttpClient, api_url: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
        }
    }

    async fn top_title(&self, query: &DrugQuery) -> Result<String, SourceError> {
        let mut url = endpoint(&self.api_url, "")?;
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("list", "search")
            .append_pair("srsearch", query.as_str())
            .append_pair("srlimit", "1")
            .append_pair("format", "json")
            .append_pair("formatversion", "2");

        let response: SearchResponse = self.http.get_json(SourceId::Wikipedia.display_name(), url).await?;

        response
            .query
            .search
            .into_iter()
            .find_map(|hit| hit.title)
            .ok_or_else(|| SourceError::NoMatch(NO_PAGE_FOUND.to_string()))
    }

    async fn summary(&self, title: &str) -> Result<String, SourceError> {
        let mut url = endpoint(&self.api_url, "")?;
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("prop", "extracts")
            .append_pair("exintro", "1")
            .append_pair("explaintext", "1")
            .append_pair("exsentences", &SUMMARY_SENTENCES.to_string())
            .append_pair("redirects", "1")
            .append_pair("titles", title)
            .append_pair("format", "json")
            .append_pair("formatversion", "2");

        let response: ExtractResponse = self.http.get_json(SourceId::Wikipedia.display_name(), url).await?;
        let extract = response.query.pages.into_iter().find_map(|page| page.extract);

        Ok(text_or_sentinel(extract))
    }
}

#[async_trait]
impl DrugSource for WikipediaSource {
    fn id(&self) -> SourceId {
        SourceId::Wikipedia
    }

    async fn fetch(&self, query: &DrugQuery) -> Result<SourcePayload, SourceError> {
        let title = self.top_title(query).await?;
        debug!("Wikipedia top hit for {}: {}", query, title);

        Ok(SourcePayload::Summary(self.summary(&title).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_without_hits() {
        let response: SearchResponse = serde_json::from_value(serde_json::json!({
            "batchcomplete": true,
            "query": {"searchinfo": {"totalhits": 0}, "search": []}
        }))
        .unwrap();
        assert!(response.query.search.is_empty());
    }

    #[test]
    fn test_extract_response_missing_page() {
        let response: ExtractResponse = serde_json::from_value(serde_json::json!({
            "query": {"pages": [{"title": "Ibuprofen", "missing": true}]}
        }))
        .unwrap();
        assert!(response.query.pages[0].extract.is_none());
    }
}
