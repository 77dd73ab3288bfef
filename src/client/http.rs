use super::sources::SourceError;
use super::HttpClientConfig;
use crate::Result;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};
use url::Url;

/// Longest upstream error body kept in a failure message
const MAX_ERROR_BODY: usize = 200;

/// Thin JSON-over-HTTP wrapper shared by every source adapter
///
/// Owns the single `reqwest::Client` (and its connection pool) so that all
/// adapters share the same timeout and user agent.
#[derive(Debug, Clone)]
pub struct SourceHttpClient {
    client: Client,
}

impl SourceHttpClient {
    /// Build the shared client from configuration
    pub fn new(config: &HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` and decode the body as `T`; any non-2xx status is an error
    pub async fn get_json<T: DeserializeOwned>(&self, source: &str, url: Url) -> std::result::Result<T, SourceError> {
        match self.fetch(source, url).await? {
            (status, body) if status.is_success() => decode(source, &body),
            (status, body) => Err(status_error(status, &body)),
        }
    }

    /// Like [`Self::get_json`], but maps an API-level "no matches" 404 to `Ok(None)`
    ///
    /// Some upstreams (openFDA) answer a query without matches with a 404 whose
    /// JSON body is `{"error": {"code": "NOT_FOUND", ..}}`. Any other 404, such
    /// as a wrong base path or a gateway page, stays a status error.
    pub async fn get_json_or_none<T: DeserializeOwned>(
        &self,
        source: &str,
        url: Url,
    ) -> std::result::Result<Option<T>, SourceError> {
        match self.fetch(source, url).await? {
            (StatusCode::NOT_FOUND, body) if is_no_match_body(&body) => Ok(None),
            (status, body) if status.is_success() => decode(source, &body).map(Some),
            (status, body) => Err(status_error(status, &body)),
        }
    }

    async fn fetch(&self, source: &str, url: Url) -> std::result::Result<(StatusCode, String), SourceError> {
        debug!("{} request URL: {}", source, url);

        let response = self.client.get(url).send().await.map_err(|e| {
            error!("{} request failed: {}", source, e);
            if e.is_timeout() {
                SourceError::Timeout
            } else if e.is_connect() {
                SourceError::Network(format!("Connection failed: {e}"))
            } else {
                SourceError::Network(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout
            } else {
                SourceError::Network(format!("Failed to read response: {e}"))
            }
        })?;

        debug!("{} responded with {} ({} bytes)", source, status, body.len());
        Ok((status, body))
    }
}

fn decode<T: DeserializeOwned>(source: &str, body: &str) -> std::result::Result<T, SourceError> {
    serde_json::from_str(body).map_err(|e| {
        debug!("Failed to parse {} response: {}", source, body);
        SourceError::Parse(format!("Failed to parse JSON: {e}"))
    })
}

/// Error envelope used by openFDA-style APIs
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    code: String,
}

fn is_no_match_body(body: &str) -> bool {
    serde_json::from_str::<ErrorEnvelope>(body).is_ok_and(|envelope| envelope.error.code == "NOT_FOUND")
}

fn status_error(status: StatusCode, body: &str) -> SourceError {
    let mut message: String = body.trim().chars().take(MAX_ERROR_BODY).collect();
    if message.is_empty() {
        message = status.canonical_reason().unwrap_or("unknown status").to_string();
    }
    SourceError::Status {
        code: status.as_u16(),
        message,
    }
}
