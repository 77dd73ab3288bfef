#![allow(dead_code)]

use drug_info_hub::client::{HttpClientConfig, SourceHttpClient};
use drug_info_hub::config::SourcesConfig;
use drug_info_hub::Config;
use wiremock::MockServer;

pub const DAILYMED_SITE: &str = "https://dailymed.example.org/dailymed";

/// Point every source at the mock server, each under its own path prefix
pub fn sources_for(server: &MockServer) -> SourcesConfig {
    let uri = server.uri();
    SourcesConfig {
        rxnav_url: format!("{uri}/REST"),
        openfda_url: format!("{uri}/openfda"),
        drugbank_url: format!("{uri}/drugbank"),
        wikipedia_api_url: format!("{uri}/w/api.php"),
        dailymed_api_url: format!("{uri}/dailymed/services/v2"),
        dailymed_site_url: DAILYMED_SITE.to_string(),
        chembl_url: format!("{uri}/chembl/api/data"),
    }
}

pub fn config_for(server: &MockServer) -> Config {
    Config {
        sources: sources_for(server),
        ..Config::default()
    }
}

pub fn http() -> SourceHttpClient {
    SourceHttpClient::new(&HttpClientConfig::default()).unwrap()
}

pub fn rxnav_body(groups: serde_json::Value) -> serde_json::Value {
    serde_json::json!({"drugGroup": {"name": null, "conceptGroup": groups}})
}
