use drug_info_hub::config::{LogFormat, SourcesConfig};
use drug_info_hub::repositories::{CACHE_TTL, FAILURE_TTL};
use drug_info_hub::{reference_links, Config, DrugQuery, Error};
use std::time::Duration;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.sources.rxnav_url, "https://rxnav.nlm.nih.gov/REST");
    assert_eq!(config.sources.openfda_url, "https://api.fda.gov");
    assert_eq!(config.aggregator.max_parallel_sources, 6);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert!(config.http.user_agent.starts_with("drug-info-hub/"));
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();

    // Valid config should pass
    assert!(config.validate().is_ok());

    // Invalid source URL
    config.sources.dailymed_site_url = "dailymed".to_string();
    assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));
    config.sources = SourcesConfig::default();

    // Zero parallelism
    config.aggregator.max_parallel_sources = 0;
    assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));
    config.aggregator.max_parallel_sources = 2;

    // Empty log level
    config.logging.level = String::new();
    assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));
}

#[test]
fn test_core_constants() {
    assert_eq!(CACHE_TTL, Duration::from_secs(3600));
    assert_eq!(FAILURE_TTL, CACHE_TTL);
    assert_eq!(drug_info_hub::client::REQUEST_TIMEOUT, Duration::from_secs(10));
}

#[test]
fn test_error_chain() {
    let err = DrugQuery::new("  ").unwrap_err();
    assert_eq!(format!("{err}"), "Invalid input: query - drug name cannot be empty");
}

#[test]
fn test_reference_links_need_no_network() {
    let links = reference_links(&DrugQuery::new("acetylsalicylic acid").unwrap());
    assert_eq!(links.len(), 4);
    assert!(links.iter().all(|l| l.url.contains("acetylsalicylic%20acid")));
}
