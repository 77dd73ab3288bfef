//! # Configuration
//!
//! Layered application configuration: built-in defaults, then an optional
//! TOML file, then `DRUG_INFO_HUB__<SECTION>__<KEY>` environment variables.
//!
//! The cache TTL and per-request timeout are constants of the core
//! ([`crate::repositories::CACHE_TTL`], [`crate::client::REQUEST_TIMEOUT`])
//! and deliberately absent here.

use crate::client::AggregatorConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use url::Url;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "DRUG_INFO_HUB";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourcesConfig,
    pub http: HttpSettings,
    pub aggregator: AggregatorConfig,
    pub logging: LoggingConfig,
}

/// Base URLs of the upstream sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub rxnav_url: String,
    pub openfda_url: String,
    pub drugbank_url: String,
    pub wikipedia_api_url: String,
    pub dailymed_api_url: String,
    /// Public site used to build label detail links
    pub dailymed_site_url: String,
    pub chembl_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            rxnav_url: "https://rxnav.nlm.nih.gov/REST".to_string(),
            openfda_url: "https://api.fda.gov".to_string(),
            drugbank_url: "https://api.drugbank.com/v1".to_string(),
            wikipedia_api_url: "https://en.wikipedia.org/w/api.php".to_string(),
            dailymed_api_url: "https://dailymed.nlm.nih.gov/dailymed/services/v2".to_string(),
            dailymed_site_url: "https://dailymed.nlm.nih.gov/dailymed".to_string(),
            chembl_url: "https://www.ebi.ac.uk/chembl/api/data".to_string(),
        }
    }
}

impl SourcesConfig {
    fn named_urls(&self) -> [(&'static str, &str); 7] {
        [
            ("sources.rxnav_url", &self.rxnav_url),
            ("sources.openfda_url", &self.openfda_url),
            ("sources.drugbank_url", &self.drugbank_url),
            ("sources.wikipedia_api_url", &self.wikipedia_api_url),
            ("sources.dailymed_api_url", &self.dailymed_api_url),
            ("sources.dailymed_site_url", &self.dailymed_site_url),
            ("sources.chembl_url", &self.chembl_url),
        ]
    }
}

/// Outbound HTTP settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: crate::client::HttpClientConfig::default().user_agent,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from defaults, an optional file, and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            debug!("Loading configuration file: {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<()> {
        for (field, value) in self.sources.named_urls() {
            let url = Url::parse(value).map_err(|e| Error::invalid_input(field, format!("invalid URL '{value}': {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::invalid_input(field, format!("unsupported scheme '{}'", url.scheme())));
            }
        }

        if self.http.user_agent.trim().is_empty() {
            return Err(Error::invalid_input("http.user_agent", "must not be empty"));
        }

        self.aggregator.validate()?;

        if self.logging.level.trim().is_empty() {
            return Err(Error::invalid_input("logging.level", "must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.aggregator.max_parallel_sources, 6);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = Config::default();
        config.sources.chembl_url = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidInput { ref field, .. }) if field == "sources.chembl_url"
        ));

        let mut config = Config::default();
        config.sources.rxnav_url = "ftp://rxnav.example".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.aggregator.max_parallel_sources = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[sources]
chembl_url = "http://localhost:9999/chembl"

[aggregator]
max_parallel_sources = 1

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.sources.chembl_url, "http://localhost:9999/chembl");
        assert_eq!(config.sources.rxnav_url, SourcesConfig::default().rxnav_url);
        assert_eq!(config.aggregator.max_parallel_sources, 1);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Config::load(Some(Path::new("/nonexistent/drug-info-hub.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
