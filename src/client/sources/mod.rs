pub mod chembl;
pub mod dailymed;
pub mod drugbank;
pub mod openfda;
pub mod rxnav;
pub mod traits;
pub mod wikipedia;

pub use chembl::ChemblSource;
pub use dailymed::DailyMedSource;
pub use drugbank::DrugBankSource;
pub use openfda::OpenFdaSource;
pub use rxnav::RxNavSource;
pub use traits::{
    Compound, DrugSource, LabelInfo, PharmacologyInfo, ProductLabel, SourceError, SourceId,
    SourcePayload, SourceResult, NOT_AVAILABLE,
};
pub use wikipedia::WikipediaSource;

use crate::client::SourceHttpClient;
use crate::config::SourcesConfig;
use std::sync::Arc;
use url::Url;

/// Join a configured base URL and a relative path into a request URL
pub(crate) fn endpoint(base_url: &str, path: &str) -> Result<Url, SourceError> {
    let base = base_url.trim_end_matches('/');
    let raw = if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{}", path.trim_start_matches('/'))
    };

    Url::parse(&raw).map_err(|e| SourceError::Other(format!("Invalid endpoint URL '{raw}': {e}")))
}

/// The six standard adapters, in dispatch order
pub fn standard_sources(http: &SourceHttpClient, config: &SourcesConfig) -> Vec<Arc<dyn DrugSource>> {
    vec![
        Arc::new(RxNavSource::new(http.clone(), &config.rxnav_url)),
        Arc::new(OpenFdaSource::new(http.clone(), &config.openfda_url)),
        Arc::new(DrugBankSource::new(http.clone(), &config.drugbank_url)),
        Arc::new(WikipediaSource::new(http.clone(), &config.wikipedia_api_url)),
        Arc::new(DailyMedSource::new(
            http.clone(),
            &config.dailymed_api_url,
            &config.dailymed_site_url,
        )),
        Arc::new(ChemblSource::new(http.clone(), &config.chembl_url)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HttpClientConfig;

    #[test]
    fn test_endpoint_joins_paths() {
        let url = endpoint("https://rxnav.nlm.nih.gov/REST/", "/drugs.json").unwrap();
        assert_eq!(url.as_str(), "https://rxnav.nlm.nih.gov/REST/drugs.json");

        let url = endpoint("https://en.wikipedia.org/w/api.php", "").unwrap();
        assert_eq!(url.path(), "/w/api.php");
    }

    #[test]
    fn test_endpoint_rejects_garbage() {
        assert!(matches!(endpoint("not a url", "x"), Err(SourceError::Other(_))));
    }

    #[test]
    fn test_standard_sources_order() {
        let http = SourceHttpClient::new(&HttpClientConfig::default()).unwrap();
        let ids: Vec<SourceId> = standard_sources(&http, &SourcesConfig::default())
            .iter()
            .map(|s| s.id())
            .collect();
        assert_eq!(ids, SourceId::ALL.to_vec());
    }
}
