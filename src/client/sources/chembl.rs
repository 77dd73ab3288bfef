use super::endpoint;
use super::traits::{Compound, DrugSource, SourceError, SourceId, SourcePayload};
use crate::client::{DrugQuery, SourceHttpClient};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Name of the single compound returned when ChEMBL has no hits
pub const NO_CHEMBL_RECORDS: &str = "No ChEMBL records found";

const MAX_MOLECULES: usize = 3;

#[derive(Debug, Default, Deserialize)]
struct MoleculeSearchResponse {
    #[serde(default)]
    molecules: Vec<Molecule>,
}

#[derive(Debug, Default, Deserialize)]
struct Molecule {
    pref_name: Option<String>,
    molecule_chembl_id: Option<String>,
    molecule_type: Option<String>,
}

impl From<Molecule> for Compound {
    fn from(molecule: Molecule) -> Self {
        Self {
            name: molecule
                .pref_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Unnamed compound".to_string()),
            chembl_id: molecule.molecule_chembl_id.unwrap_or_else(|| "N/A".to_string()),
            molecule_type: molecule.molecule_type.unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

/// ChEMBL molecule search (EBI)
pub struct ChemblSource {
    http: SourceHttpClient,
    base_url: String,
}

impl ChemblSource {
    pub fn new(http: SourceHttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Keep the first hits in response order, or the sentinel when empty
    fn to_compounds(response: MoleculeSearchResponse) -> Vec<Compound> {
        let compounds: Vec<Compound> = response
            .molecules
            .into_iter()
            .take(MAX_MOLECULES)
            .map(Compound::from)
            .collect();

        if compounds.is_empty() {
            vec![Compound {
                name: NO_CHEMBL_RECORDS.to_string(),
                chembl_id: "N/A".to_string(),
                molecule_type: "N/A".to_string(),
            }]
        } else {
            compounds
        }
    }
}

#[async_trait]
impl DrugSource for ChemblSource {
    fn id(&self) -> SourceId {
        SourceId::Chembl
    }

    async fn fetch(&self, query: &DrugQuery) -> Result<SourcePayload, SourceError> {
        let mut url = endpoint(&self.base_url, "molecule/search.json")?;
        url.query_pairs_mut()
            .append_pair("q", &query.lowercase())
            .append_pair("limit", &MAX_MOLECULES.to_string());

        let response: MoleculeSearchResponse = self.http.get_json(SourceId::Chembl.display_name(), url).await?;
        debug!("ChEMBL returned {} molecules for {}", response.molecules.len(), query);

        Ok(SourcePayload::Bioactivity(Self::to_compounds(response)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unnamed_compound_placeholder() {
        let compound = Compound::from(Molecule {
            pref_name: None,
            molecule_chembl_id: Some("CHEMBL521".to_string()),
            molecule_type: Some("Small molecule".to_string()),
        });
        assert_eq!(compound.name, "Unnamed compound");
        assert_eq!(compound.chembl_id, "CHEMBL521");
    }

    #[test]
    fn test_empty_search_yields_sentinel() {
        let compounds = ChemblSource::to_compounds(MoleculeSearchResponse::default());
        assert_eq!(compounds.len(), 1);
        assert_eq!(compounds[0].name, NO_CHEMBL_RECORDS);
    }
}
