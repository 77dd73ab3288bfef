//! Static reference links.
//!
//! Pure URL templates pointing at sites that have no usable JSON API for our
//! purposes. No network, no caching, no failure mode.

use super::DrugQuery;
use serde::Serialize;

/// A `(note, link)` pair for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceLink {
    pub source: &'static str,
    pub note: &'static str,
    pub url: String,
}

/// Reference links for `query`, in display order
pub fn reference_links(query: &DrugQuery) -> Vec<ReferenceLink> {
    let encoded = query.url_encoded();

    vec![
        ReferenceLink {
            source: "PubChem",
            note: "Chemical structure, properties and safety data",
            url: format!("https://pubchem.ncbi.nlm.nih.gov/#query={encoded}"),
        },
        ReferenceLink {
            source: "ClinicalTrials.gov",
            note: "Registered clinical studies",
            url: format!("https://clinicaltrials.gov/search?intr={encoded}"),
        },
        ReferenceLink {
            source: "MedlinePlus",
            note: "Consumer drug information from NLM",
            url: format!("https://vsearch.nlm.nih.gov/vivisimo/cgi-bin/query-meta?v%3Aproject=medlineplus&query={encoded}"),
        },
        ReferenceLink {
            source: "Drugs.com",
            note: "Dosage, interactions and patient leaflets",
            url: format!("https://www.drugs.com/search.php?searchterm={encoded}"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_four_links_in_order() {
        let links = reference_links(&DrugQuery::new("Ibuprofen").unwrap());
        let sources: Vec<&str> = links.iter().map(|l| l.source).collect();
        assert_eq!(sources, vec!["PubChem", "ClinicalTrials.gov", "MedlinePlus", "Drugs.com"]);
        assert_eq!(links[3].url, "https://www.drugs.com/search.php?searchterm=Ibuprofen");
    }

    proptest! {
        #[test]
        fn prop_links_are_valid_urls(name in "[a-zA-Z0-9 &/?#%-]{1,40}") {
            prop_assume!(!name.trim().is_empty());
            let query = DrugQuery::new(&name).unwrap();
            for link in reference_links(&query) {
                let parsed = url::Url::parse(&link.url);
                prop_assert!(parsed.is_ok(), "bad url: {}", link.url);
                prop_assert!(!link.url.contains(' '));
            }
        }
    }
}
