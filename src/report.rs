//! Text and JSON rendering of a [`ResultBundle`] for terminals.

use crate::client::sources::{SourcePayload, SourceResult};
use crate::client::{ReferenceLink, ResultBundle};
use crate::Result;
use serde::Serialize;

/// JSON document printed by `--format json`
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    bundle: &'a ResultBundle,
    links: &'a [ReferenceLink],
}

/// Render the bundle and links as pretty-printed JSON
pub fn render_json(bundle: &ResultBundle, links: &[ReferenceLink]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport { bundle, links })?)
}

/// Render the bundle section by section, followed by any reference links
pub fn render_text(bundle: &ResultBundle, links: &[ReferenceLink]) -> String {
    let mut out = format!("Drug information for: {}\n", bundle.query);

    for (source, result) in bundle.iter() {
        out.push_str(&format!("\n== {source} ==\n"));
        match result {
            SourceResult::Success(payload) => render_payload(&mut out, payload),
            SourceResult::Failure(message) => out.push_str(&format!("  [error] {message}\n")),
        }
    }

    if !links.is_empty() {
        out.push_str("\n== More resources ==\n");
        for link in links {
            out.push_str(&format!("  {} - {}: {}\n", link.source, link.note, link.url));
        }
    }

    out.push_str(&format!(
        "\n{} of {} sources answered in {}ms\n",
        bundle.successful_sources(),
        bundle.len(),
        bundle.elapsed_ms
    ));
    out
}

fn render_payload(out: &mut String, payload: &SourcePayload) {
    match payload {
        SourcePayload::Identifiers(names) if names.is_empty() => out.push_str("  No matching concepts\n"),
        SourcePayload::Identifiers(names) => {
            for name in names {
                out.push_str(&format!("  - {name}\n"));
            }
        }
        SourcePayload::Label(label) => {
            out.push_str(&format!("  Uses: {}\n", label.uses));
            out.push_str(&format!("  Warnings: {}\n", label.warnings));
            out.push_str(&format!("  Side effects: {}\n", label.side_effects));
        }
        SourcePayload::Pharmacology(info) => {
            out.push_str(&format!("  Mechanism: {}\n", info.mechanism));
            out.push_str(&format!("  Targets: {}\n", join_or_none(&info.targets)));
            out.push_str(&format!("  Indications: {}\n", join_or_none(&info.indications)));
        }
        SourcePayload::Summary(text) => out.push_str(&format!("  {text}\n")),
        SourcePayload::ProductLabels(labels) => {
            for label in labels {
                match &label.url {
                    Some(url) => out.push_str(&format!("  - {} <{url}>\n", label.title)),
                    None => out.push_str(&format!("  - {}\n", label.title)),
                }
            }
        }
        SourcePayload::Bioactivity(compounds) => {
            for compound in compounds {
                out.push_str(&format!(
                    "  - {} ({}, {})\n",
                    compound.name, compound.chembl_id, compound.molecule_type
                ));
            }
        }
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none listed".to_string()
    } else {
        items.join("; ")
    }
}
