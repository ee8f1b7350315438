// src/registry/page.rs

use tracing::{debug, instrument, trace};

use super::{Document, RegistryEntry};

const INFO_TABLE_CLASS: &str = "network-information";
const DOI_LABEL: &str = "Digital Object Identifier (DOI)";
const DOI_HOST: &str = "doi.org";

/// Parse a network detail page. Fields the page lacks stay `N/A`; when a
/// field appears in several tables the last one wins.
#[instrument(level = "debug", skip(html), fields(content_len = html.len()))]
pub fn parse_entry(html: &str) -> RegistryEntry {
    let doc = Document::parse(html);
    let mut entry = RegistryEntry::default();

    for table in doc.tables_with_class(INFO_TABLE_CLASS) {
        for (label, value) in table.fields() {
            trace!(label = %label, value = %value, "field");
            match label.as_str() {
                "FDSN code" => entry.code = value,
                "Network name" => entry.name = value.split_whitespace().collect::<Vec<_>>().join(" "),
                "Start year" => entry.start_year = value,
                "End year" => entry.end_year = value,
                _ => {}
            }
        }
    }

    for table in doc.tables_containing(DOI_LABEL) {
        if let Some(href) = table.first_link_containing(DOI_HOST) {
            entry.doi = Some(href.to_string());
        }
    }

    debug!(
        code = %entry.code,
        name = %entry.name,
        start = %entry.start_year,
        end = %entry.end_year,
        doi = ?entry.doi,
        "parsed registry entry"
    );
    entry
}
