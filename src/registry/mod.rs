// src/registry/mod.rs

pub mod document;
pub mod fetch;
pub mod lookup;
pub mod page;

use std::error::Error as StdError;

use crate::archive::NetworkYear;

pub use document::Document;
pub use fetch::{Fetch, HttpFetcher};
pub use lookup::Registry;
pub use page::parse_entry;

/// Placeholder for a field the registry page did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Metadata scraped from a registry detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// "FDSN code" as printed on the page.
    pub code: String,
    pub name: String,
    pub start_year: String,
    pub end_year: String,
    pub doi: Option<String>,
}

impl Default for RegistryEntry {
    fn default() -> Self {
        Self {
            code: NOT_AVAILABLE.to_string(),
            name: NOT_AVAILABLE.to_string(),
            start_year: NOT_AVAILABLE.to_string(),
            end_year: NOT_AVAILABLE.to_string(),
            doi: None,
        }
    }
}

impl RegistryEntry {
    /// Whether this entry describes the network as it was in `year`.
    ///
    /// An entry without a numeric end year is still operating and accepts
    /// any year. Otherwise `start <= year <= end`, compared as integers; a
    /// non-numeric start year leaves the range open below.
    pub fn accepts(&self, year: &str) -> bool {
        let Some(end) = parse_year(&self.end_year) else {
            return true;
        };
        let Some(year) = parse_year(year) else {
            return false;
        };
        let after_start = parse_year(&self.start_year).map_or(true, |start| start <= year);
        after_start && year <= end
    }
}

fn parse_year(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Outcome of looking a (code, year) pair up in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Matched(RegistryEntry),
    /// No candidate page existed, or none covered the year.
    Unmatched { code: String },
}

impl Lookup {
    pub(crate) fn unmatched(pair: &NetworkYear) -> Self {
        Lookup::Unmatched {
            code: pair.code.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Connection, DNS or body read failure. Aborts the run.
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("cannot resolve {target:?}: {source}")]
    InvalidUrl {
        target: String,
        source: url::ParseError,
    },
}

impl RegistryError {
    /// Only transport failures stop the run; everything else degrades the
    /// affected lookup.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RegistryError::Transport { .. })
    }
}
