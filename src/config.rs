// src/config.rs

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parsing config {path:?}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("archive scanning is disabled but no pairs file was given")]
    MissingPairs,

    #[error("{field} is not a valid URL: {source}")]
    InvalidUrl {
        field: &'static str,
        source: url::ParseError,
    },
}

/// Paths and endpoints shared by the scanner and the enricher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding one sub-directory per event (`YYYY...`).
    pub archive_root: PathBuf,
    /// Suffix of waveform files inside each `Data` directory.
    pub archive_extension: String,
    /// Tab-separated `Name\tYear` summary written after a scan.
    pub summary_path: PathBuf,
    /// Fixed-width DOI table.
    pub output_path: PathBuf,
    /// Registry search page; the network code goes in the `search` parameter.
    pub search_endpoint: String,
    /// Base for resolving relative detail-page links.
    pub registry_host: String,
    /// Scan the archive, or read pairs from `pairs_path` instead.
    pub scan_archive: bool,
    pub pairs_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive_root: PathBuf::from("Processed/"),
            archive_extension: ".MSEED".to_string(),
            summary_path: PathBuf::from("network_years.txt"),
            output_path: PathBuf::from("network_dois.txt"),
            search_endpoint: "https://www.fdsn.org/networks/".to_string(),
            registry_host: "https://www.fdsn.org".to_string(),
            scan_archive: true,
            pairs_path: None,
        }
    }
}

impl Config {
    /// Load a YAML config; keys that are absent keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scan_archive && self.pairs_path.is_none() {
            return Err(ConfigError::MissingPairs);
        }
        self.search_url()?;
        self.host_url()?;
        Ok(())
    }

    pub fn search_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.search_endpoint).map_err(|source| ConfigError::InvalidUrl {
            field: "search_endpoint",
            source,
        })
    }

    pub fn host_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.registry_host).map_err(|source| ConfigError::InvalidUrl {
            field: "registry_host",
            source,
        })
    }
}
