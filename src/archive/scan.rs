// src/archive/scan.rs

use once_cell::sync::Lazy;
use regex::Regex;
use std::{collections::BTreeSet, fs, path::Path};
use tracing::{debug, info, instrument, trace, warn};

use super::{NetworkYear, ScanError};

static EVENT_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})").expect("event year regex should compile"));

/// Walk `<root>/<EVENT>/Data/` and collect every (network, year) pair seen in
/// file names of the form `NET.STA.CHA<extension>`.
///
/// Non-directory entries under `root` and directories whose names do not start
/// with a four digit year are skipped. An event directory without a `Data`
/// sub-directory aborts the scan.
#[instrument(level = "info", skip(root), fields(root = %root.as_ref().display()))]
pub fn scan(root: impl AsRef<Path>, extension: &str) -> Result<Vec<NetworkYear>, ScanError> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(ScanError::RootNotFound(root.to_path_buf()));
    }

    let mut pairs = BTreeSet::new();
    for entry in fs::read_dir(root).map_err(ScanError::io(root))? {
        let entry = entry.map_err(ScanError::io(root))?;
        let event_dir = entry.path();
        if !event_dir.is_dir() {
            debug!(path = %event_dir.display(), "skipping non-directory entry");
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        let Some(year) = EVENT_YEAR.captures(&name).map(|c| c[1].to_string()) else {
            warn!(entry = %name, "event directory does not start with a year; skipping");
            continue;
        };

        let data_dir = event_dir.join("Data");
        if !data_dir.is_dir() {
            return Err(ScanError::MissingData { entry: event_dir });
        }

        let before = pairs.len();
        for file in fs::read_dir(&data_dir).map_err(ScanError::io(&data_dir))? {
            let file = file.map_err(ScanError::io(&data_dir))?;
            let file_name = file.file_name().to_string_lossy().to_string();
            if let Some(code) = network_code(&file_name, extension) {
                trace!(file = %file_name, code, "archive file");
                pairs.insert(NetworkYear::new(code, year.as_str()));
            }
        }
        info!(entry = %name, year = %year, new_pairs = pairs.len() - before, "scanned event");
    }

    let pairs: Vec<NetworkYear> = pairs.into_iter().collect();
    info!(total = pairs.len(), "unique network/year pairs");
    Ok(pairs)
}

/// First dot-separated segment of an archive file name, if it has at least
/// three segments and ends with `extension`.
fn network_code<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    if !file_name.ends_with(extension) {
        return None;
    }
    let parts: Vec<&str> = file_name.split('.').collect();
    if parts.len() < 3 || parts[0].is_empty() {
        return None;
    }
    Some(parts[0])
}
