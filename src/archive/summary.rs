// src/archive/summary.rs

use std::{
    collections::BTreeSet,
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::Path,
};
use tracing::{debug, info};

use super::{NetworkYear, ScanError};

const HEADER: &str = "Name\tYear";

/// Write the `Name\tYear` summary: the header truncates the file, the rows are
/// appended in a second pass.
pub fn write_summary(path: impl AsRef<Path>, pairs: &[NetworkYear]) -> Result<(), ScanError> {
    let path = path.as_ref();

    let mut header = File::create(path).map_err(ScanError::io(path))?;
    writeln!(header, "{}", HEADER).map_err(ScanError::io(path))?;
    drop(header);

    let file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(ScanError::io(path))?;
    let mut w = BufWriter::new(file);
    for pair in pairs {
        writeln!(w, "{}\t{}", pair.code, pair.year).map_err(ScanError::io(path))?;
    }
    w.flush().map_err(ScanError::io(path))?;

    info!(path = %path.display(), rows = pairs.len(), "wrote summary");
    Ok(())
}

/// Load pairs from a summary file or a precomputed list in the same format.
/// The header is optional; the result is deduplicated and sorted.
pub fn read_summary(path: impl AsRef<Path>) -> Result<Vec<NetworkYear>, ScanError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(ScanError::io(path))?;

    let mut pairs = BTreeSet::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || (idx == 0 && line == HEADER) {
            continue;
        }
        let (code, year) = line
            .split_once('\t')
            .map(|(c, y)| (c.trim(), y.trim()))
            .filter(|(c, y)| !c.is_empty() && !y.is_empty())
            .ok_or_else(|| ScanError::Malformed {
                path: path.to_path_buf(),
                line: idx + 1,
            })?;
        pairs.insert(NetworkYear::new(code, year));
    }

    debug!(path = %path.display(), pairs = pairs.len(), "loaded pairs");
    Ok(pairs.into_iter().collect())
}
