// src/table.rs

use anyhow::{Context, Result};
use std::{
    collections::HashSet,
    fs::{self, File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::registry::{RegistryEntry, NOT_AVAILABLE};

const WIDTHS: [usize; 5] = [14, 120, 12, 12, 50];
const TITLES: [&str; 5] = ["Network Code", "Network Name", "Start Year", "End Year", "DOI"];

fn render(fields: [&str; 5]) -> String {
    let mut line = String::new();
    for (field, width) in fields.iter().zip(WIDTHS) {
        line.push_str(&format!("{:<width$}", field, width = width));
    }
    line.push('\n');
    line
}

/// One line of the DOI table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub code: String,
    pub name: String,
    pub start_year: String,
    pub end_year: String,
    pub doi: Option<String>,
}

impl OutputRow {
    /// Row for a matched entry, labelled with the code that was searched for.
    pub fn matched(code: &str, entry: RegistryEntry) -> Self {
        Self {
            code: code.to_string(),
            name: entry.name,
            start_year: entry.start_year,
            end_year: entry.end_year,
            doi: entry.doi,
        }
    }

    /// Row recording that `code` had no registry entry for its year.
    pub fn unmatched(code: &str) -> Self {
        Self {
            code: code.to_string(),
            name: NOT_AVAILABLE.to_string(),
            start_year: NOT_AVAILABLE.to_string(),
            end_year: NOT_AVAILABLE.to_string(),
            doi: None,
        }
    }

    pub fn is_unmatched(&self) -> bool {
        self.doi.is_none()
            && [&self.name, &self.start_year, &self.end_year]
                .iter()
                .all(|f| f.as_str() == NOT_AVAILABLE)
    }

    pub fn to_line(&self) -> String {
        render([
            self.code.as_str(),
            self.name.as_str(),
            self.start_year.as_str(),
            self.end_year.as_str(),
            self.doi.as_deref().unwrap_or(NOT_AVAILABLE),
        ])
    }

    /// Parse a rendered line back. The code is the first column and the DOI
    /// the last token; the two year columns sit directly before the DOI, so a
    /// name that overflows its column does not shift them.
    pub fn from_line(line: &str) -> Option<Self> {
        let chars: Vec<char> = line.trim_end().chars().collect();
        let [code_width, _, start_width, end_width, _] = WIDTHS;
        if chars.len() <= code_width {
            return None;
        }
        let field = |cs: &[char]| cs.iter().collect::<String>().trim().to_string();

        let code = field(&chars[..code_width]);
        let rest = &chars[code_width..];
        let doi_at = rest.iter().rposition(|c| c.is_whitespace())? + 1;
        let years_at = doi_at.checked_sub(start_width + end_width)?;
        if code.is_empty() {
            return None;
        }

        let doi = field(&rest[doi_at..]);
        Some(Self {
            code,
            name: field(&rest[..years_at]),
            start_year: field(&rest[years_at..years_at + start_width]),
            end_year: field(&rest[years_at + start_width..doi_at]),
            doi: (doi != NOT_AVAILABLE).then_some(doi),
        })
    }
}

/// Keys of every recorded row. A row with a DOI is a duplicate when the DOI
/// was seen before; one without is a duplicate when its name was. Unmatched
/// rows are kept once per code.
#[derive(Debug, Default)]
struct Recorded {
    dois: HashSet<String>,
    names: HashSet<String>,
    codes: HashSet<String>,
}

impl Recorded {
    fn contains(&self, row: &OutputRow) -> bool {
        if row.is_unmatched() {
            self.codes.contains(&row.code)
        } else if let Some(doi) = &row.doi {
            self.dois.contains(doi)
        } else {
            self.names.contains(&row.name)
        }
    }

    fn insert(&mut self, row: &OutputRow) {
        if row.is_unmatched() {
            self.codes.insert(row.code.clone());
            return;
        }
        if let Some(doi) = &row.doi {
            self.dois.insert(doi.clone());
        }
        self.names.insert(row.name.clone());
    }
}

/// Append-only fixed-width table of network metadata.
pub struct DoiTable {
    path: PathBuf,
    recorded: Recorded,
}

impl DoiTable {
    /// Open `path`, writing the header if the file is missing or empty and
    /// otherwise loading the keys of the rows already recorded.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let existing = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", path.display()));
            }
        };

        let mut recorded = Recorded::default();
        if existing.trim().is_empty() {
            let mut f = File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            f.write_all(render(TITLES).as_bytes())
                .with_context(|| format!("writing header to {}", path.display()))?;
            info!(path = %path.display(), "created DOI table");
        } else {
            let mut rows = 0;
            for row in existing.lines().skip(1).filter_map(OutputRow::from_line) {
                recorded.insert(&row);
                rows += 1;
            }
            info!(path = %path.display(), rows, "loaded existing DOI table");
        }

        Ok(Self { path, recorded })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a row with the same DOI (or name, or unmatched code) is recorded.
    pub fn contains(&self, row: &OutputRow) -> bool {
        self.recorded.contains(row)
    }

    /// Append `row` unless it is already recorded. Returns whether a line was
    /// written.
    pub fn append(&mut self, row: &OutputRow) -> Result<bool> {
        if self.contains(row) {
            debug!(code = %row.code, name = %row.name, doi = ?row.doi, "already recorded");
            return Ok(false);
        }

        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        f.write_all(row.to_line().as_bytes())
            .with_context(|| format!("appending to {}", self.path.display()))?;

        self.recorded.insert(row);
        Ok(true)
    }
}
