// src/archive/mod.rs

pub mod scan;
pub mod summary;

use std::{fmt, path::PathBuf};

pub use scan::scan;
pub use summary::{read_summary, write_summary};

/// A network code observed in an event of the given year.
///
/// Ordering is (code, year), which is the order the summary file is written in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetworkYear {
    pub code: String,
    pub year: String,
}

impl NetworkYear {
    pub fn new(code: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            year: year.into(),
        }
    }
}

impl fmt::Display for NetworkYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.code, self.year)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("archive root {0:?} not found")]
    RootNotFound(PathBuf),

    #[error("event directory {entry:?} has no Data directory")]
    MissingData { entry: PathBuf },

    #[error("{path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path:?} line {line}: expected `<code>\\t<year>`")]
    Malformed { path: PathBuf, line: usize },
}

impl ScanError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| ScanError::Io { path, source }
    }
}
