use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which of the two input files a load error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Names,
    Interactions,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Names => f.write_str("character names"),
            Self::Interactions => f.write_str("interaction matrix"),
        }
    }
}

/// Coarse classification of a [`LoadError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadErrorKind {
    ResourceFetchFailure,
    MalformedData,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {resource} from {}", path.display())]
    Unreachable {
        resource: Resource,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {resource} as JSON")]
    Unparseable {
        resource: Resource,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed input data: {0}")]
    Malformed(#[from] MalformedData),
}

impl LoadError {
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            Self::Unreachable { .. } | Self::Unparseable { .. } => {
                LoadErrorKind::ResourceFetchFailure
            }
            Self::Malformed(_) => LoadErrorKind::MalformedData,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum MalformedData {
    #[error("expected a JSON array of names")]
    NamesNotArray,

    #[error("name at index {index} is not a string")]
    NameNotString { index: usize },

    #[error("expected the interaction matrix to be a JSON array of rows")]
    MatrixNotArray,

    #[error("{names} names but the interaction matrix has {rows} rows")]
    RowCount { names: usize, rows: usize },

    #[error("row {row} is not a JSON array")]
    RowNotArray { row: usize },

    #[error("row {row} has {len} entries, expected {expected}")]
    RowLength {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("entry [{row}][{col}] is not a [sentiment, count] pair")]
    EntryShape { row: usize, col: usize },

    #[error("entry [{row}][{col}] has count {value}, expected a non-negative integer")]
    InvalidCount { row: usize, col: usize, value: String },

    #[error("entry [{row}][{col}] has a non-finite sentiment")]
    NonFiniteSentiment { row: usize, col: usize },

    #[error("interaction total of row {row} does not fit in 64 bits")]
    TotalOverflow { row: usize },
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ViewError {
    #[error("threshold must be a finite number, got {0}")]
    InvalidThreshold(f64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file")]
    Parse(#[from] toml::de::Error),

    #[error("invalid color {0:?}, expected #rrggbb")]
    Color(String),

    #[error("slider preset for {mode} is invalid: {reason}")]
    Preset { mode: &'static str, reason: &'static str },
}
