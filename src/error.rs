use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// VizError – everything that can go wrong between the input files and the PNG
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum VizError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is empty (expected a header line)", .path.display())]
    EmptyFile { path: PathBuf },

    #[error("{}:{line}: '{token}' is not a number", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("{}:{line}: expected {expected} values, found {found}", .path.display())]
    RaggedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("requested {requested} points but the matrix only has {available} rows")]
    TooFewRows { requested: usize, available: usize },

    #[error("{points} points to plot but only {labels} labels")]
    LabelMismatch { points: usize, labels: usize },

    #[error("no points to embed")]
    EmptyInput,

    #[error("dimensionality reduction failed: {0}")]
    Reduction(String),

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, VizError>;
