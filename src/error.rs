//! Error types for arcane-plot

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChartError>;

/// Malformed profiling tables. Always raised before anything is drawn.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("dataset has no nodes")]
    Empty,

    #[error("{profiling} ARCANE samples but {cpu_only} CPU-only samples")]
    LengthMismatch { profiling: usize, cpu_only: usize },

    #[error("node {node} has zero ARCANE total cost")]
    ZeroTotal { node: usize },
}

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// Failure reported by the drawing backend, message kept as-is.
    #[error("render failed: {0}")]
    Render(String),

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("invalid style: {0}")]
    InvalidStyle(String),

    #[error("cannot parse style file {path}: {source}")]
    Style {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChartError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidInput(_) => ExitCode::from(2),
            Self::Render(_) => ExitCode::from(3),
            Self::UnsupportedFormat(_) => ExitCode::from(4),
            Self::InvalidStyle(_) | Self::Style { .. } => ExitCode::from(5),
            Self::Io(_) => ExitCode::from(6),
        }
    }
}
