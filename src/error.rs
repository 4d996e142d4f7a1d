use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to produce a dataset from a CSV source.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed quoted CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("loader thread exited before sending a result")]
    Disconnected,
}

/// Errors surfaced by the non-interactive commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Unsupported shell: {0}. Use bash, zsh, or fish.")]
    UnsupportedShell(String),

    #[error("could not encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
