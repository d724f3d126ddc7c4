//! Failures while reading the manifest or an army file.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file isn't listed in the manifest.
    #[error("army file `{0}` is not in the manifest")]
    UnknownArmy(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
