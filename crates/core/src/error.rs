use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating division data.
#[derive(Error, Debug)]
pub enum DataError {
    /// A division file does not exist.
    #[error("file not found: {}", .0.display())]
    Missing(PathBuf),

    /// IO error reading/writing a division file.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Two competitors in one division share an id.
    #[error("duplicate competitor id '{0}'")]
    DuplicateCompetitor(String),

    /// Seeds are 1-based rankings.
    #[error("competitor '{id}' has invalid seed {seed}; seeds start at 1")]
    InvalidSeed { id: String, seed: u32 },
}
