//! Error types for the pacman-rl crate

use thiserror::Error;

/// Main error type for the pacman-rl crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid layout: {message}")]
    InvalidLayout { message: String },

    #[error("invalid character '{character}' at row {row}, column {col} in map")]
    InvalidTileCharacter {
        character: char,
        row: usize,
        col: usize,
    },

    #[error("cannot advance past level {level} (maximum level is {max_level})")]
    NoNextLevel { level: u32, max_level: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported save format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("invalid algorithm '{input}'. Expected one of: {expected}")]
    ParseAlgorithm { input: String, expected: String },

    #[error("invalid decay schedule '{input}'. Expected one of: {expected}")]
    ParseDecayKind { input: String, expected: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
