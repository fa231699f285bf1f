//! Error types for the mechanics engine.

/// Errors that can occur while building a configuration or running the game.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// The game configuration violates one of its invariants.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A flat parameter file named a parameter that does not exist.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// A line of a flat parameter file could not be parsed.
    #[error("line {line}: {message}")]
    ParseParams {
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// The operating system could not provide entropy for seeding the RNG.
    #[error("entropy source unavailable: {0}")]
    Entropy(String),

    /// Reading or writing a file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A JSON configuration could not be decoded.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
