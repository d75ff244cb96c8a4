use std::path::{Path, PathBuf};

/// Convenience result type used across morphreel.
pub type MorphResult<T> = Result<T, MorphError>;

/// Top-level error taxonomy. Every variant aborts the run; nothing is retried.
#[derive(thiserror::Error, Debug)]
pub enum MorphError {
    /// Invalid configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// An input image could not be read or decoded.
    #[error("decode error: '{}': {message}", .path.display())]
    Decode {
        /// Offending file.
        path: PathBuf,
        /// Underlying decoder message.
        message: String,
    },

    /// The input directory holds no `.png`/`.jpg`/`.jpeg` files.
    #[error("no input images (.png, .jpg, .jpeg) found in '{}'", .0.display())]
    EmptyInput(PathBuf),

    /// Two buffers that must share a shape do not.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The video encoder could not be started, fed or finalized.
    #[error("encoder error: {0}")]
    Encoder(String),

    /// Temporary frame storage could not be created, written or read.
    #[error("storage error: {0}")]
    Storage(String),

    /// The run was stopped through a cancellation token.
    #[error("run cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MorphError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(path: &Path, msg: impl std::fmt::Display) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            message: msg.to_string(),
        }
    }

    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    pub fn encoder(msg: impl Into<String>) -> Self {
        Self::Encoder(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
