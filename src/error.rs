use thiserror::Error;

/// Errors produced by the primitives and the stored records.
#[derive(Debug, Error)]
pub enum KryptoError {
    #[error("buffer length mismatch: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Wrong key and corrupted data are reported the same way.
    #[error("integrity check failed: wrong key or corrupted data")]
    IntegrityCheckFailed,

    #[error("invalid block padding")]
    InvalidPadding,

    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("OS random generator unavailable")]
    RandomUnavailable,

    #[error("self-test failed: {0}")]
    SelfTestFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KryptoError>;
