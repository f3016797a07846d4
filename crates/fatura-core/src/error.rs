//! Error types for the fatura-core library.
//!
//! Field extraction itself never fails: a missing field is an empty value,
//! not an error. These types cover the I/O edges around the extractor.

use thiserror::Error;

/// Main error type for the fatura library.
#[derive(Error, Debug)]
pub enum FaturaError {
    /// OCR collaborator error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Failed to serialize or deserialize JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors reported by an OCR service.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The recognizer process could not be started.
    #[error("failed to start recognizer `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The recognizer exited unsuccessfully.
    #[error("recognizer exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },

    /// Feeding the image or collecting the output failed.
    #[error("recognizer I/O failed: {0}")]
    Io(#[source] std::io::Error),

    /// The recognizer produced no text.
    #[error("recognizer returned no text")]
    EmptyOutput,

    /// The recognizer output was not valid UTF-8.
    #[error("recognizer output is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Result type for the fatura library.
pub type Result<T> = std::result::Result<T, FaturaError>;
