//! Error types for variant resolution.

use std::{path::PathBuf, sync::Arc};

use crate::format::FontFormat;

/// Result type for variant resolution operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a resolution pass.
///
/// A target combination without a matching source is not an error; it is
/// dropped from the output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The manifest could not be parsed.
    #[error("Invalid font manifest: {0}")]
    Manifest(String),

    /// A query option has a value that cannot be used.
    #[error("Invalid query option '{key}': {message}")]
    InvalidQuery { key: String, message: String },

    /// Source font bytes could not be read.
    ///
    /// The I/O error is shared by every combination that needed the source.
    #[error("Failed to read font file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: Arc<std::io::Error>,
    },

    /// No edge in the conversion graph joins the two formats.
    #[error("Unsupported conversion from {} to {to}", format_name(.from))]
    UnsupportedConversion {
        from: Option<FontFormat>,
        to: FontFormat,
    },

    /// An encoder rejected its input.
    #[error("Failed to convert '{path}' from {from} to {to}: {cause:#}")]
    ConversionFailed {
        path: PathBuf,
        from: FontFormat,
        to: FontFormat,
        cause: anyhow::Error,
    },

    /// The asset emitter could not store a converted font.
    #[error("Failed to emit asset '{name}': {source}")]
    Emit {
        name: String,
        source: std::io::Error,
    },

    /// A pipeline task panicked or was cancelled.
    #[error("Resolution task failed: {0}")]
    TaskFailed(String),
}

fn format_name(format: &Option<FontFormat>) -> &'static str {
    format.map_or("unknown format", FontFormat::name)
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::TaskFailed(err.to_string())
    }
}
