use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing a persisted configuration store.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading or writing the file.
    #[error("IO error on {}: {error}", .file.display())]
    Io {
        /// The file being accessed.
        file: PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },
    /// The file did not contain a valid JSON document.
    #[error("JSON parse error in {}: {error}", .file.display())]
    Json {
        /// The file that caused the error.
        file: PathBuf,
        /// The underlying JSON error.
        #[source]
        error: serde_json::Error,
    },
    /// The document parsed but its root is not an object.
    #[error("root of {} is not an object", .file.display())]
    NotAnObject {
        /// The offending file.
        file: PathBuf,
    },
}

/// Errors raised when an item tag string cannot be turned back into an item.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The tag was empty or whitespace only.
    #[error("item tag is blank")]
    Blank,
    /// The tag is not a valid item description.
    #[error("malformed item tag: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The tag decoded to an item with no material.
    #[error("item tag has no material")]
    MissingMaterial,
}

/// Errors reported by an external economy provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider is present but not ready to answer queries.
    #[error("provider {0} is not ready")]
    NotReady(String),
    /// The provider failed while enumerating its currencies.
    #[error("provider {provider} failed: {reason}")]
    Failed {
        /// The provider name.
        provider: String,
        /// Reason reported by the provider.
        reason: String,
    },
}
