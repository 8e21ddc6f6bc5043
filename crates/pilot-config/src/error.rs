//! Configuration error types.
//!
//! These errors never cross the crate boundary: resolution must not crash
//! the host application, so every failure degrades to "use the next-lower
//! tier's value" or a boolean result. The typed errors exist for the tier
//! store and persistence internals, where they carry the failing path and
//! the underlying I/O or JSON cause into the warning logs.

use thiserror::Error;

/// Errors raised by tier I/O and persistence internals.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Tier file exists but could not be read (permissions, I/O).
    #[error("failed to read {path}")]
    Read {
        /// The file that could not be read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Tier file is not valid JSON.
    #[error("failed to parse {path}")]
    Parse {
        /// The file that failed to parse.
        path: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Tier file exceeds the size limit.
    #[error("{path} is {bytes} bytes, exceeding the tier file size limit")]
    Oversized {
        /// The offending file.
        path: String,
        /// Its size in bytes.
        bytes: usize,
    },

    /// Settings file could not be written.
    #[error("failed to write {path}")]
    Write {
        /// The file that could not be written.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Partial update could not be serialized.
    #[error("failed to serialize settings for {path}")]
    Serialize {
        /// The destination file.
        path: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Project-tier save attempted before a project path was set.
    #[error("no project path set; call set_project_path before saving project settings")]
    NoProjectPath,
}

/// Crate-internal result alias.
pub type ConfigResult<T> = Result<T, ConfigError>;
