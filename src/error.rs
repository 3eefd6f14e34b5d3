//! Error types for configuration store queries.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for query operations
#[derive(Error, Debug)]
pub enum QueryError {
    /// Single-value accessor used on a multi-value leaf
    #[error("cannot use {op} on multi node: {path}")]
    MultiNode { op: &'static str, path: String },

    /// Value accessor used on a node that does not hold values
    #[error("cannot use {op} on non-leaf node: {path}")]
    NonLeafNode { op: &'static str, path: String },

    /// Multi-value accessor used on a single-value node
    #[error("cannot use {op} on non-multi node: {path}")]
    NonMultiNode { op: &'static str, path: String },

    /// Node listing used on a node without named children
    #[error("cannot use {op} on a non-tag node: {path}")]
    NonTagNode { op: &'static str, path: String },

    /// Shape check passed but the store reported failure
    #[error("path doesn't exist: {0}")]
    PathNotFound(String),

    /// Node listing could not be decoded as UTF-8
    #[error("{op} returned non-UTF-8 node names for: {path}")]
    NonUtf8Output { op: &'static str, path: String },

    /// Configuration rejected by validation
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Config file could not be read
    #[error("failed to read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file is not valid TOML for `ClientConfig`
    #[error("failed to parse config {path:?}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },
}

/// Result type alias for query operations
pub type Result<T> = std::result::Result<T, QueryError>;

/// The external tool exited non-zero (or never ran).
///
/// Crate-private: every public operation converts it at its own boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("external query failed")]
pub(crate) struct ExternalQueryFailed;
