//! BUI-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, BituiError>;

/// Top-level error type for bitui.
#[derive(Debug, Error)]
pub enum BituiError {
    #[error("[BUI-1001] geometry violation: {details}")]
    Geometry { details: String },

    #[error("[BUI-1002] canvas exhausted: block at x={x} width={width} exceeds canvas width {canvas_width}")]
    Capacity {
        x: i64,
        width: u16,
        canvas_width: u16,
    },

    #[error("[BUI-2001] fetch failure for {target}: {details}")]
    DataFetch { target: String, details: String },

    #[error("[BUI-2002] RPC error {code} from {method}: {message}")]
    Rpc {
        method: String,
        code: i64,
        message: String,
    },

    #[error("[BUI-2003] transport failure calling {method}: {details}")]
    Transport { method: String, details: String },

    #[error("[BUI-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[BUI-3001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[BUI-3002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[BUI-3003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[BUI-3004] unusable auth cookie at {path}: {details}")]
    Cookie { path: PathBuf, details: String },

    #[error("[BUI-3101] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[BUI-3102] terminal failure: {source}")]
    Terminal {
        #[source]
        source: std::io::Error,
    },
}

impl BituiError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Geometry { .. } => "BUI-1001",
            Self::Capacity { .. } => "BUI-1002",
            Self::DataFetch { .. } => "BUI-2001",
            Self::Rpc { .. } => "BUI-2002",
            Self::Transport { .. } => "BUI-2003",
            Self::Serialization { .. } => "BUI-2101",
            Self::InvalidConfig { .. } => "BUI-3001",
            Self::MissingConfig { .. } => "BUI-3002",
            Self::ConfigParse { .. } => "BUI-3003",
            Self::Cookie { .. } => "BUI-3004",
            Self::Io { .. } => "BUI-3101",
            Self::Terminal { .. } => "BUI-3102",
        }
    }

    /// Whether the caller can keep going after this failure.
    ///
    /// Capacity is recovered by fetching fewer blocks; a failed fetch is
    /// recovered by skipping that one block.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Capacity { .. } | Self::DataFetch { .. })
    }

    /// Convenience constructor for geometry violations.
    #[must_use]
    pub fn geometry(details: impl Into<String>) -> Self {
        Self::Geometry {
            details: details.into(),
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wrap any failure as a fetch failure for `target` (e.g. `block 105`).
    #[must_use]
    pub fn fetch(target: impl Into<String>, cause: &Self) -> Self {
        Self::DataFetch {
            target: target.into(),
            details: cause.to_string(),
        }
    }
}

impl From<serde_json::Error> for BituiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for BituiError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
