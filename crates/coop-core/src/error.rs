//! Error types for the normalization core
//!
//! All fallible operations return `Result<T, Error>`.
//! Every payload error carries the field path it was raised at, so a caller
//! can log and alert without re-parsing the original document.

use crate::schema::cursor::FieldPath;

/// Normalization error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Structurally invalid input, wrong primitive type, or missing required field
    #[error("malformed input at {path}: {constraint}")]
    MalformedInput { path: FieldPath, constraint: String },

    /// Numeric field outside its declared domain
    #[error("value out of range at {path}: {value} violates {constraint}")]
    OutOfRangeValue {
        path: FieldPath,
        constraint: String,
        value: String,
    },

    /// Asset URL without an embedded content hash
    #[error("malformed asset url at {path}: {url}")]
    MalformedAssetUrl { path: FieldPath, url: String },

    /// Well-formed content hash missing from the weapon table
    #[error("unknown weapon hash at {path}: {hash}")]
    UnknownWeaponHash { path: FieldPath, hash: String },

    /// A required node-list envelope had too few entries
    #[error("empty node list at {path}: at least {required} node(s) required")]
    EmptyNodeList { path: FieldPath, required: usize },

    /// Catalog lookup miss rejected by the unknown-value policy
    #[error("unknown {kind} at {path}: {value}")]
    UnknownEnumValue {
        path: FieldPath,
        kind: &'static str,
        value: String,
    },

    /// Lookup table or configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse error category, stable for metrics and alert routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedInput,
    OutOfRangeValue,
    MalformedAssetUrl,
    UnknownWeaponHash,
    EmptyNodeList,
    UnknownEnumValue,
    Config,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::OutOfRangeValue => "out_of_range_value",
            ErrorKind::MalformedAssetUrl => "malformed_asset_url",
            ErrorKind::UnknownWeaponHash => "unknown_weapon_hash",
            ErrorKind::EmptyNodeList => "empty_node_list",
            ErrorKind::UnknownEnumValue => "unknown_enum_value",
            ErrorKind::Config => "config",
        };
        f.write_str(name)
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedInput { .. } => ErrorKind::MalformedInput,
            Error::OutOfRangeValue { .. } => ErrorKind::OutOfRangeValue,
            Error::MalformedAssetUrl { .. } => ErrorKind::MalformedAssetUrl,
            Error::UnknownWeaponHash { .. } => ErrorKind::UnknownWeaponHash,
            Error::EmptyNodeList { .. } => ErrorKind::EmptyNodeList,
            Error::UnknownEnumValue { .. } => ErrorKind::UnknownEnumValue,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// Field path the error was raised at, `None` for configuration errors
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Error::MalformedInput { path, .. }
            | Error::OutOfRangeValue { path, .. }
            | Error::MalformedAssetUrl { path, .. }
            | Error::UnknownWeaponHash { path, .. }
            | Error::EmptyNodeList { path, .. }
            | Error::UnknownEnumValue { path, .. } => Some(path),
            Error::Config(_) => None,
        }
    }

    pub(crate) fn malformed(path: &FieldPath, constraint: impl Into<String>) -> Self {
        Error::MalformedInput {
            path: path.clone(),
            constraint: constraint.into(),
        }
    }

    pub(crate) fn out_of_range(
        path: &FieldPath,
        constraint: impl Into<String>,
        value: impl std::fmt::Display,
    ) -> Self {
        Error::OutOfRangeValue {
            path: path.clone(),
            constraint: constraint.into(),
            value: value.to_string(),
        }
    }
}

/// Result type alias for normalization operations
pub type Result<T> = std::result::Result<T, Error>;
