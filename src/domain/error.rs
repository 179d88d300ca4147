use thiserror::Error;

use crate::domain::json_path::JsonPathError;

/// Errors produced while decoding one raw assertion record.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DecodeError {
    #[error("assertion must be an object")]
    NotAnObject,

    #[error("assertion is missing `{field}`")]
    MissingField { field: &'static str },

    #[error("assertion field `{field}` must be {expected}")]
    InvalidFieldType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unknown assertion type `{kind}`")]
    UnknownKind { kind: String },

    #[error("comparator `{token}` is not valid for {kind} assertions")]
    UnknownComparator { kind: &'static str, token: String },

    #[error("invalid target: {reason}")]
    InvalidTarget { reason: String },

    #[error(transparent)]
    InvalidPath(#[from] JsonPathError),
}

/// Errors produced while locating the actual value inside a response.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExtractError {
    #[error("response body is not valid JSON: {reason}")]
    InvalidJson { reason: String },

    #[error("json path `{path}` not found at segment {segment}")]
    PathNotFound { path: String, segment: usize },

    #[error("value at `{path}` is not numeric: {found}")]
    NotNumeric { path: String, found: String },
}

impl ExtractError {
    /// Stable token used in serialized results.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidJson { .. } => "invalid_json",
            Self::PathNotFound { .. } => "path_not_found",
            Self::NotNumeric { .. } => "not_numeric",
        }
    }
}
