use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ResourceKind;

#[derive(Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProvisionError {
    #[error("{kind} expects between {min} and {max} arguments, got {got}")]
    Arity {
        kind: ResourceKind,
        min: usize,
        max: usize,
        got: usize,
    },

    #[error("invalid {field} '{value}': {reason}")]
    Configuration {
        field: String,
        value: String,
        reason: String,
    },

    #[error("invalid grant '{grant}': {reason}")]
    GrantFormat { grant: String, reason: String },

    #[error("failed to create {kind} '{name}': {source}")]
    Provisioning {
        kind: ResourceKind,
        name: String,
        #[source]
        source: ClientError,
    },
}

impl ProvisionError {
    pub(crate) fn configuration(
        field: impl ToString,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ProvisionError::Configuration {
            field: field.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn grant(grant: &str, reason: impl Into<String>) -> Self {
        ProvisionError::GrantFormat {
            grant: grant.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failures reported by a storage collaborator.
#[derive(Debug, Error, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub enum ClientError {
    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("storage service unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Io(err.to_string())
    }
}
