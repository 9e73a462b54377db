//! Core error types for model assembly
//!
//! This module defines the error types used throughout the assembly
//! pipeline, from declaration decoding to document serialization.

use thiserror::Error;

use super::NodeId;

/// Core error types for model assembly
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Malformed @{family} annotation on {method}(): {reason}")]
    MalformedAnnotation {
        family: String,
        method: String,
        reason: String,
    },

    #[error("Invalid type descriptor '{input}': {message}")]
    InvalidType { input: String, message: String },

    #[error("Invalid declaration input: {source}")]
    InvalidInput {
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Identifier space exhausted: no ids left above seed {seed}")]
    IdsExhausted { seed: u64 },

    #[error("Unknown node {id}")]
    UnknownNode { id: NodeId },

    #[error("Document integrity violated: {message}")]
    Integrity { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl ModelError {
    /// Create a new malformed annotation error
    pub fn malformed_annotation(
        family: impl Into<String>,
        method: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedAnnotation {
            family: family.into(),
            method: method.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid type descriptor error
    pub fn invalid_type(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidType {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a new integrity error
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(source: serde_json::Error) -> Self {
        Self::InvalidInput { source }
    }
}
