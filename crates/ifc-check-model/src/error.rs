// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model loading and relation lookups

use crate::EntityId;
use thiserror::Error;

/// Result type alias for relation lookups
pub type Result<T> = std::result::Result<T, ModelError>;

/// Result type alias for model loading
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Errors raised while opening or parsing a model file
///
/// These are fatal to a validation run: no findings are produced.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Content is not an ISO 10303-21 exchange file
    #[error("Invalid IFC format: {0}")]
    InvalidFormat(String),

    /// Failed to parse header section
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Unsupported IFC schema version
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchema(String),

    /// Failed to decode an instance record (strict loading only)
    #[error("Failed to parse entity {0}: {1}")]
    EntityParse(EntityId, String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// Create a new format error
    pub fn format(msg: impl Into<String>) -> Self {
        LoadError::InvalidFormat(msg.into())
    }

    /// Create a new header error
    pub fn header(msg: impl Into<String>) -> Self {
        LoadError::InvalidHeader(msg.into())
    }
}

/// Structural problems found while following a relation
///
/// A partially populated or hand-edited model can reference entities that
/// do not exist or carry attributes of the wrong kind. Consumers are expected
/// to treat these as "nothing found" for the entity at hand.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Entity not found
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),

    /// Reference to an entity that is missing or could not be decoded
    #[error("Dangling reference at {entity}: attribute {attribute}")]
    DanglingReference { entity: EntityId, attribute: usize },

    /// Type mismatch when accessing attribute
    #[error(
        "Type mismatch at entity {entity} attribute {attribute}: expected {expected}, got {actual}"
    )]
    TypeMismatch {
        entity: EntityId,
        attribute: usize,
        expected: String,
        actual: String,
    },

    /// Missing required attribute
    #[error("Missing required attribute {attribute} on entity {entity}")]
    MissingAttribute { entity: EntityId, attribute: usize },
}

impl ModelError {
    /// Create a dangling reference error
    pub fn dangling(entity: EntityId, attribute: usize) -> Self {
        ModelError::DanglingReference { entity, attribute }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        entity: EntityId,
        attribute: usize,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        ModelError::TypeMismatch {
            entity,
            attribute,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
