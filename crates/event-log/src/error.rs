use thiserror::Error;

use crate::{EntityId, Version};

/// Errors reported by a log store.
#[derive(Debug, Error)]
pub enum LogStoreError {
    /// The entity's log moved on since the caller read it.
    #[error(
        "Append conflict for entity {entity_id}: expected version {expected}, found {actual}"
    )]
    Conflict {
        entity_id: EntityId,
        expected: Version,
        actual: Version,
    },

    /// The batch handed to `append_events` is malformed.
    #[error("Invalid append batch: {0}")]
    InvalidBatch(String),

    /// A stored event was built without one of its required fields.
    #[error("Stored event is missing required field `{field}`")]
    IncompleteRecord { field: &'static str },

    /// A payload could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for log store operations.
pub type Result<T> = std::result::Result<T, LogStoreError>;
