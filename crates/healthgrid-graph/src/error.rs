//! Error types for graph loading.

use thiserror::Error;

use crate::EntityId;

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Reasons a domain graph is rejected at load time.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Two entities share an id
    #[error("Duplicate entity id: {0}")]
    DuplicateEntity(EntityId),

    /// Size must be finite and positive
    #[error("Entity {id} has invalid size {size}")]
    InvalidSize { id: EntityId, size: f64 },

    /// Latitude or longitude out of range
    #[error("Entity {id} has invalid position ({lat}, {lng})")]
    InvalidPosition { id: EntityId, lat: f64, lng: f64 },

    /// A connection endpoint is not in the entity set
    #[error("Connection #{index} ({source_id} -> {target_id}) references unknown entity {missing}")]
    MalformedConnection {
        index: usize,
        source_id: EntityId,
        target_id: EntityId,
        missing: EntityId,
    },

    /// A sequence is keyed by an id that is not an entity
    #[error("Sequence trigger {0} is not a known entity")]
    UnknownSequenceTrigger(EntityId),

    /// A sequence path names an id that is not an entity
    #[error("Sequence for {trigger} step {position} references unknown entity {missing}")]
    UnknownSequenceEntity {
        trigger: EntityId,
        position: usize,
        missing: EntityId,
    },

    /// Sequence paths must contain at least one step
    #[error("Sequence for {0} is empty")]
    EmptySequence(EntityId),

    /// Malformed JSON document
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
