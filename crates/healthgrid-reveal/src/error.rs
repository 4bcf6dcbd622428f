//! Error types for selection and reveal.

use healthgrid_graph::EntityId;
use thiserror::Error;

/// Result type for reveal operations.
pub type Result<T> = std::result::Result<T, RevealError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevealError {
    /// Selection names an id absent from the domain graph
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    /// Mode string is neither `neighbor` nor `sequence`
    #[error("Unknown reveal mode: {0}")]
    UnknownMode(String),
}
