//! Connections between entities.

use serde::{Deserialize, Serialize};

use crate::EntityId;

/// Connection category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// Regular data flow
    Data,
    /// Marketplace pipeline
    Pipeline,
    /// Emergency dispatch
    Emergency,
    #[serde(other)]
    Other,
}

/// An edge between two entities.
///
/// Stored with a direction, but adjacency and reveal checks treat it as unordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub source: EntityId,
    pub target: EntityId,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ConnectionKind>,
}

impl Connection {
    /// Create a connection with no kind.
    pub fn new(source: impl Into<EntityId>, target: impl Into<EntityId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: None,
        }
    }

    /// Create a connection tagged with a kind.
    pub fn with_kind(
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        kind: ConnectionKind,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: Some(kind),
        }
    }

    /// The endpoint opposite `id`, if `id` is an endpoint.
    pub fn other_end(&self, id: &str) -> Option<&EntityId> {
        if self.source.as_str() == id {
            Some(&self.target)
        } else if self.target.as_str() == id {
            Some(&self.source)
        } else {
            None
        }
    }

    /// True if `{a, b}` equals this connection's endpoints, in either order.
    pub fn joins(&self, a: &str, b: &str) -> bool {
        (self.source.as_str() == a && self.target.as_str() == b)
            || (self.source.as_str() == b && self.target.as_str() == a)
    }

    /// Pipeline or emergency arcs are drawn in the alert colour.
    pub fn is_alert(&self) -> bool {
        matches!(
            self.kind,
            Some(ConnectionKind::Pipeline) | Some(ConnectionKind::Emergency)
        )
    }

    pub fn is_pipeline(&self) -> bool {
        self.kind == Some(ConnectionKind::Pipeline)
    }
}
