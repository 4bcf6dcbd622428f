//! Per-frame visibility queries.
//!
//! Pure reads over the engine's current session; renderers call these for
//! every entity and connection on every frame.

use healthgrid_graph::{Connection, EntityId};
use serde::{Deserialize, Serialize};

use crate::engine::{Focus, Session};

/// How an entity should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityVisibility {
    /// Most recently revealed path step
    Emphasized,
    Revealed,
    Dimmed,
}

/// How a connection should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionVisibility {
    /// Nothing is focused; drawn on the always-on default layer
    Ambient,
    Revealed,
    Hidden,
}

/// Borrowed view of the engine state for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    session: Option<&'a Session>,
}

impl<'a> FrameView<'a> {
    pub(crate) fn new(session: Option<&'a Session>) -> Self {
        Self { session }
    }

    /// True when no session is active at all.
    pub fn default_layer_visible(&self) -> bool {
        self.session.is_none()
    }

    pub fn is_entity_revealed(&self, id: &str) -> bool {
        let Some(session) = self.session else {
            return true;
        };
        match &session.focus {
            Focus::Highlight(highlight) => highlight.contains(id),
            Focus::Playback { path, cursor } => {
                revealed_prefix(path, *cursor).iter().any(|step| step == id)
            }
        }
    }

    /// Only the entity at the cursor, and only in sequence playback.
    pub fn is_entity_emphasized(&self, id: &str) -> bool {
        match self.session.map(|s| &s.focus) {
            Some(Focus::Playback { path, cursor }) => {
                path.get(*cursor).is_some_and(|step| step == id)
            }
            _ => false,
        }
    }

    /// In sequence playback, a connection is revealed only when its endpoints
    /// are consecutive revealed steps, regardless of what the graph links.
    pub fn is_connection_revealed(&self, connection: &Connection) -> bool {
        let Some(session) = self.session else {
            return true;
        };
        match &session.focus {
            Focus::Highlight(highlight) => {
                highlight.contains(connection.source.as_str())
                    && highlight.contains(connection.target.as_str())
            }
            Focus::Playback { path, cursor } => revealed_prefix(path, *cursor)
                .windows(2)
                .any(|pair| connection.joins(pair[0].as_str(), pair[1].as_str())),
        }
    }

    pub fn entity_visibility(&self, id: &str) -> EntityVisibility {
        if self.is_entity_emphasized(id) {
            EntityVisibility::Emphasized
        } else if self.is_entity_revealed(id) {
            EntityVisibility::Revealed
        } else {
            EntityVisibility::Dimmed
        }
    }

    pub fn connection_visibility(&self, connection: &Connection) -> ConnectionVisibility {
        if self.default_layer_visible() {
            ConnectionVisibility::Ambient
        } else if self.is_connection_revealed(connection) {
            ConnectionVisibility::Revealed
        } else {
            ConnectionVisibility::Hidden
        }
    }
}

fn revealed_prefix(path: &[EntityId], cursor: usize) -> &[EntityId] {
    path.get(..=cursor).unwrap_or_default()
}
