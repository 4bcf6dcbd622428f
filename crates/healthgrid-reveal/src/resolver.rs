//! Selection resolution: which entities a selection brings into focus.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use healthgrid_graph::{DomainGraph, EntityId};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RevealError};

/// Reveal policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealMode {
    /// Selected entity plus direct neighbors, shown instantly
    #[default]
    Neighbor,
    /// Predefined path, revealed one step at a time
    Sequence,
}

impl RevealMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevealMode::Neighbor => "neighbor",
            RevealMode::Sequence => "sequence",
        }
    }
}

impl fmt::Display for RevealMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RevealMode {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neighbor" | "neighbour" => Ok(RevealMode::Neighbor),
            "sequence" => Ok(RevealMode::Sequence),
            other => Err(RevealError::UnknownMode(other.to_string())),
        }
    }
}

/// Highlighted set produced in neighbor mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    members: HashSet<EntityId>,
    /// Selected id first, then neighbors in connection order
    ordered: Vec<EntityId>,
}

impl Highlight {
    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// Members in display order.
    pub fn ids(&self) -> &[EntityId] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Result of resolving a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSelection {
    Neighbors {
        selected: EntityId,
        highlight: Highlight,
    },
    /// `path` is empty when the entity has no sequence (info-only)
    Sequence {
        selected: EntityId,
        path: Vec<EntityId>,
    },
}

impl ResolvedSelection {
    pub fn selected(&self) -> &EntityId {
        match self {
            ResolvedSelection::Neighbors { selected, .. } => selected,
            ResolvedSelection::Sequence { selected, .. } => selected,
        }
    }

    /// Ordered reveal path; always empty in neighbor mode.
    pub fn path(&self) -> &[EntityId] {
        match self {
            ResolvedSelection::Neighbors { .. } => &[],
            ResolvedSelection::Sequence { path, .. } => path,
        }
    }
}

/// Resolve `id` under `mode`. Fails without side effects if `id` is unknown.
pub fn resolve(graph: &DomainGraph, mode: RevealMode, id: &str) -> Result<ResolvedSelection> {
    match mode {
        RevealMode::Neighbor => Ok(ResolvedSelection::Neighbors {
            selected: EntityId::from(id),
            highlight: resolve_neighbors(graph, id)?,
        }),
        RevealMode::Sequence => Ok(ResolvedSelection::Sequence {
            selected: EntityId::from(id),
            path: resolve_sequence(graph, id)?,
        }),
    }
}

/// `id` plus every entity sharing a connection with it, in either direction.
pub fn resolve_neighbors(graph: &DomainGraph, id: &str) -> Result<Highlight> {
    let selected = known(graph, id)?;

    let mut members = HashSet::new();
    let mut ordered = Vec::new();
    for member in std::iter::once(selected).chain(graph.neighbors(id)) {
        if members.insert(member.clone()) {
            ordered.push(member.clone());
        }
    }

    Ok(Highlight { members, ordered })
}

/// The sequence defined for `id`, verbatim, or an empty path if none exists.
pub fn resolve_sequence(graph: &DomainGraph, id: &str) -> Result<Vec<EntityId>> {
    known(graph, id)?;
    Ok(graph.sequence(id).map(<[EntityId]>::to_vec).unwrap_or_default())
}

fn known<'g>(graph: &'g DomainGraph, id: &str) -> Result<&'g EntityId> {
    graph
        .entity(id)
        .map(|entity| &entity.id)
        .ok_or_else(|| RevealError::UnknownEntity(EntityId::from(id)))
}
