//! Sequence definitions: trigger entity -> ordered reveal path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::EntityId;

/// Predefined reveal paths keyed by trigger entity.
///
/// Paths are authoritative: they are never deduplicated or reordered, and an
/// id may appear more than once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceDefinitions {
    paths: BTreeMap<EntityId, Vec<EntityId>>,
}

impl SequenceDefinitions {
    /// Create an empty set of definitions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or replace) the path for `trigger`.
    pub fn insert<I, S>(&mut self, trigger: impl Into<EntityId>, path: I) -> Option<Vec<EntityId>>
    where
        I: IntoIterator<Item = S>,
        S: Into<EntityId>,
    {
        self.paths
            .insert(trigger.into(), path.into_iter().map(Into::into).collect())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<I, S>(mut self, trigger: impl Into<EntityId>, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EntityId>,
    {
        self.insert(trigger, path);
        self
    }

    /// Path for `trigger`, if one is defined.
    pub fn get(&self, trigger: &str) -> Option<&[EntityId]> {
        self.paths.get(trigger).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// All (trigger, path) pairs in trigger order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &[EntityId])> {
        self.paths.iter().map(|(k, v)| (k, v.as_slice()))
    }
}
