//! The validated, immutable domain graph.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GraphError, Result};
use crate::{Connection, Entity, EntityId, SequenceDefinitions};

/// Serialized form of a domain graph, as read from a data file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSpec {
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub sequences: SequenceDefinitions,
}

/// Entities, connections and sequence definitions with referential integrity
/// checked once at construction.
#[derive(Debug, Clone)]
pub struct DomainGraph {
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
    connections: Vec<Connection>,
    /// Connection indices touching each entity
    adjacency: HashMap<EntityId, Vec<usize>>,
    sequences: SequenceDefinitions,
}

impl DomainGraph {
    /// Validate and build a graph. Any malformed input aborts construction.
    pub fn new(
        entities: Vec<Entity>,
        connections: Vec<Connection>,
        sequences: SequenceDefinitions,
    ) -> Result<Self> {
        let mut index = HashMap::with_capacity(entities.len());
        for (i, entity) in entities.iter().enumerate() {
            if !(entity.size.is_finite() && entity.size > 0.0) {
                return Err(GraphError::InvalidSize {
                    id: entity.id.clone(),
                    size: entity.size,
                });
            }
            if !entity.position.is_valid() {
                return Err(GraphError::InvalidPosition {
                    id: entity.id.clone(),
                    lat: entity.position.lat,
                    lng: entity.position.lng,
                });
            }
            if index.insert(entity.id.clone(), i).is_some() {
                return Err(GraphError::DuplicateEntity(entity.id.clone()));
            }
        }

        let mut adjacency: HashMap<EntityId, Vec<usize>> = HashMap::new();
        for (i, conn) in connections.iter().enumerate() {
            for endpoint in [&conn.source, &conn.target] {
                if !index.contains_key(endpoint) {
                    return Err(GraphError::MalformedConnection {
                        index: i,
                        source_id: conn.source.clone(),
                        target_id: conn.target.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
            adjacency.entry(conn.source.clone()).or_default().push(i);
            if conn.target != conn.source {
                adjacency.entry(conn.target.clone()).or_default().push(i);
            }
        }

        for (trigger, path) in sequences.iter() {
            if !index.contains_key(trigger) {
                return Err(GraphError::UnknownSequenceTrigger(trigger.clone()));
            }
            if path.is_empty() {
                return Err(GraphError::EmptySequence(trigger.clone()));
            }
            if let Some((position, missing)) = path
                .iter()
                .enumerate()
                .find(|(_, id)| !index.contains_key(*id))
            {
                return Err(GraphError::UnknownSequenceEntity {
                    trigger: trigger.clone(),
                    position,
                    missing: missing.clone(),
                });
            }
            if path[0] != *trigger {
                warn!(%trigger, first = %path[0], "sequence does not start at its trigger");
            }
        }

        debug!(
            entities = entities.len(),
            connections = connections.len(),
            sequences = sequences.len(),
            "domain graph loaded"
        );

        Ok(Self {
            entities,
            index,
            connections,
            adjacency,
            sequences,
        })
    }

    /// Build from a deserialized spec.
    pub fn from_spec(spec: GraphSpec) -> Result<Self> {
        Self::new(spec.entities, spec.connections, spec.sequences)
    }

    /// Parse and validate a JSON [`GraphSpec`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let spec: GraphSpec = serde_json::from_str(json)?;
        Self::from_spec(spec)
    }

    /// Read, parse and validate a JSON [`GraphSpec`] file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Back to the serializable form.
    pub fn to_spec(&self) -> GraphSpec {
        GraphSpec {
            entities: self.entities.clone(),
            connections: self.connections.clone(),
            sequences: self.sequences.clone(),
        }
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&i| &self.entities[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All entities in load order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// All connections in load order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Connections touching `id`, in load order.
    pub fn connections_of<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.adjacency
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.connections[i])
    }

    /// Entities directly connected to `id` in either direction.
    ///
    /// Ordered by first appearance in the connection list, without duplicates.
    /// `id` itself is only included through a self-loop.
    pub fn neighbors(&self, id: &str) -> Vec<&EntityId> {
        let mut seen = HashSet::new();
        self.connections_of(id)
            .filter_map(|conn| conn.other_end(id))
            .filter(|other| seen.insert(*other))
            .collect()
    }

    pub fn sequence(&self, trigger: &str) -> Option<&[EntityId]> {
        self.sequences.get(trigger)
    }

    pub fn sequences(&self) -> &SequenceDefinitions {
        &self.sequences
    }
}

impl TryFrom<GraphSpec> for DomainGraph {
    type Error = GraphError;

    fn try_from(spec: GraphSpec) -> Result<Self> {
        Self::from_spec(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, GeoPosition};

    fn entity(id: &str) -> Entity {
        Entity::new(id, GeoPosition::new(0.0, 0.0), id, Category::Sensor, "#ffffff", 1.0)
    }

    fn entities(ids: &[&str]) -> Vec<Entity> {
        ids.iter().map(|id| entity(id)).collect()
    }

    #[test]
    fn rejects_connection_to_unknown_entity() {
        let err = DomainGraph::new(
            entities(&["a", "b"]),
            vec![Connection::new("a", "b"), Connection::new("b", "ghost")],
            SequenceDefinitions::new(),
        )
        .unwrap_err();

        match err {
            GraphError::MalformedConnection { index, missing, .. } => {
                assert_eq!(index, 1);
                assert_eq!(missing, "ghost");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = DomainGraph::new(entities(&["a", "a"]), vec![], SequenceDefinitions::new())
            .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateEntity(id) if id == "a"));
    }

    #[test]
    fn rejects_non_positive_size() {
        let mut bad = entity("a");
        bad.size = 0.0;
        let err = DomainGraph::new(vec![bad], vec![], SequenceDefinitions::new()).unwrap_err();
        assert!(matches!(err, GraphError::InvalidSize { .. }));
    }

    #[test]
    fn rejects_out_of_range_position() {
        let mut bad = entity("a");
        bad.position = GeoPosition::new(120.0, 0.0);
        let err = DomainGraph::new(vec![bad], vec![], SequenceDefinitions::new()).unwrap_err();
        assert!(matches!(err, GraphError::InvalidPosition { .. }));
    }

    #[test]
    fn rejects_bad_sequences() {
        let err = DomainGraph::new(
            entities(&["a"]),
            vec![],
            SequenceDefinitions::new().with("ghost", ["a"]),
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::UnknownSequenceTrigger(_)));

        let err = DomainGraph::new(
            entities(&["a"]),
            vec![],
            SequenceDefinitions::new().with("a", Vec::<&str>::new()),
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::EmptySequence(_)));

        let err = DomainGraph::new(
            entities(&["a", "b"]),
            vec![],
            SequenceDefinitions::new().with("a", ["a", "b", "c"]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GraphError::UnknownSequenceEntity { position: 2, .. }
        ));
    }

    #[test]
    fn sequence_may_start_elsewhere() {
        let graph = DomainGraph::new(
            entities(&["a", "b"]),
            vec![],
            SequenceDefinitions::new().with("a", ["b", "a"]),
        )
        .unwrap();
        assert_eq!(graph.sequence("a").unwrap()[0], "b");
    }

    #[test]
    fn neighbors_are_undirected_and_deduplicated() {
        let graph = DomainGraph::new(
            entities(&["h", "x", "y", "z"]),
            vec![
                Connection::new("x", "h"),
                Connection::new("h", "y"),
                Connection::new("z", "h"),
                Connection::new("h", "x"),
                Connection::new("x", "y"),
            ],
            SequenceDefinitions::new(),
        )
        .unwrap();

        let ids: Vec<_> = graph.neighbors("h").into_iter().map(EntityId::as_str).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
        assert_eq!(graph.connections_of("h").count(), 4);
        assert!(graph.neighbors("ghost").is_empty());
    }

    #[test]
    fn json_round_trip_keeps_sequences() {
        let json = r##"{
            "entities": [
                {"id":"a","lat":1,"lng":2,"label":"A","type":"hub","color":"#000","size":3},
                {"id":"b","lat":-1,"lng":-2,"label":"B","type":"sensor","color":"#111","size":1}
            ],
            "connections": [{"source":"a","target":"b","type":"data"}],
            "sequences": {"a": ["a","b"]}
        }"##;
        let graph = DomainGraph::from_json_str(json).unwrap();
        assert_eq!(graph.entities().len(), 2);
        assert_eq!(graph.entity("b").unwrap().category, Category::Sensor);

        let again = DomainGraph::from_spec(graph.to_spec()).unwrap();
        assert_eq!(again.sequence("a"), graph.sequence("a"));
    }

    #[test]
    fn json_with_dangling_connection_is_rejected() {
        let json = r##"{
            "entities": [{"id":"a","lat":0,"lng":0,"label":"A","type":"hub","color":"#000","size":1}],
            "connections": [{"source":"a","target":"b"}]
        }"##;
        assert!(matches!(
            DomainGraph::from_json_str(json),
            Err(GraphError::MalformedConnection { .. })
        ));
    }

    #[test]
    fn loads_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{"entities":[{{"id":"a","lat":0,"lng":0,"label":"A","type":"hub","color":"#000","size":1}}]}}"##
        )
        .unwrap();

        let graph = DomainGraph::from_json_file(file.path()).unwrap();
        assert!(graph.contains("a"));

        assert!(matches!(
            DomainGraph::from_json_file("/definitely/not/here.json"),
            Err(GraphError::Io(_))
        ));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        assert!(matches!(
            DomainGraph::from_json_str("{not json"),
            Err(GraphError::Parse(_))
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        const KNOWN: [&str; 4] = ["a", "b", "c", "d"];

        fn endpoint() -> impl Strategy<Value = &'static str> {
            prop::sample::select(vec!["a", "b", "c", "d", "x", "y"])
        }

        proptest! {
            #[test]
            fn load_succeeds_iff_every_endpoint_is_known(
                pairs in prop::collection::vec((endpoint(), endpoint()), 0..12)
            ) {
                let connections: Vec<_> = pairs
                    .iter()
                    .map(|(s, t)| Connection::new(*s, *t))
                    .collect();
                let all_known = pairs
                    .iter()
                    .all(|(s, t)| KNOWN.contains(s) && KNOWN.contains(t));

                let result = DomainGraph::new(entities(&KNOWN), connections, SequenceDefinitions::new());
                prop_assert_eq!(result.is_ok(), all_known);
            }

            #[test]
            fn neighbor_relation_is_symmetric(
                pairs in prop::collection::vec(
                    (prop::sample::select(KNOWN.to_vec()), prop::sample::select(KNOWN.to_vec())),
                    0..12,
                )
            ) {
                let connections = pairs.iter().map(|(s, t)| Connection::new(*s, *t)).collect();
                let graph = DomainGraph::new(entities(&KNOWN), connections, SequenceDefinitions::new()).unwrap();
                for a in KNOWN {
                    for b in graph.neighbors(a) {
                        prop_assert!(graph.neighbors(b.as_str()).iter().any(|n| *n == a));
                    }
                }
            }
        }
    }
}
