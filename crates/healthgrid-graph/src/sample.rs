//! The built-in health grid.

use crate::error::Result;
use crate::{
    Category, Connection, ConnectionKind, DomainGraph, Entity, GeoPosition, GraphSpec,
    SequenceDefinitions,
};

/// Entities, connections and reveal sequences of the default grid.
pub fn health_grid_spec() -> GraphSpec {
    use Category::*;
    use ConnectionKind::*;

    let entities = vec![
        // Central hub
        Entity::new("server", GeoPosition::new(38.0, -95.0), "My Telth Server", Hub, "#d946ef", 12.0),
        // Data sources
        Entity::new("twban", GeoPosition::new(22.0, 79.0), "TWBAN (Patient)", Source, "#06b6d4", 4.0),
        Entity::new("home", GeoPosition::new(55.0, -105.0), "Telth Home", Source, "#06b6d4", 4.0),
        // Care providers
        Entity::new("doctor", GeoPosition::new(-15.0, -55.0), "Doctor", Provider, "#ffffff", 4.0),
        Entity::new("hospital", GeoPosition::new(50.0, 10.0), "Tertiary Hospital", Provider, "#ef4444", 5.0),
        Entity::new("digidoc", GeoPosition::new(35.0, 135.0), "DigiDoc AI", Provider, "#ffffff", 4.0),
        // Logistics
        Entity::new("pharmacy", GeoPosition::new(45.0, 25.0), "G-Med ID", Logistics, "#eab308", 3.5),
        Entity::new("drone", GeoPosition::new(52.0, 12.0), "T-Chopper", Logistics, "#ef4444", 3.0),
        Entity::new("ambulance", GeoPosition::new(48.0, 8.0), "Ambulance", Logistics, "#ef4444", 3.0),
        // Ecosystem
        Entity::new("market", GeoPosition::new(5.0, 20.0), "Telth Market", Ecosystem, "#f472b6", 4.0)
            .with_pipeline(),
        Entity::new("rnd", GeoPosition::new(52.0, -1.0), "R&D Center", Ecosystem, "#4ade80", 4.0),
    ];

    let connections = vec![
        // Into the server
        Connection::with_kind("twban", "server", Data),
        Connection::with_kind("home", "server", Data),
        Connection::with_kind("digidoc", "server", Data),
        Connection::with_kind("market", "server", Pipeline),
        // Out of the server
        Connection::with_kind("server", "doctor", Data),
        Connection::with_kind("server", "hospital", Data),
        Connection::with_kind("server", "pharmacy", Data),
        Connection::with_kind("server", "rnd", Data),
        // Between the edges
        Connection::with_kind("doctor", "pharmacy", Data),
        Connection::with_kind("hospital", "drone", Emergency),
        Connection::with_kind("hospital", "ambulance", Emergency),
        Connection::with_kind("twban", "digidoc", Data),
        Connection::with_kind("twban", "pharmacy", Data),
    ];

    let sequences = SequenceDefinitions::new()
        .with("twban", ["twban", "server", "doctor", "pharmacy"])
        .with("home", ["home", "server", "hospital", "ambulance"])
        .with("hospital", ["hospital", "server", "pharmacy"])
        .with("digidoc", ["digidoc", "twban", "pharmacy", "doctor"])
        .with("market", ["market", "server", "rnd"])
        .with("drone", ["drone"]);

    GraphSpec {
        entities,
        connections,
        sequences,
    }
}

/// Validated default grid.
pub fn health_grid() -> Result<DomainGraph> {
    DomainGraph::from_spec(health_grid_spec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_passes_validation() {
        let graph = health_grid().unwrap();
        assert_eq!(graph.entities().len(), 11);
        assert_eq!(graph.connections().len(), 13);
    }

    #[test]
    fn sample_sequences_follow_real_connections() {
        let graph = health_grid().unwrap();
        for (trigger, path) in graph.sequences().iter() {
            assert_eq!(path[0], *trigger);
            for pair in path.windows(2) {
                assert!(
                    graph
                        .connections()
                        .iter()
                        .any(|c| c.joins(pair[0].as_str(), pair[1].as_str())),
                    "{trigger}: no connection between {} and {}",
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn server_neighbors() {
        let graph = health_grid().unwrap();
        let mut ids: Vec<_> = graph.neighbors("server").into_iter().map(|id| id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(
            ids,
            vec!["digidoc", "doctor", "home", "hospital", "market", "pharmacy", "rnd", "twban"]
        );
    }
}
