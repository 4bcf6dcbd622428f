//! Health Grid Domain Graph
//!
//! Static, read-only description of the network drawn on the globe.
//!
//! # Contents
//!
//! - **Entities**: nodes with a lat/lng position, category, colour and size
//! - **Connections**: edges between entities, optionally tagged by kind
//! - **Sequences**: ordered reveal paths keyed by a trigger entity
//!
//! Everything is validated once in [`DomainGraph::new`]. A connection or
//! sequence that names an unknown entity aborts loading; there is no partial
//! graph.

mod connection;
mod entity;
mod error;
mod graph;
mod sequence;
mod shape;

pub mod sample;

pub use connection::{Connection, ConnectionKind};
pub use entity::{Category, Entity, EntityId, GeoPosition};
pub use error::{GraphError, Result};
pub use graph::{DomainGraph, GraphSpec};
pub use sequence::SequenceDefinitions;
pub use shape::{Shape, SPHERE_SEGMENTS};
