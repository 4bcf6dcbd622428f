//! Draw descriptors derived from the engine's visibility state.

use healthgrid_graph::{Category, Connection, ConnectionKind, DomainGraph, EntityId, Shape};
use healthgrid_reveal::{ConnectionVisibility, EntityVisibility, FrameView, RevealEngine, SessionSnapshot};
use serde::{Deserialize, Serialize};

const ALERT_COLOR: &str = "#ef4444";
const DATA_COLOR: &str = "#d946ef";
const AMBIENT_PIPELINE_COLOR: &str = "rgba(239, 68, 68, 0.6)";
const AMBIENT_DATA_COLOR: &str = "rgba(217, 70, 239, 0.5)";
const HIDDEN_COLOR: &str = "rgba(0,0,0,0)";

/// How to draw one entity this frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDraw {
    pub id: EntityId,
    pub lat: f64,
    pub lng: f64,
    pub label: String,
    pub color: String,
    pub shape: Shape,
    pub visibility: EntityVisibility,
    pub opacity: f32,
    pub emissive_intensity: f32,
    pub light_intensity: f32,
}

impl NodeDraw {
    fn new(entity: &healthgrid_graph::Entity, visibility: EntityVisibility) -> Self {
        let (opacity, emissive_intensity, light_intensity) = match visibility {
            EntityVisibility::Emphasized => (0.9, 1.0, 1.0),
            EntityVisibility::Revealed => (0.9, 0.6, 1.0),
            EntityVisibility::Dimmed => (0.2, 0.0, 0.1),
        };
        Self {
            id: entity.id.clone(),
            lat: entity.position.lat,
            lng: entity.position.lng,
            label: entity.label.clone(),
            color: entity.color.clone(),
            shape: Shape::for_entity(entity),
            visibility,
            opacity,
            emissive_intensity,
            light_intensity,
        }
    }
}

/// How to draw one arc this frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcDraw {
    pub source: EntityId,
    pub target: EntityId,
    pub kind: Option<ConnectionKind>,
    pub visibility: ConnectionVisibility,
    pub color: String,
    pub stroke: f32,
    pub altitude: f32,
    pub dash_length: f32,
    pub dash_gap: f32,
    pub dash_animate_ms: u32,
}

impl ArcDraw {
    fn new(connection: &Connection, visibility: ConnectionVisibility) -> Self {
        let color = match visibility {
            ConnectionVisibility::Ambient if connection.is_pipeline() => AMBIENT_PIPELINE_COLOR,
            ConnectionVisibility::Ambient => AMBIENT_DATA_COLOR,
            ConnectionVisibility::Revealed if connection.is_alert() => ALERT_COLOR,
            ConnectionVisibility::Revealed => DATA_COLOR,
            ConnectionVisibility::Hidden => HIDDEN_COLOR,
        };
        // The ambient layer draws every arc as active
        let active = visibility != ConnectionVisibility::Hidden;
        let (dash_gap, dash_animate_ms) = if connection.is_pipeline() {
            (0.5, 3000)
        } else {
            (0.1, 1500)
        };

        Self {
            source: connection.source.clone(),
            target: connection.target.clone(),
            kind: connection.kind,
            visibility,
            color: color.to_string(),
            stroke: if active { 2.5 } else { 0.5 },
            altitude: if active { 0.25 } else { 0.1 },
            dash_length: 0.4,
            dash_gap,
            dash_animate_ms,
        }
    }
}

/// One step in the sidebar's sequence list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    pub id: EntityId,
    pub label: String,
    pub revealed: bool,
    pub current: bool,
}

/// Details panel for the selected entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sidebar {
    pub title: String,
    pub category: Category,
    pub color: String,
    /// Labels of highlighted neighbors (neighbor mode)
    pub connections: Vec<String>,
    /// Path steps (sequence mode)
    pub steps: Vec<StepInfo>,
}

impl Sidebar {
    fn build(graph: &DomainGraph, session: &SessionSnapshot) -> Option<Self> {
        let selected = session.selected_entity_id.as_ref()?;
        let entity = graph.entity(selected.as_str())?;
        let label_of = |id: &EntityId| {
            graph
                .entity(id.as_str())
                .map_or_else(|| id.to_string(), |e| e.label.clone())
        };

        let connections = session
            .highlighted
            .iter()
            .filter(|id| *id != selected)
            .map(label_of)
            .collect();
        let steps = session
            .active_path
            .iter()
            .enumerate()
            .map(|(i, id)| StepInfo {
                id: id.clone(),
                label: label_of(id),
                revealed: i <= session.cursor,
                current: i == session.cursor,
            })
            .collect();

        Some(Self {
            title: entity.label.clone(),
            category: entity.category.clone(),
            color: entity.color.clone(),
            connections,
            steps,
        })
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub session: SessionSnapshot,
    /// Always-on rendering of every connection
    pub default_layer: bool,
    /// Globe spins while nothing is focused
    pub auto_rotate: bool,
    pub nodes: Vec<NodeDraw>,
    pub arcs: Vec<ArcDraw>,
    pub sidebar: Option<Sidebar>,
}

impl Frame {
    /// Classify every entity and connection against the engine's state.
    pub fn build(engine: &RevealEngine) -> Self {
        let graph = engine.graph();
        let view: FrameView<'_> = engine.view();
        let session = engine.current_session();

        let nodes = graph
            .entities()
            .iter()
            .map(|entity| NodeDraw::new(entity, view.entity_visibility(entity.id.as_str())))
            .collect();
        let arcs = graph
            .connections()
            .iter()
            .map(|conn| ArcDraw::new(conn, view.connection_visibility(conn)))
            .collect();
        let sidebar = Sidebar::build(graph, &session);

        Self {
            default_layer: view.default_layer_visible(),
            auto_rotate: view.default_layer_visible(),
            session,
            nodes,
            arcs,
            sidebar,
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodeDraw> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn arc(&self, source: &str, target: &str) -> Option<&ArcDraw> {
        self.arcs
            .iter()
            .find(|a| a.source == source && a.target == target)
    }
}
