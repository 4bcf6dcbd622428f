//! Health Grid Visualization Server
//!
//! Load the grid, start the reveal engine and serve the frontend API.

use std::sync::Arc;

use healthgrid_reveal::RevealEngine;
use healthgrid_vis::{VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> healthgrid_vis::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "healthgrid_vis=info,healthgrid_reveal=info,healthgrid_graph=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = VisConfig::from_env()?;
    let graph = Arc::new(config.load_graph()?);

    tracing::info!(
        entities = graph.entities().len(),
        connections = graph.connections().len(),
        sequences = graph.sequences().len(),
        mode = %config.reveal.mode,
        step_ms = config.reveal.step_interval.as_millis() as u64,
        source = %config
            .graph_path
            .as_ref()
            .map_or_else(|| "built-in".to_string(), |p| p.display().to_string()),
        "Starting health grid server"
    );

    let server = VisServer::new(RevealEngine::new(graph, config.reveal));
    server.serve(config.addr).await?;

    Ok(())
}
