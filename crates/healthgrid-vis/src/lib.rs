//! Health Grid Visualization
//!
//! Presentation boundary for the reveal engine: per-frame draw descriptors
//! served over HTTP and pushed over WebSocket.
//!
//! # Architecture
//!
//! - **Frame**: classifies every entity and arc into draw parameters
//! - **WebSocket**: pushes a fresh frame whenever the session changes
//! - **REST API**: select / close, read session and frame
//!
//! # Usage
//!
//! ```ignore
//! let config = VisConfig::from_env()?;
//! let graph = Arc::new(config.load_graph()?);
//!
//! let server = VisServer::new(RevealEngine::new(graph, config.reveal));
//! server.serve(config.addr).await?;
//! ```

mod config;
mod error;
mod frame;
mod server;

pub use config::VisConfig;
pub use error::{Result, VisError};
pub use frame::{ArcDraw, Frame, NodeDraw, Sidebar, StepInfo};
pub use server::VisServer;
