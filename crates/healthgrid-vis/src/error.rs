//! Error types for the visualization server.

use thiserror::Error;

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, VisError>;

#[derive(Debug, Error)]
pub enum VisError {
    /// Bad environment value
    #[error("Config error: {0}")]
    Config(String),

    /// Graph data rejected at load
    #[error("Graph error: {0}")]
    Graph(#[from] healthgrid_graph::GraphError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
