//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use healthgrid_graph::{sample, DomainGraph};
use healthgrid_reveal::{RevealConfig, RevealMode, DEFAULT_STEP_INTERVAL};

use crate::error::{Result, VisError};

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Configuration for the visualization server.
#[derive(Debug, Clone, PartialEq)]
pub struct VisConfig {
    /// HTTP listen address
    pub addr: SocketAddr,

    /// Reveal policy and step cadence
    pub reveal: RevealConfig,

    /// JSON graph file; the built-in sample grid when unset
    pub graph_path: Option<PathBuf>,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            reveal: RevealConfig::default(),
            graph_path: None,
        }
    }
}

impl VisConfig {
    /// Read `HEALTHGRID_*` variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr: SocketAddr = lookup("HEALTHGRID_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse()
            .map_err(|e| VisError::Config(format!("HEALTHGRID_ADDR: {e}")))?;

        let mode = match lookup("HEALTHGRID_MODE") {
            Some(raw) => raw
                .parse::<RevealMode>()
                .map_err(|e| VisError::Config(format!("HEALTHGRID_MODE: {e}")))?,
            None => RevealMode::default(),
        };

        let step_interval = match lookup("HEALTHGRID_STEP_MS") {
            Some(raw) => {
                let ms: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|e| VisError::Config(format!("HEALTHGRID_STEP_MS: {e}")))?;
                if ms == 0 {
                    return Err(VisError::Config(
                        "HEALTHGRID_STEP_MS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_millis(ms)
            }
            None => DEFAULT_STEP_INTERVAL,
        };

        let graph_path = lookup("HEALTHGRID_GRAPH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            addr,
            reveal: RevealConfig {
                mode,
                step_interval,
            },
            graph_path,
        })
    }

    /// Load and validate the configured graph.
    pub fn load_graph(&self) -> Result<DomainGraph> {
        let graph = match &self.graph_path {
            Some(path) => DomainGraph::from_json_file(path)?,
            None => sample::health_grid()?,
        };
        Ok(graph)
    }
}
