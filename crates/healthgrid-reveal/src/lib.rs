//! Health Grid Reveal Engine
//!
//! Decides which entities and connections are in focus after a selection and
//! animates that focus over discrete steps.
//!
//! # Architecture
//!
//! - **Resolver**: selection -> neighbor set or predefined path
//! - **Engine**: `Idle` / `Playing` / `Settled` state machine with a stepped cursor
//! - **Visibility**: pure per-frame queries for the renderer
//! - **Scheduler**: tokio task that feeds ticks to the engine and is cancelled
//!   on every new selection
//!
//! # Usage
//!
//! ```ignore
//! let graph = Arc::new(sample::health_grid()?);
//! let driver = RevealDriver::new(RevealEngine::new(graph, RevealConfig {
//!     mode: RevealMode::Sequence,
//!     ..Default::default()
//! }));
//!
//! driver.select("twban").await?;
//! let revealed = driver.with_view(|engine| engine.view().is_entity_revealed("server")).await;
//! ```

mod engine;
mod error;
mod resolver;
mod scheduler;
mod visibility;

pub use engine::{
    EngineState, RevealConfig, RevealEngine, SessionId, SessionSnapshot, TickHandle, TickOutcome,
    DEFAULT_STEP_INTERVAL,
};
pub use error::{Result, RevealError};
pub use resolver::{resolve, resolve_neighbors, resolve_sequence, Highlight, ResolvedSelection, RevealMode};
pub use scheduler::RevealDriver;
pub use visibility::{ConnectionVisibility, EntityVisibility, FrameView};
