//! The reveal state machine.
//!
//! ```text
//!            select              tick (cursor < last)
//!   Idle ─────────────▶ Playing ◀──────────┐
//!    ▲                     │ └─────────────┘
//!    │ close               │ tick (cursor == last)
//!    │                     ▼
//!    └──────────────── Settled
//! ```
//!
//! A selection from any state discards the current session and starts a new
//! one with a fresh [`SessionId`]. Timing lives outside the engine: entering
//! or staying in `Playing` hands out a [`TickHandle`], and whoever owns the
//! clock feeds it back to [`RevealEngine::advance`] after the handle's delay.
//! Handles from a superseded session are rejected, so a late tick can never
//! touch a newer session.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use healthgrid_graph::{DomainGraph, EntityId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::error::Result;
use crate::resolver::{self, Highlight, ResolvedSelection, RevealMode};
use crate::visibility::FrameView;

/// Delay between sequence steps.
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(800);

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealConfig {
    pub mode: RevealMode,
    /// Time between successive reveal steps in sequence mode
    pub step_interval: Duration,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            mode: RevealMode::Neighbor,
            step_interval: DEFAULT_STEP_INTERVAL,
        }
    }
}

/// Identifies one selection's session. Never reused within an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    /// No session
    Idle,
    /// Sequence playback is advancing
    Playing,
    /// Session active, nothing left to reveal
    Settled,
}

/// Permission to advance one step of a specific session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickHandle {
    session: SessionId,
    delay: Duration,
}

impl TickHandle {
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// How long to wait before presenting this handle.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Result of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Cursor moved; `next` is set while playback continues
    Advanced {
        cursor: usize,
        next: Option<TickHandle>,
    },
    /// Handle belongs to a session that no longer exists
    Stale,
    /// Nothing is playing (idle or settled)
    Ignored,
}

#[derive(Debug, Clone)]
pub(crate) enum Focus {
    Highlight(Highlight),
    Playback { path: Vec<EntityId>, cursor: usize },
}

#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) id: SessionId,
    pub(crate) selected: EntityId,
    pub(crate) focus: Focus,
}

impl Session {
    fn state(&self) -> EngineState {
        match &self.focus {
            Focus::Playback { path, cursor } if *cursor + 1 < path.len() => EngineState::Playing,
            _ => EngineState::Settled,
        }
    }
}

/// Selection-driven reveal engine.
///
/// Owns the only mutable state in the core. All transitions go through
/// `&mut self`, so a replacement session is never observed half-built.
#[derive(Debug)]
pub struct RevealEngine {
    graph: Arc<DomainGraph>,
    config: RevealConfig,
    next_session: u64,
    session: Option<Session>,
}

impl RevealEngine {
    /// Create an idle engine over `graph`.
    pub fn new(graph: Arc<DomainGraph>, config: RevealConfig) -> Self {
        Self {
            graph,
            config,
            next_session: 1,
            session: None,
        }
    }

    pub fn graph(&self) -> &Arc<DomainGraph> {
        &self.graph
    }

    pub fn config(&self) -> RevealConfig {
        self.config
    }

    pub fn mode(&self) -> RevealMode {
        self.config.mode
    }

    pub fn state(&self) -> EngineState {
        self.session
            .as_ref()
            .map_or(EngineState::Idle, Session::state)
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Start a new session for `id`, replacing any current one.
    ///
    /// Re-selecting the current entity replays from the first step. On
    /// `UnknownEntity` the engine is left exactly as it was.
    pub fn select(&mut self, id: &str) -> Result<Option<TickHandle>> {
        let resolved = match resolver::resolve(&self.graph, self.config.mode, id) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(entity = id, "selection rejected: {}", e);
                return Err(e);
            }
        };

        let session_id = SessionId(self.next_session);
        self.next_session += 1;

        let (selected, focus) = match resolved {
            ResolvedSelection::Neighbors { selected, highlight } => {
                (selected, Focus::Highlight(highlight))
            }
            ResolvedSelection::Sequence { selected, path } => {
                (selected, Focus::Playback { path, cursor: 0 })
            }
        };

        if let Some(previous) = self.session.take() {
            debug!(previous = %previous.id, "discarding session");
        }
        self.session = Some(Session {
            id: session_id,
            selected,
            focus,
        });

        info!(
            session = %session_id,
            entity = id,
            mode = %self.config.mode,
            state = ?self.state(),
            "session started"
        );
        Ok(self.pending_tick())
    }

    /// End the current session. Returns false if already idle.
    pub fn close(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                info!(session = %session.id, entity = %session.selected, "session closed");
                true
            }
            None => false,
        }
    }

    /// Advance the session `handle` was issued for.
    pub fn advance(&mut self, handle: TickHandle) -> TickOutcome {
        if self.session_id() != Some(handle.session) {
            trace!(session = %handle.session, "stale tick ignored");
            return TickOutcome::Stale;
        }
        self.tick()
    }

    /// Advance whatever session is current by one step.
    pub fn tick(&mut self) -> TickOutcome {
        let delay = self.config.step_interval;
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Ignored;
        };
        let session_id = session.id;
        let Focus::Playback { path, cursor } = &mut session.focus else {
            return TickOutcome::Ignored;
        };
        if *cursor + 1 >= path.len() {
            return TickOutcome::Ignored;
        }

        *cursor += 1;
        let cursor = *cursor;
        let next = (cursor + 1 < path.len()).then_some(TickHandle {
            session: session_id,
            delay,
        });
        debug!(
            session = %session_id,
            cursor,
            entity = %path[cursor],
            settled = next.is_none(),
            "reveal step"
        );
        TickOutcome::Advanced { cursor, next }
    }

    /// The handle the current session is waiting on, if it is playing.
    pub fn pending_tick(&self) -> Option<TickHandle> {
        match (&self.session, self.state()) {
            (Some(session), EngineState::Playing) => Some(TickHandle {
                session: session.id,
                delay: self.config.step_interval,
            }),
            _ => None,
        }
    }

    /// Read-only snapshot for UI display.
    pub fn current_session(&self) -> SessionSnapshot {
        let state = self.state();
        let Some(session) = &self.session else {
            return SessionSnapshot::idle(self.config.mode);
        };

        let (active_path, cursor, highlighted) = match &session.focus {
            Focus::Highlight(highlight) => (Vec::new(), 0, highlight.ids().to_vec()),
            Focus::Playback { path, cursor } => (path.clone(), *cursor, Vec::new()),
        };
        let is_complete = active_path.is_empty() || cursor + 1 == active_path.len();

        SessionSnapshot {
            session_id: Some(session.id),
            mode: self.config.mode,
            state,
            selected_entity_id: Some(session.selected.clone()),
            active_path,
            cursor,
            is_complete,
            highlighted,
        }
    }

    /// Per-frame visibility queries against the current state.
    pub fn view(&self) -> FrameView<'_> {
        FrameView::new(self.session.as_ref())
    }
}

/// Snapshot of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Option<SessionId>,
    pub mode: RevealMode,
    pub state: EngineState,
    pub selected_entity_id: Option<EntityId>,
    /// Ordered reveal path (sequence mode)
    pub active_path: Vec<EntityId>,
    /// Revealed through this index, inclusive
    pub cursor: usize,
    pub is_complete: bool,
    /// Highlighted set in display order (neighbor mode)
    pub highlighted: Vec<EntityId>,
}

impl SessionSnapshot {
    fn idle(mode: RevealMode) -> Self {
        Self {
            session_id: None,
            mode,
            state: EngineState::Idle,
            selected_entity_id: None,
            active_path: Vec::new(),
            cursor: 0,
            is_complete: true,
            highlighted: Vec::new(),
        }
    }

    /// Path steps revealed so far.
    pub fn revealed_steps(&self) -> &[EntityId] {
        self.active_path
            .get(..=self.cursor)
            .unwrap_or_default()
    }
}
