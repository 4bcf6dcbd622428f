//! Async playback driver.
//!
//! Wraps a [`RevealEngine`] behind a tokio `RwLock` and runs the stepped
//! reveal on a spawned task. Every transition happens under the write lock,
//! so selections, closes, and timer ticks are serialized. A new selection
//! aborts the previous playback task. If the abort loses a race with a tick
//! already waiting on the lock, the engine rejects the stale [`TickHandle`].

use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::engine::{RevealEngine, SessionSnapshot, TickHandle, TickOutcome};
use crate::error::Result;

struct Inner {
    engine: RevealEngine,
    pending: Option<JoinHandle<()>>,
}

impl Inner {
    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
            trace!("pending playback task aborted");
        }
    }
}

/// Owns the engine and its playback timer.
pub struct RevealDriver {
    inner: Arc<RwLock<Inner>>,
    revision: Arc<watch::Sender<u64>>,
}

impl RevealDriver {
    /// Take ownership of `engine`. Selections spawn the playback task, so
    /// [`select`](Self::select) must run inside a tokio runtime.
    pub fn new(engine: RevealEngine) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(Inner {
                engine,
                pending: None,
            })),
            revision: Arc::new(revision),
        }
    }

    /// Select an entity, replacing the current session and its timer.
    ///
    /// An unknown id is rejected without touching the running session.
    pub async fn select(&self, id: &str) -> Result<SessionSnapshot> {
        let mut inner = self.inner.write().await;
        let handle = inner.engine.select(id)?;

        inner.cancel_pending();
        if let Some(handle) = handle {
            inner.pending = Some(self.spawn_playback(handle));
        }
        bump(&self.revision);
        Ok(inner.engine.current_session())
    }

    /// Close the current session and cancel its timer.
    pub async fn close(&self) -> SessionSnapshot {
        let mut inner = self.inner.write().await;
        inner.cancel_pending();
        if inner.engine.close() {
            bump(&self.revision);
        }
        inner.engine.current_session()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.read().await.engine.current_session()
    }

    /// Run a read-only query against the engine.
    pub async fn with_view<R>(&self, f: impl FnOnce(&RevealEngine) -> R) -> R {
        let inner = self.inner.read().await;
        f(&inner.engine)
    }

    /// True while a playback task is scheduled.
    pub async fn has_pending(&self) -> bool {
        self.inner
            .read()
            .await
            .pending
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Receiver that changes whenever the visible state changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision counter.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn spawn_playback(&self, first: TickHandle) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let revision = Arc::clone(&self.revision);

        tokio::spawn(async move {
            let mut handle = first;
            loop {
                tokio::time::sleep(handle.delay()).await;

                let mut guard = inner.write().await;
                match guard.engine.advance(handle) {
                    TickOutcome::Advanced { next: Some(next), .. } => {
                        bump(&revision);
                        handle = next;
                    }
                    TickOutcome::Advanced { next: None, cursor } => {
                        debug!(session = %handle.session(), cursor, "playback settled");
                        guard.pending = None;
                        bump(&revision);
                        break;
                    }
                    TickOutcome::Stale | TickOutcome::Ignored => break,
                }
            }
        })
    }
}

impl Drop for RevealDriver {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_write() {
            inner.cancel_pending();
        }
    }
}

fn bump(revision: &watch::Sender<u64>) {
    revision.send_modify(|r| *r += 1);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::engine::{EngineState, RevealConfig};
    use crate::error::RevealError;
    use crate::resolver::RevealMode;
    use healthgrid_graph::{sample, EntityId};
    use tokio::time::sleep;

    fn driver() -> RevealDriver {
        let graph = Arc::new(sample::health_grid().unwrap());
        RevealDriver::new(RevealEngine::new(
            graph,
            RevealConfig {
                mode: RevealMode::Sequence,
                ..Default::default()
            },
        ))
    }

    fn ids(path: &[EntityId]) -> Vec<&str> {
        path.iter().map(EntityId::as_str).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn steps_arrive_on_cadence() {
        let driver = driver();
        let snap = driver.select("twban").await.unwrap();
        assert_eq!(snap.cursor, 0);

        sleep(Duration::from_millis(799)).await;
        assert_eq!(driver.snapshot().await.cursor, 0);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(driver.snapshot().await.cursor, 1);

        sleep(Duration::from_millis(1700)).await;
        let snap = driver.snapshot().await;
        assert_eq!(snap.cursor, 3);
        assert!(snap.is_complete);
        assert_eq!(snap.state, EngineState::Settled);
        assert!(!driver.has_pending().await);
    }

    #[tokio::test(start_paused = true)]
    async fn new_selection_cancels_old_timer() {
        let driver = driver();
        driver.select("twban").await.unwrap();

        sleep(Duration::from_millis(400)).await;
        driver.select("home").await.unwrap();

        // twban's first tick would have fired at 800ms
        sleep(Duration::from_millis(500)).await;
        let snap = driver.snapshot().await;
        assert_eq!(
            ids(&snap.active_path),
            vec!["home", "server", "hospital", "ambulance"]
        );
        assert_eq!(snap.cursor, 0);

        sleep(Duration::from_millis(400)).await;
        assert_eq!(driver.snapshot().await.cursor, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn close_stops_playback() {
        let driver = driver();
        driver.select("digidoc").await.unwrap();
        sleep(Duration::from_millis(900)).await;

        let snap = driver.close().await;
        assert_eq!(snap.state, EngineState::Idle);
        assert!(snap.active_path.is_empty());
        assert!(!driver.has_pending().await);

        sleep(Duration::from_secs(5)).await;
        let snap = driver.snapshot().await;
        assert_eq!(snap.state, EngineState::Idle);
        assert!(driver.with_view(|engine| engine.view().default_layer_visible()).await);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_selection_keeps_playback_running() {
        let driver = driver();
        driver.select("twban").await.unwrap();
        sleep(Duration::from_millis(100)).await;

        let err = driver.select("does-not-exist").await.unwrap_err();
        assert_eq!(err, RevealError::UnknownEntity(EntityId::from("does-not-exist")));

        sleep(Duration::from_millis(750)).await;
        let snap = driver.snapshot().await;
        assert_eq!(snap.selected_entity_id.unwrap(), "twban");
        assert_eq!(snap.cursor, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn replay_restarts_from_first_step() {
        let driver = driver();
        driver.select("market").await.unwrap();
        sleep(Duration::from_secs(3)).await;
        assert!(driver.snapshot().await.is_complete);

        let snap = driver.select("market").await.unwrap();
        assert_eq!(snap.cursor, 0);
        assert_eq!(snap.state, EngineState::Playing);
        assert!(driver.has_pending().await);
    }

    #[tokio::test(start_paused = true)]
    async fn revision_tracks_visible_changes() {
        let driver = driver();
        let mut rx = driver.subscribe();
        assert_eq!(driver.revision(), 0);

        driver.select("hospital").await.unwrap();
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        rx.changed().await.unwrap();
        assert_eq!(driver.snapshot().await.cursor, 1);

        // closing an idle engine is not a change
        driver.close().await;
        let after_close = driver.revision();
        driver.close().await;
        assert_eq!(driver.revision(), after_close);
    }
}
