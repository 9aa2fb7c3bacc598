//! Background execution of [`TaskKind`]s.
//!
//! A single worker pulls dispatches from an unbounded channel and spawns one
//! Tokio task per dispatch, so fetches overlap and may complete in any order.
//! Each completion is sent back to the app loop as an [`Action`]. Nothing is
//! cancelled: superseded division fetches still finish and the reducer
//! decides whether their result applies.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use geography::GeographySource;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::core::effects::TaskKind;

pub type TaskId = u64;

/// Handle for scheduling background work. Clones share the same worker.
#[derive(Clone)]
pub struct TaskExecutor {
    tx: mpsc::UnboundedSender<Dispatch>,
}

struct Dispatch {
    id: TaskId,
    kind: TaskKind,
}

impl TaskExecutor {
    /// Spawn the worker. Must be called inside a Tokio runtime.
    pub fn new(source: Arc<dyn GeographySource>, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Dispatch>();
        Worker {
            rx,
            source,
            action_tx,
        }
        .spawn();
        Self { tx }
    }

    pub fn spawn(&self, kind: TaskKind) -> TaskId {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        if let Err(e) = self.tx.send(Dispatch { id, kind }) {
            warn!("TaskExecutor channel closed; failed to schedule task: {}", e.0.kind);
        }
        id
    }
}

struct Worker {
    rx: mpsc::UnboundedReceiver<Dispatch>,
    source: Arc<dyn GeographySource>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Worker {
    fn spawn(mut self) {
        tokio::spawn(async move {
            while let Some(dispatch) = self.rx.recv().await {
                let source = Arc::clone(&self.source);
                let action_tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let action = run(dispatch, source.as_ref()).await;
                    if action_tx.send(action).is_err() {
                        debug!("app loop gone; dropping task result");
                    }
                });
            }
            info!("TaskExecutor worker stopped (channel closed)");
        });
    }
}

async fn run(dispatch: Dispatch, source: &dyn GeographySource) -> Action {
    debug!("[task:{}] {}", dispatch.id, dispatch.kind);
    match dispatch.kind {
        TaskKind::FetchRegions => match source.list_regions().await {
            Ok(regions) => {
                info!("[task:{}] {} regions loaded", dispatch.id, regions.len());
                Action::RegionsLoaded(regions)
            }
            Err(e) => {
                warn!("[task:{}] region lookup failed: {e}", dispatch.id);
                Action::GeographyFailed {
                    lookup: "os estados".into(),
                    message: e.to_string(),
                }
            }
        },
        TaskKind::FetchDivisions(request) => {
            let result = source.list_divisions(&request.region).await;
            match result {
                Ok(divisions) => {
                    info!(
                        "[task:{}] {} divisions loaded for {}",
                        dispatch.id,
                        divisions.len(),
                        request.region
                    );
                    Action::DivisionsLoaded { request, divisions }
                }
                // the "none selected" lookup at startup is expected to fail; it
                // leaves the list empty without raising a notice
                Err(e) if request.region.is_none() => {
                    debug!("[task:{}] sentinel division lookup failed: {e}", dispatch.id);
                    Action::DivisionsLoaded {
                        request,
                        divisions: Vec::new(),
                    }
                }
                Err(e) => {
                    warn!("[task:{}] division lookup failed: {e}", dispatch.id);
                    Action::GeographyFailed {
                        lookup: format!("as cidades de {}", request.region),
                        message: e.to_string(),
                    }
                }
            }
        }
    }
}
