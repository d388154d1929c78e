//! Running a layout in the background.
//!
//! A [`LayoutTask`] owns a [`LayoutInput`] snapshot and computes on its own thread. The shared
//! [`LayoutStore`] is written exactly once, under one write lock, after the whole pipeline has
//! succeeded, and a single [`LayoutEvent`] reports the outcome. Cancellation is cooperative: the
//! pipeline polls the [`CancelToken`] between stages and between bilayers.

use crate::articulate::LayoutResult;
use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::input::LayoutInput;
use crate::model::{Point, Size};
use crate::pipeline::layout_input;
use crossbeam::channel::{self, Receiver};
use rustc_hash::FxHashMap as HashMap;
use serde::Serialize;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// `Err(Error::Cancelled)` once [`cancel`](Self::cancel) was called.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            tracing::debug!("layout cancelled");
            return Err(Error::Cancelled);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutEvent {
    Completed { size: Size, revision: u64 },
    Cancelled,
    Failed(String),
}

/// Positions and bend points shared with the owner of the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutStore<V, E>
where
    V: Eq + Hash,
    E: Eq + Hash,
{
    pub positions: HashMap<V, Point>,
    pub bends: HashMap<E, Vec<Point>>,
    pub size: Size,
    /// Number of layouts written so far.
    pub revision: u64,
}

impl<V, E> Default for LayoutStore<V, E>
where
    V: Eq + Hash,
    E: Eq + Hash,
{
    fn default() -> Self {
        Self {
            positions: HashMap::default(),
            bends: HashMap::default(),
            size: Size::ZERO,
            revision: 0,
        }
    }
}

impl<V, E> LayoutStore<V, E>
where
    V: Eq + Hash,
    E: Eq + Hash,
{
    /// Replaces the stored layout with `result` and returns the new revision.
    pub fn apply(&mut self, result: LayoutResult<V, E>) -> u64 {
        self.positions = result.positions;
        self.bends = result.bends;
        self.size = result.size;
        self.revision += 1;
        self.revision
    }
}

#[derive(Debug)]
pub struct LayoutTask {
    cancel: CancelToken,
    events: Receiver<LayoutEvent>,
    handle: Option<JoinHandle<()>>,
}

impl LayoutTask {
    pub fn spawn<V, E>(
        input: LayoutInput<V, E>,
        config: LayoutConfig,
        store: Arc<RwLock<LayoutStore<V, E>>>,
    ) -> Result<Self>
    where
        V: Clone + Eq + Hash + Send + Sync + 'static,
        E: Clone + Eq + Hash + Send + Sync + 'static,
    {
        config.validate()?;
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let (tx, rx) = channel::bounded(1);

        let handle = std::thread::Builder::new()
            .name("lamina-layout".to_string())
            .spawn(move || {
                let _span = tracing::debug_span!(
                    "layout_task",
                    vertices = input.vertex_count(),
                    edges = input.edge_count()
                )
                .entered();
                let event = run(&input, &config, &token, &store);
                tracing::debug!(?event, "layout task finished");
                if tx.send(event).is_err() {
                    tracing::debug!("layout event dropped, the task handle is gone");
                }
            })
            .map_err(Error::Spawn)?;

        Ok(Self {
            cancel,
            events: rx,
            handle: Some(handle),
        })
    }

    /// Asks the worker to stop at its next check point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Receives the single outcome event.
    pub fn events(&self) -> &Receiver<LayoutEvent> {
        &self.events
    }

    /// Blocks until the worker reports and has exited.
    pub fn wait(mut self) -> Result<LayoutEvent> {
        let event = self.events.recv().map_err(|_| Error::TaskAborted)?;
        if let Some(handle) = self.handle.take() {
            handle.join().map_err(|_| Error::TaskAborted)?;
        }
        Ok(event)
    }
}

fn run<V, E>(
    input: &LayoutInput<V, E>,
    config: &LayoutConfig,
    cancel: &CancelToken,
    store: &RwLock<LayoutStore<V, E>>,
) -> LayoutEvent
where
    V: Clone + Eq + Hash,
    E: Clone + Eq + Hash,
{
    let result = match layout_input(input, config, cancel) {
        Ok(result) => result,
        Err(Error::Cancelled) => return LayoutEvent::Cancelled,
        Err(err) => return LayoutEvent::Failed(err.to_string()),
    };
    if cancel.is_cancelled() {
        return LayoutEvent::Cancelled;
    }

    let size = result.size;
    match store.write() {
        Ok(mut store) => LayoutEvent::Completed {
            size,
            revision: store.apply(result),
        },
        Err(_) => LayoutEvent::Failed("layout store lock is poisoned".to_string()),
    }
}
