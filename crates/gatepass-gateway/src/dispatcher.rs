use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::broadcast;

use gatepass_types::events::DashboardEvent;

/// Publishes record events to all connected dashboard viewers.
///
/// Single topic, fire-and-forget: events are fanned out over a broadcast
/// channel with no backlog, so a viewer that subscribes late only sees
/// events published after it joined. Event production is decoupled from the
/// WebSocket transport — handlers publish here without knowing whether
/// anyone is listening.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    broadcast_tx: broadcast::Sender<DashboardEvent>,
    viewers: AtomicUsize,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(DispatcherInner {
                broadcast_tx,
                viewers: AtomicUsize::new(0),
            }),
        }
    }

    /// Subscribe to record events. Only events published after this call are
    /// delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Publish an event to all current viewers. Having no viewers is fine.
    pub fn broadcast(&self, event: DashboardEvent) {
        let _ = self.inner.broadcast_tx.send(event);
    }

    /// Returns the viewer count after the connect.
    pub fn viewer_connected(&self) -> usize {
        self.inner.viewers.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Returns the viewer count after the disconnect.
    pub fn viewer_disconnected(&self) -> usize {
        self.inner.viewers.fetch_sub(1, Ordering::Relaxed) - 1
    }

    pub fn viewer_count(&self) -> usize {
        self.inner.viewers.load(Ordering::Relaxed)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
