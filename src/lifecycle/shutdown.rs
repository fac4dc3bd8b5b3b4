//! Stop signal shared by the listener and the health monitor.

use tokio::sync::broadcast;

/// Fans one stop request out to every task that subscribed.
///
/// Receivers must be taken before the signal is sent; a late subscriber
/// does not see it.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver handed to `startup::run` or `HttpServer::run`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask the server and monitor to stop. A no-op with nobody listening.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
