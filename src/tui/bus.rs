use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::message::Msg;

/// The single channel every event travels through: input, timers,
/// background results and immediate command messages alike.
///
/// The UI thread drains it without blocking; senders live in background
/// tasks.
pub struct MessageBus {
    tx: UnboundedSender<Msg>,
    rx: UnboundedReceiver<Msg>,
}

impl MessageBus {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn push(&self, msg: Msg) {
        // The receiver lives as long as `self`, so this cannot fail.
        let _ = self.tx.send(msg);
    }

    pub fn sender(&self) -> UnboundedSender<Msg> {
        self.tx.clone()
    }

    /// Next queued message, if any. Never blocks.
    pub fn try_next(&mut self) -> Option<Msg> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next message.
    #[cfg(test)]
    pub async fn recv(&mut self) -> Option<Msg> {
        self.rx.recv().await
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}
