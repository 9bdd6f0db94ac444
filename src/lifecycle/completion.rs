//! One-shot completion signal.
//!
//! A `CompletionNotifier` fires its `Completion` exactly once, when it is
//! dropped. Any number of `Completion` clones may wait on it, before or after
//! it fires.

use tokio::sync::watch;

/// Observer side of the signal.
#[derive(Debug, Clone)]
pub struct Completion {
    rx: watch::Receiver<bool>,
}

/// Firing side of the signal. Fires on drop.
#[derive(Debug)]
pub struct CompletionNotifier {
    tx: watch::Sender<bool>,
}

impl Completion {
    /// Create a linked notifier/observer pair.
    pub fn pair() -> (CompletionNotifier, Completion) {
        let (tx, rx) = watch::channel(false);
        (CompletionNotifier { tx }, Completion { rx })
    }

    /// Whether the signal has fired.
    pub fn is_complete(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the signal fires. Returns immediately if it already has.
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        // Err means the notifier is gone, which also means fired.
        let _ = rx.wait_for(|done| *done).await;
    }
}

impl Drop for CompletionNotifier {
    fn drop(&mut self) {
        self.tx.send_replace(true);
    }
}
