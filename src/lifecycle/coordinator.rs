//! Shutdown coordination for the live connection.
//!
//! # State Machine
//! ```text
//! Running ──interrupt──▶ Closing ──ack or timeout──▶ Terminated
//! ```
//!
//! `Closing` sends one close frame, then waits for the reader to finish or
//! for the close timeout, whichever comes first. Both outcomes are handled
//! the same way.

use futures_util::{Sink, SinkExt};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::{CloseFrame, Message};
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::lifecycle::completion::Completion;
use crate::lifecycle::shutdown::ShutdownListener;
use crate::observability::metrics;

/// Default time allowed for the server to acknowledge the close frame.
pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Coordinator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// Connection live, waiting for the interrupt.
    Running,
    /// Close frame sent or being sent.
    Closing,
    /// Handshake finished or abandoned; safe to release the connection.
    Terminated,
}

/// Errors on the shutdown path.
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("failed to send close frame: {0}")]
    CloseFrame(#[source] WsError),
}

/// Drives the close handshake once the interrupt arrives.
#[derive(Debug)]
pub struct ShutdownCoordinator {
    close_timeout: Duration,
    state: CoordinatorState,
}

impl ShutdownCoordinator {
    pub fn new(close_timeout: Duration) -> Self {
        Self {
            close_timeout,
            state: CoordinatorState::Running,
        }
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    /// Wait for `interrupt`, then close the connection through `sink`.
    ///
    /// `sink` is dropped before this returns, on every path.
    pub async fn run<S>(
        &mut self,
        mut sink: S,
        completion: Completion,
        mut interrupt: ShutdownListener,
    ) -> Result<(), ShutdownError>
    where
        S: Sink<Message, Error = WsError> + Unpin,
    {
        interrupt.recv().await;
        self.transition(CoordinatorState::Closing);

        let started = Instant::now();
        sink.send(close_frame())
            .await
            .map_err(ShutdownError::CloseFrame)?;
        metrics::record_close_handshake();

        // Reader finished or time is up: either way we are done.
        let _ = timeout(self.close_timeout, completion.wait()).await;
        drop(sink);

        self.transition(CoordinatorState::Terminated);
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Close handshake finished"
        );
        Ok(())
    }

    fn transition(&mut self, next: CoordinatorState) {
        tracing::debug!(from = ?self.state, to = ?next, "Coordinator state change");
        self.state = next;
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_CLOSE_TIMEOUT)
    }
}

fn close_frame() -> Message {
    Message::Close(Some(CloseFrame {
        code: CloseCode::Normal,
        reason: "".into(),
    }))
}
