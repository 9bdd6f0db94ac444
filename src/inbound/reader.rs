//! Inbound reader task.
//!
//! # Responsibilities
//! - Pull one envelope at a time off the read half
//! - Log each envelope
//! - Stop on the first error and fire the completion signal
//!
//! # Design Decisions
//! - Ping/pong are answered by the transport and skipped here
//! - A clean close and a network error both just end the loop
//! - The completion notifier lives inside the task, so it fires even if the
//!   task is aborted or panics

use futures_util::{Stream, StreamExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::inbound::envelope::Envelope;
use crate::lifecycle::completion::{Completion, CompletionNotifier};
use crate::observability::metrics;

/// Why the reader stopped.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("connection closed by peer{}", close_detail(.code, .reason))]
    Closed { code: Option<u16>, reason: String },

    #[error("connection ended")]
    Ended,

    #[error("transport error: {0}")]
    Transport(#[from] WsError),

    #[error("failed to decode envelope: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ReadError {
    fn label(&self) -> &'static str {
        match self {
            ReadError::Closed { .. } => "closed",
            ReadError::Ended => "ended",
            ReadError::Transport(_) => "transport",
            ReadError::Decode(_) => "decode",
        }
    }
}

fn close_detail(code: &Option<u16>, reason: &str) -> String {
    match (*code, reason.is_empty()) {
        (None, _) => String::new(),
        (Some(code), true) => format!(" (code {})", code),
        (Some(code), false) => format!(" (code {}: {})", code, reason),
    }
}

/// Spawns the reader task.
pub struct InboundReader;

impl InboundReader {
    /// Start reading `stream` on a new task.
    pub fn spawn<St>(stream: St) -> ReaderHandle
    where
        St: Stream<Item = Result<Message, WsError>> + Send + Unpin + 'static,
    {
        let (notifier, completion) = Completion::pair();
        let received = Arc::new(AtomicU64::new(0));
        let counter = received.clone();

        let task = tokio::spawn(read_loop(stream, counter, notifier));

        ReaderHandle {
            task,
            completion,
            received,
        }
    }
}

/// Handle to a running reader. Dropping it aborts the task and releases the
/// read half of the connection.
#[derive(Debug)]
pub struct ReaderHandle {
    task: JoinHandle<()>,
    completion: Completion,
    received: Arc<AtomicU64>,
}

impl ReaderHandle {
    /// Signal fired when the reader stops.
    pub fn completion(&self) -> Completion {
        self.completion.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.completion.is_complete()
    }

    /// Envelopes decoded so far.
    pub fn envelopes_received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }
}

impl Drop for ReaderHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn read_loop<St>(mut stream: St, received: Arc<AtomicU64>, _done: CompletionNotifier)
where
    St: Stream<Item = Result<Message, WsError>> + Unpin,
{
    tracing::debug!("Reader started");

    loop {
        match next_envelope(&mut stream).await {
            Ok(envelope) => {
                received.fetch_add(1, Ordering::Relaxed);
                metrics::record_envelope(&envelope.kind);
                tracing::info!(
                    kind = %envelope.kind,
                    user = %envelope.user,
                    channel = %envelope.channel,
                    text = %envelope.text,
                    "Envelope received"
                );
            }
            Err(e) => {
                metrics::record_reader_stop(e.label());
                tracing::warn!(error = %e, "Reader stopped");
                return;
            }
        }
    }
}

async fn next_envelope<St>(stream: &mut St) -> Result<Envelope, ReadError>
where
    St: Stream<Item = Result<Message, WsError>> + Unpin,
{
    loop {
        let message = match stream.next().await {
            Some(message) => message?,
            None => return Err(ReadError::Ended),
        };

        match message {
            Message::Text(text) => return Ok(serde_json::from_str(text.as_str())?),
            Message::Binary(data) => return Ok(serde_json::from_slice(&data)?),
            Message::Close(frame) => {
                return Err(match frame {
                    Some(frame) => ReadError::Closed {
                        code: Some(u16::from(frame.code)),
                        reason: frame.reason.as_str().to_owned(),
                    },
                    None => ReadError::Closed {
                        code: None,
                        reason: String::new(),
                    },
                })
            }
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
        }
    }
}
