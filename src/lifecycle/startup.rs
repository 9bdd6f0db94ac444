//! Startup orchestration.
//!
//! # Responsibilities
//! - Exchange the token for a session descriptor
//! - Dial the endpoint and split the connection
//! - Start the reader, then hand control to the coordinator
//!
//! # Design Decisions
//! - Steps run in order, each one fatal on failure
//! - The session request and the dial have no deadline of their own, so both
//!   race the interrupt; an interrupt there ends the run cleanly without
//!   dialing
//! - Both connection halves are owned values, so release happens on drop
//!   whichever way `run` returns

use futures_util::StreamExt;

use crate::config::RtmConfig;
use crate::error::RtmError;
use crate::inbound::InboundReader;
use crate::lifecycle::coordinator::ShutdownCoordinator;
use crate::lifecycle::shutdown::ShutdownListener;
use crate::net::connector::{self, WsConnection};
use crate::session::SessionClient;

/// What happened during a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Envelopes the reader decoded before shutdown.
    pub envelopes_received: u64,
}

/// Run one session from bootstrap to interrupt-driven shutdown.
pub async fn run(config: &RtmConfig, mut interrupt: ShutdownListener) -> Result<RunSummary, RtmError> {
    let connection = tokio::select! {
        biased;
        _ = interrupt.recv() => {
            tracing::info!("Interrupted during startup, not connecting");
            return Ok(RunSummary { envelopes_received: 0 });
        }
        connection = establish(config) => connection?,
    };
    let (sink, stream) = connection.split();

    let reader = InboundReader::spawn(stream);
    let mut coordinator = ShutdownCoordinator::new(config.shutdown.close_timeout());
    let outcome = coordinator.run(sink, reader.completion(), interrupt).await;

    let summary = RunSummary {
        envelopes_received: reader.envelopes_received(),
    };
    drop(reader);

    outcome?;
    tracing::info!(envelopes = summary.envelopes_received, "Session ended");
    Ok(summary)
}

async fn establish(config: &RtmConfig) -> Result<WsConnection, RtmError> {
    let client = SessionClient::new(&config.session)?;
    let descriptor = client.start(&config.session.token).await?;
    Ok(connector::connect(&descriptor.endpoint).await?)
}
