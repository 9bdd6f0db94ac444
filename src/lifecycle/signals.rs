//! OS signal handling.
//!
//! # Responsibilities
//! - Register the Ctrl+C (SIGINT) handler during setup
//! - Translate it into a `Shutdown` trigger
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Registration happens before this returns, so a signal sent right after
//!   setup is never lost
//! - A second SIGINT forces the process to exit
//! - No other signals are handled

use std::io;
use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::Shutdown;

/// Exit status used when a repeated interrupt forces the process down.
pub const FORCED_EXIT_CODE: i32 = 130;

/// Register the interrupt handler and spawn the task feeding `shutdown`.
///
/// The first interrupt triggers `shutdown`; the next one exits the process
/// with [`FORCED_EXIT_CODE`].
#[cfg(unix)]
pub fn install_interrupt_handler(shutdown: &Shutdown) -> io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupts = signal(SignalKind::interrupt())?;
    let shutdown = shutdown.clone();

    Ok(tokio::spawn(async move {
        if interrupts.recv().await.is_none() {
            return;
        }
        tracing::info!("Interrupt received");
        shutdown.trigger();

        if interrupts.recv().await.is_some() {
            tracing::warn!("Second interrupt, forcing exit");
            std::process::exit(FORCED_EXIT_CODE);
        }
    }))
}

/// Register the interrupt handler and spawn the task feeding `shutdown`.
#[cfg(not(unix))]
pub fn install_interrupt_handler(shutdown: &Shutdown) -> io::Result<JoinHandle<()>> {
    let shutdown = shutdown.clone();

    Ok(tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for interrupt signal");
            return;
        }
        tracing::info!("Interrupt received");
        shutdown.trigger();

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Second interrupt, forcing exit");
            std::process::exit(FORCED_EXIT_CODE);
        }
    }))
}
