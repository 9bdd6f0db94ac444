//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     (Start session → Connect) raced against interrupt
//!         → Split → Spawn reader → Coordinator
//!
//! Shutdown (coordinator.rs):
//!     Interrupt → Send close frame → Reader done or timeout → Release
//!
//! Signals (signals.rs):
//!     SIGINT → Shutdown::trigger (shutdown.rs)
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The interrupt is the only way to end a healthy session
//! - Shutdown has timeout: it never waits on the server past the deadline

pub mod completion;
pub mod coordinator;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use completion::Completion;
pub use coordinator::{CoordinatorState, ShutdownCoordinator, ShutdownError};
pub use shutdown::{Shutdown, ShutdownListener};
pub use startup::{run, RunSummary};
