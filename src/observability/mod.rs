//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stderr/stdout through the fmt layer
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Structured fields rather than formatted strings
//! - Metrics are cheap counter increments; without an exporter they are no-ops

pub mod logging;
pub mod metrics;
