//! Real-time messaging client library.

pub mod config;
pub mod error;
pub mod inbound;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod session;

pub use config::RtmConfig;
pub use error::RtmError;
pub use lifecycle::{run, RunSummary, Shutdown};
