//! Inbound event subsystem.
//!
//! # Data Flow
//! ```text
//! WebSocket read half
//!     → reader.rs (next frame → JSON decode, one at a time)
//!     → envelope.rs (generic event envelope)
//!     → structured log line per envelope
//! ```
//!
//! # Design Decisions
//! - The reader only ever receives; the close frame is sent elsewhere
//! - First error of any kind ends the reader, nothing reconnects
//! - Reader exit is published through a one-shot completion signal

pub mod envelope;
pub mod reader;

pub use envelope::Envelope;
pub use reader::{InboundReader, ReadError, ReaderHandle};
