//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! EndpointUrl
//!     → connector.rs (TCP + optional TLS + WebSocket upgrade)
//!     → WsConnection, split into read and write halves by the caller
//! ```
//!
//! # Design Decisions
//! - The halves share the socket through a BiLock, so the reader and the
//!   coordinator can use them concurrently without another mutex

pub mod connector;

pub use connector::{connect, ConnectError, WsConnection};
