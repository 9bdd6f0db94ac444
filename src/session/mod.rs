//! Session bootstrap subsystem.
//!
//! # Data Flow
//! ```text
//! token
//!     → client.rs (build start URL, one GET, read body)
//!     → types.rs (decode start response → SessionDescriptor)
//!     → EndpointUrl handed to the connector
//! ```
//!
//! # Design Decisions
//! - Fail fast: every error here aborts startup, nothing is retried
//! - An empty endpoint URL cannot be represented past this module
//! - The token is never logged verbatim

pub mod client;
pub mod types;

pub use client::SessionClient;
pub use types::{EndpointUrl, Participant, SessionDescriptor, SessionError};
