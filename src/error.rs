//! Top-level error type.

use thiserror::Error;

use crate::lifecycle::ShutdownError;
use crate::net::ConnectError;
use crate::session::SessionError;

/// A fatal error. Any of these ends the process with a non-zero status.
#[derive(Debug, Error)]
pub enum RtmError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Shutdown(#[from] ShutdownError),
}
