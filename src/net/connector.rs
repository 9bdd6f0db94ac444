//! WebSocket dialer.
//!
//! # Responsibilities
//! - Dial the endpoint returned by the session start
//! - Hand back the duplex stream, unsplit
//!
//! # Design Decisions
//! - Default dialer configuration: no custom TLS, proxy or timeout
//! - A failed dial is fatal; there is no reconnect

use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::session::EndpointUrl;

/// A live connection to the messaging service.
pub type WsConnection = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Errors that can occur while establishing the connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("failed to connect to {url}: {source}")]
    Dial {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
}

/// Dial the endpoint and complete the WebSocket upgrade.
pub async fn connect(endpoint: &EndpointUrl) -> Result<WsConnection, ConnectError> {
    tracing::info!(endpoint = %endpoint, "Connecting");

    let (stream, response) = connect_async(endpoint.as_str())
        .await
        .map_err(|source| ConnectError::Dial {
            url: endpoint.to_string(),
            source,
        })?;

    tracing::info!(
        endpoint = %endpoint,
        status = %response.status(),
        "Connection established"
    );
    Ok(stream)
}
