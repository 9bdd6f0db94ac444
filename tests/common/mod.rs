//! Shared mock servers for integration tests.

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::protocol::Message;

use rtm_client::RtmConfig;

/// Start a session-start endpoint answering every request with `body`.
///
/// Each request line (e.g. `GET /api/rtm.start?token=x HTTP/1.1`) is sent on
/// the returned channel.
pub async fn start_session_endpoint(
    body: impl Into<String>,
) -> (SocketAddr, mpsc::UnboundedReceiver<String>) {
    let body: String = body.into();
    let body: Arc<str> = Arc::from(body);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let tx = tx.clone();
                    let body = body.clone();
                    tokio::spawn(async move {
                        let request_line = read_request_head(socket, &body).await;
                        if let Some(line) = request_line {
                            let _ = tx.send(line);
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, rx)
}

async fn read_request_head(socket: TcpStream, body: &str) -> Option<String> {
    let mut reader = BufReader::new(socket);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await.ok()?;

    loop {
        let mut header = String::new();
        let n = reader.read_line(&mut header).await.ok()?;
        if n == 0 || header == "\r\n" {
            break;
        }
    }

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let mut socket = reader.into_inner();
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;

    Some(request_line.trim_end().to_string())
}

/// What the mock WebSocket server observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsEvent {
    /// Upgrade request received for this path.
    Connected(String),
    /// All scripted messages were sent.
    ScriptSent,
    /// A close frame arrived from the client.
    CloseReceived,
    /// The client side of the socket is gone.
    PeerGone,
}

/// Behaviour of the mock WebSocket server.
#[derive(Debug, Clone)]
pub struct WsScript {
    /// Text frames pushed to the client after the upgrade.
    pub messages: Vec<String>,
    /// Pause after each pushed message.
    pub message_gap: Duration,
    /// Delay before acknowledging a close frame. `None` never acknowledges
    /// while the client is still connected.
    pub ack_delay: Option<Duration>,
}

impl Default for WsScript {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            message_gap: Duration::from_millis(20),
            ack_delay: Some(Duration::ZERO),
        }
    }
}

/// Start a scripted WebSocket server.
pub async fn start_ws_server(script: WsScript) -> (SocketAddr, mpsc::UnboundedReceiver<WsEvent>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let tx = tx.clone();
            let script = script.clone();
            tokio::spawn(serve_ws(socket, script, tx));
        }
    });

    (addr, rx)
}

async fn serve_ws(socket: TcpStream, script: WsScript, tx: mpsc::UnboundedSender<WsEvent>) {
    let path_tx = tx.clone();
    let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
        let _ = path_tx.send(WsEvent::Connected(req.uri().path().to_string()));
        Ok(resp)
    };

    let mut ws = match accept_hdr_async(socket, callback).await {
        Ok(ws) => ws,
        Err(_) => return,
    };

    for text in script.messages {
        if ws.send(Message::text(text)).await.is_err() {
            let _ = tx.send(WsEvent::PeerGone);
            return;
        }
        tokio::time::sleep(script.message_gap).await;
    }
    let _ = tx.send(WsEvent::ScriptSent);

    loop {
        match ws.next().await {
            Some(Ok(Message::Close(_))) => {
                let _ = tx.send(WsEvent::CloseReceived);
                // The reply is queued; it goes out on the next read.
                let hold = script.ack_delay.unwrap_or(Duration::from_millis(1500));
                tokio::time::sleep(hold).await;
            }
            Some(Ok(_)) => {}
            Some(Err(_)) | None => {
                let _ = tx.send(WsEvent::PeerGone);
                return;
            }
        }
    }
}

/// Config pointing the client at a local session endpoint.
pub fn test_config(session_addr: SocketAddr) -> RtmConfig {
    let mut config = RtmConfig::default();
    config.session.start_url = format!("http://{}/api/rtm.start", session_addr);
    config.session.token = "xoxb-test token".to_string();
    config.session.use_system_proxy = false;
    config
}

/// Receive the next event, failing the test after `wait`.
pub async fn next_event(
    events: &mut mpsc::UnboundedReceiver<WsEvent>,
    wait: Duration,
) -> WsEvent {
    tokio::time::timeout(wait, events.recv())
        .await
        .expect("timed out waiting for server event")
        .expect("server event channel closed")
}

/// Start a listener that accepts connections and never answers them.
///
/// One `()` per accepted connection is sent on the returned channel. Sockets
/// stay open until the listener task ends with the runtime.
#[allow(dead_code)]
pub async fn start_silent_listener() -> (SocketAddr, mpsc::UnboundedReceiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
            let _ = tx.send(());
        }
    });

    (addr, rx)
}

/// Collect events until the client disconnects.
#[allow(dead_code)]
pub async fn events_until_peer_gone(
    events: &mut mpsc::UnboundedReceiver<WsEvent>,
    wait: Duration,
) -> Vec<WsEvent> {
    let mut seen = Vec::new();
    loop {
        let event = next_event(events, wait).await;
        let done = event == WsEvent::PeerGone;
        seen.push(event);
        if done {
            return seen;
        }
    }
}
