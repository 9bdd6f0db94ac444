//! Session bootstrap and dial, end to end against local mock servers.

use std::time::Duration;
use rtm_client::error::RtmError;
use rtm_client::lifecycle::{run, Shutdown};
use rtm_client::session::SessionError;

mod common;

use common::{WsEvent, WsScript};

#[tokio::test]
async fn test_dials_endpoint_from_session_start() {
    let (ws_addr, mut ws_events) = common::start_ws_server(WsScript::default()).await;
    let body = format!(r#"{{"url":"ws://{}/ws","users":[],"bots":[]}}"#, ws_addr);
    let (session_addr, mut requests) = common::start_session_endpoint(body).await;

    let config = common::test_config(session_addr);
    let shutdown = Shutdown::new();
    let listener = shutdown.subscribe();
    let client = tokio::spawn(async move { run(&config, listener).await });

    assert_eq!(
        common::next_event(&mut ws_events, Duration::from_secs(5)).await,
        WsEvent::Connected("/ws".to_string())
    );

    let request_line = requests.recv().await.unwrap();
    assert!(
        request_line.starts_with("GET /api/rtm.start?token=xoxb-test+token "),
        "unexpected request line: {}",
        request_line
    );

    assert_eq!(
        common::next_event(&mut ws_events, Duration::from_secs(5)).await,
        WsEvent::ScriptSent
    );
    shutdown.trigger();

    let summary = tokio::time::timeout(Duration::from_secs(3), client)
        .await
        .expect("client should shut down")
        .unwrap()
        .unwrap();
    assert_eq!(summary.envelopes_received, 0);
}

#[tokio::test]
async fn test_empty_url_aborts_before_dial() {
    let (session_addr, mut requests) = common::start_session_endpoint(r#"{"url":""}"#).await;

    let config = common::test_config(session_addr);
    let shutdown = Shutdown::new();

    let err = tokio::time::timeout(Duration::from_secs(3), run(&config, shutdown.subscribe()))
        .await
        .expect("startup failure should not wait for an interrupt")
        .unwrap_err();

    assert!(matches!(
        err,
        RtmError::Session(SessionError::MissingUrl { service_error: None })
    ));
    assert_eq!(err.to_string(), "cannot retrieve connection URL");

    assert!(requests.recv().await.is_some());
    assert!(requests.try_recv().is_err(), "start endpoint called more than once");
}

#[tokio::test]
async fn test_rejected_token_reports_service_error() {
    let (session_addr, _requests) =
        common::start_session_endpoint(r#"{"ok":false,"error":"invalid_auth"}"#).await;

    let config = common::test_config(session_addr);
    let shutdown = Shutdown::new();
    let err = run(&config, shutdown.subscribe()).await.unwrap_err();

    assert!(err.to_string().contains("cannot retrieve connection URL"));
    assert!(err.to_string().contains("invalid_auth"));
}

#[tokio::test]
async fn test_non_json_body_is_fatal() {
    let (session_addr, _requests) = common::start_session_endpoint("<html>oops</html>").await;

    let config = common::test_config(session_addr);
    let shutdown = Shutdown::new();
    let err = run(&config, shutdown.subscribe()).await.unwrap_err();

    assert!(matches!(err, RtmError::Session(SessionError::Decode(_))));
}

#[tokio::test]
async fn test_unreachable_session_endpoint_is_fatal() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = common::test_config(addr);
    let shutdown = Shutdown::new();
    let err = run(&config, shutdown.subscribe()).await.unwrap_err();

    assert!(matches!(err, RtmError::Session(SessionError::Request(_))));
}

#[tokio::test]
async fn test_dial_failure_is_fatal() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = listener.local_addr().unwrap();
    drop(listener);

    let body = format!(r#"{{"url":"ws://{}/ws"}}"#, dead_addr);
    let (session_addr, _requests) = common::start_session_endpoint(body).await;

    let config = common::test_config(session_addr);
    let shutdown = Shutdown::new();
    let err = run(&config, shutdown.subscribe()).await.unwrap_err();

    assert!(matches!(err, RtmError::Connect(_)));
}
