//! Session-start HTTP client.
//!
//! # Responsibilities
//! - Attach the token to the start endpoint as a query parameter
//! - Issue the single GET and read the whole body
//! - Turn the body into a validated `SessionDescriptor`

use reqwest::Client;
use url::Url;

use crate::config::SessionConfig;
use crate::observability::metrics;
use crate::session::types::{SessionDescriptor, SessionError, SessionResult, StartResponse};

/// Query parameter carrying the API token.
pub const TOKEN_PARAM: &str = "token";

/// Client for the session-start endpoint.
#[derive(Debug, Clone)]
pub struct SessionClient {
    http: Client,
    start_url: Url,
}

impl SessionClient {
    /// Create a client for the configured start endpoint.
    pub fn new(config: &SessionConfig) -> SessionResult<Self> {
        let start_url = Url::parse(&config.start_url).map_err(|source| {
            SessionError::InvalidStartUrl {
                url: config.start_url.clone(),
                source,
            }
        })?;

        let mut builder = Client::builder();
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build().map_err(SessionError::Client)?;

        Ok(Self { http, start_url })
    }

    /// Build the request URL with `token` set, replacing any token already
    /// present on the configured endpoint.
    pub fn start_request_url(&self, token: &str) -> Url {
        with_token(&self.start_url, token)
    }

    /// Exchange the token for a session descriptor.
    pub async fn start(&self, token: &str) -> SessionResult<SessionDescriptor> {
        let url = self.start_request_url(token);
        tracing::info!(url = %redacted(&url), "Starting session");

        let result = self.fetch(url).await;
        match &result {
            Ok(descriptor) => {
                metrics::record_session_start("ok");
                tracing::info!(
                    endpoint = %descriptor.endpoint,
                    users = descriptor.users.len(),
                    bots = descriptor.bots.len(),
                    "Session started"
                );
            }
            Err(e) => {
                metrics::record_session_start("error");
                tracing::debug!(error = %e, "Session start failed");
            }
        }
        result
    }

    async fn fetch(&self, url: Url) -> SessionResult<SessionDescriptor> {
        let response = self.http.get(url).send().await.map_err(SessionError::Request)?;

        let status = response.status();
        if !status.is_success() {
            // The body is still decoded; the service reports failures there.
            tracing::warn!(status = %status, "Session start returned non-success status");
        }

        let body = response.bytes().await.map_err(SessionError::Body)?;
        let start: StartResponse = serde_json::from_slice(&body)?;

        SessionDescriptor::try_from(start)
    }
}

fn with_token(base: &Url, token: &str) -> Url {
    let mut url = base.clone();
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != TOKEN_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(TOKEN_PARAM, token);
    url
}

/// The request URL with the token value masked, for logging.
fn redacted(url: &Url) -> Url {
    let token_present = url
        .query_pairs()
        .any(|(key, value)| key == TOKEN_PARAM && !value.is_empty());
    if token_present {
        with_token(url, "<redacted>")
    } else {
        url.clone()
    }
}
