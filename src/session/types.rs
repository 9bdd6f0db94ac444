//! Session-start response types and error definitions.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// A user or bot known to the workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

/// Raw body of the session-start response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StartResponse {
    pub ok: Option<bool>,
    pub error: Option<String>,
    pub url: Option<String>,
    pub users: Vec<Participant>,
    pub bots: Vec<Participant>,
}

/// WebSocket endpoint returned by the session start. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointUrl(String);

impl EndpointUrl {
    /// Wrap a URL, rejecting the empty string.
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        if url.is_empty() {
            None
        } else {
            Some(Self(url))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated result of the session start.
#[derive(Debug, Clone)]
pub struct SessionDescriptor {
    pub endpoint: EndpointUrl,
    pub users: Vec<Participant>,
    pub bots: Vec<Participant>,
}

impl TryFrom<StartResponse> for SessionDescriptor {
    type Error = SessionError;

    fn try_from(response: StartResponse) -> Result<Self, Self::Error> {
        let endpoint = response
            .url
            .and_then(|url| EndpointUrl::new(url))
            .ok_or_else(|| SessionError::MissingUrl {
                service_error: response.error,
            })?;

        Ok(Self {
            endpoint,
            users: response.users,
            bots: response.bots,
        })
    }
}

/// Errors that can occur while starting a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configured start endpoint is not a URL.
    #[error("invalid session start URL '{url}': {source}")]
    InvalidStartUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The GET itself failed.
    #[error("session start request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The response body could not be read.
    #[error("failed to read session start response: {0}")]
    Body(#[source] reqwest::Error),

    /// The response body is not the expected JSON.
    #[error("failed to decode session start response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response decoded but carried no endpoint URL.
    #[error("cannot retrieve connection URL{}", service_suffix(.service_error))]
    MissingUrl { service_error: Option<String> },
}

fn service_suffix(service_error: &Option<String>) -> String {
    match service_error {
        Some(e) => format!(" (service error: {})", e),
        None => String::new(),
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
