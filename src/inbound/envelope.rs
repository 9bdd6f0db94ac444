//! Generic event envelope.

use serde::Deserialize;

/// One decoded inbound event. Missing fields decode as empty strings and
/// unknown type tags are accepted as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub user: String,
    pub channel: String,
    pub text: String,
}
