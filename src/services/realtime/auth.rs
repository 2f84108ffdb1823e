// Channel token client
// Fetches a capability-scoped credential for the meeting topic namespace
// from the token-issuing endpoint

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;

/// Capability grant requested for every meeting channel: one wildcard
/// namespace, subscribe + publish + presence, nothing else
pub fn meeting_capability() -> serde_json::Value {
    json!({
        "meeting:*": ["subscribe", "publish", "presence"],
    })
}

/// Credential returned by the token endpoint. Opaque to us beyond the
/// client identity it is bound to; it is handed straight to the realtime
/// transport.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelToken {
    #[serde(rename = "clientId")]
    pub client_id: String,
    pub capability: serde_json::Value,
    #[serde(flatten)]
    pub rest: serde_json::Value,
}

impl ChannelToken {
    /// Whether the credential is scoped to the meeting namespace we expect
    pub fn covers_meetings(&self) -> bool {
        self.capability
            .get("meeting:*")
            .and_then(|ops| ops.as_array())
            .is_some_and(|ops| {
                ["subscribe", "publish", "presence"]
                    .iter()
                    .all(|op| ops.iter().any(|v| v.as_str() == Some(op)))
            })
    }
}

/// Request a token for `client_id` from the issuing endpoint
pub fn request_token(endpoint: &str, client_id: &str) -> Result<ChannelToken> {
    let url = format!(
        "{endpoint}?clientId={}",
        urlencoding::encode(client_id)
    );
    let response = reqwest::blocking::get(&url)
        .with_context(|| format!("Failed to reach token endpoint {endpoint}"))?
        .error_for_status()
        .context("Token endpoint returned an error")?;
    let token: ChannelToken = response
        .json()
        .context("Failed to parse channel token")?;
    Ok(token)
}
