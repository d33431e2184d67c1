//! Registry fetch.
//!
//! Returns an explicit `Result`; every error is fatal for the run and no
//! partial snapshot is ever produced.

use serde_json::Value;

use super::types::NetworkSnapshot;
use crate::config::MAX_ERROR_BODY_LOG_CHARS;
use crate::error_handling::FetchError;

/// Fetches a registry snapshot with a GET to `url`.
///
/// # Errors
///
/// - `FetchError::Transport` if the request fails or the body cannot be read
/// - `FetchError::Status` on any non-2xx status
/// - `FetchError::Decode` or `FetchError::InvalidFormat` for a malformed body
pub async fn fetch_snapshot(
    client: &reqwest::Client,
    url: &str,
) -> Result<NetworkSnapshot, FetchError> {
    log::debug!("Fetching registry snapshot from {}", url);
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        log::error!(
            "Error fetching nodes: {} {}",
            status.as_u16(),
            preview(&body)
        );
        return Err(FetchError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.bytes().await?;
    parse_snapshot(&body)
}

/// Parses a network-status body.
///
/// The body must hold a `nodes` array and a `network` object; unknown fields
/// are ignored.
pub fn parse_snapshot(body: &[u8]) -> Result<NetworkSnapshot, FetchError> {
    let value: Value = serde_json::from_slice(body)?;

    let has_nodes = value.get("nodes").is_some_and(Value::is_array);
    let has_network = value.get("network").is_some_and(Value::is_object);
    if !has_nodes || !has_network {
        log::error!(
            "Unexpected format from nodes API: {}",
            preview(&value.to_string())
        );
        return Err(FetchError::InvalidFormat);
    }

    let snapshot: NetworkSnapshot = serde_json::from_value(value)?;
    log::debug!(
        "Registry snapshot: {} nodes at height {}",
        snapshot.nodes.len(),
        snapshot.network.current_height
    );
    Ok(snapshot)
}

fn preview(text: &str) -> String {
    if text.chars().count() <= MAX_ERROR_BODY_LOG_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_ERROR_BODY_LOG_CHARS).collect();
        format!("{head}... (truncated)")
    }
}
