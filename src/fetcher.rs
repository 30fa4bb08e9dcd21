//! HTTP retrieval from the grants indexer.
//!
//! Every fetch degrades to `FetchOutcome::Unavailable` on transport
//! failure, non-200 status, or an unexpected envelope. Nothing here
//! returns an error to the caller — the dashboard always renders, with
//! empty tables standing in for missing data.

use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use crate::types::FetchOutcome;

pub fn rounds_url(base: &str, chain_id: &str) -> String {
    format!("{base}/{chain_id}/rounds.json")
}

pub fn projects_url(base: &str, chain_id: &str, round_id: &str) -> String {
    format!("{base}/{chain_id}/rounds/{round_id}/projects.json")
}

pub fn votes_url(base: &str, chain_id: &str, round_id: &str) -> String {
    format!("{base}/{chain_id}/rounds/{round_id}/votes.json")
}

/// GET the raw rounds array for a network.
pub async fn fetch_rounds(client: &Client, base: &str, chain_id: &str) -> FetchOutcome<Value> {
    fetch_array(client, &rounds_url(base, chain_id)).await
}

/// GET the raw projects array for one round.
pub async fn fetch_projects(
    client: &Client,
    base: &str,
    chain_id: &str,
    round_id: &str,
) -> FetchOutcome<Value> {
    fetch_array(client, &projects_url(base, chain_id, round_id)).await
}

/// GET the raw votes array for one round.
pub async fn fetch_votes(
    client: &Client,
    base: &str,
    chain_id: &str,
    round_id: &str,
) -> FetchOutcome<Value> {
    fetch_array(client, &votes_url(base, chain_id, round_id)).await
}

/// GET one indexer endpoint and unwrap its JSON-array envelope. Any
/// failure is logged and becomes `Unavailable`.
async fn fetch_array(client: &Client, url: &str) -> FetchOutcome<Value> {
    let resp = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!("indexer fetch failed for {url}: {e}");
            return FetchOutcome::Unavailable(e.to_string());
        }
    };

    if !resp.status().is_success() {
        warn!("indexer returned {} for {url}", resp.status());
        return FetchOutcome::Unavailable(format!("status {}", resp.status()));
    }

    let body: Value = match resp.json().await {
        Ok(v) => v,
        Err(e) => {
            warn!("indexer payload for {url} was not JSON: {e}");
            return FetchOutcome::Unavailable(e.to_string());
        }
    };

    match body {
        Value::Array(items) => FetchOutcome::from_rows(items),
        _ => {
            warn!("indexer payload for {url} was not an array");
            FetchOutcome::Unavailable("payload was not an array".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_the_indexer_layout() {
        let base = "https://indexer.example/data";
        assert_eq!(rounds_url(base, "1"), "https://indexer.example/data/1/rounds.json");
        assert_eq!(
            projects_url(base, "1", "0xr"),
            "https://indexer.example/data/1/rounds/0xr/projects.json"
        );
        assert_eq!(
            votes_url(base, "10", "0xr"),
            "https://indexer.example/data/10/rounds/0xr/votes.json"
        );
    }
}
