use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};

pub const INDEXER_URL: &str = "https://indexer-grants-stack.gitcoin.co/data";

/// Freshness window for cached indexer responses (seconds).
pub const CACHE_TTL_SECS: u64 = 3000;

/// HTTP timeout for indexer fetches (seconds).
pub const FETCH_TIMEOUT_SECS: u64 = 30;

/// Block whose wall-clock mining time anchors the block-time extrapolation.
pub const ANCHOR_BLOCK_NUMBER: u64 = 17_123_133;

/// 2023-04-25 12:13:35 UTC — mining time of ANCHOR_BLOCK_NUMBER.
const ANCHOR_BLOCK_TIME_UNIX: i64 = 1_682_424_815;

/// Funding-program window shown for mainnet: rounds must start by
/// 2023-04-26 15:00:00 UTC and end exactly at 2023-05-09 23:59:00 UTC.
const PROGRAM_WINDOW_STARTS_BY_UNIX: i64 = 1_682_521_200;
const PROGRAM_WINDOW_ENDS_AT_UNIX: i64 = 1_683_676_740;

/// The single round pinned on the Optimism dashboard.
const COMMUNITY_ROUND_ID: &str = "0x984e29dCB4286c2D9cbAA2c238AfDd8A191Eefbc";

/// Upper bound on the synthetic block-time range. A garbage block number
/// in vote data would otherwise ask for a multi-gigabyte sample table.
pub const MAX_BLOCK_SPAN: u64 = 1_000_000;

/// Bar colors assigned to rounds in first-seen order. Cycles when a
/// catalog has more rounds than colors.
pub const ROUND_PALETTE: &[&str] = &[
    "#4C72B0", "#DD8452", "#55A868", "#C44E52", "#8172B2", "#937860", "#DA8BC3",
    "#8C8C8C", "#CCB974", "#64B5CD", "#4E3D3D", "#AEBD38", "#AD6B5E", "#1F78B4",
    "#B2DF8A",
];

/// Wall-clock time of the anchor block.
pub fn anchor_block_time() -> DateTime<Utc> {
    DateTime::from_timestamp(ANCHOR_BLOCK_TIME_UNIX, 0).expect("anchor timestamp in range")
}

// ---------------------------------------------------------------------------
// Per-network policy
// ---------------------------------------------------------------------------

/// Which rounds a network's catalog keeps after normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundFilter {
    /// Keep rounds belonging to one funding-program window: votes > 0,
    /// start at or before `starts_by`, end exactly at `ends_at`
    /// (Unix seconds).
    ProgramWindow { starts_by: i64, ends_at: i64 },
    /// Keep the single round with this id.
    SingleRound { round_id: &'static str },
    /// Full catalog, no post-filter.
    All,
}

/// Deploy-time constants for one supported network.
#[derive(Debug, Clone, Copy)]
pub struct NetworkPolicy {
    pub chain_id: &'static str,
    /// Average block cadence used for block-time extrapolation.
    pub seconds_per_block: f64,
    pub round_filter: RoundFilter,
}

const NETWORK_POLICIES: &[NetworkPolicy] = &[
    NetworkPolicy {
        chain_id: "1",
        seconds_per_block: 12.133,
        round_filter: RoundFilter::ProgramWindow {
            starts_by: PROGRAM_WINDOW_STARTS_BY_UNIX,
            ends_at: PROGRAM_WINDOW_ENDS_AT_UNIX,
        },
    },
    NetworkPolicy {
        chain_id: "10",
        seconds_per_block: 2.0,
        round_filter: RoundFilter::SingleRound { round_id: COMMUNITY_ROUND_ID },
    },
];

pub fn network_policy(chain_id: &str) -> Option<&'static NetworkPolicy> {
    NETWORK_POLICIES.iter().find(|p| p.chain_id == chain_id)
}

/// Round filter for a network. Networks without a configured policy get
/// the full catalog.
pub fn round_filter_for(chain_id: &str) -> RoundFilter {
    network_policy(chain_id).map_or(RoundFilter::All, |p| p.round_filter)
}

/// Block cadence for a network. Unlike the round filter there is no safe
/// default here — an unmapped chain id is a deployment mistake and fails
/// fast.
pub fn seconds_per_block(chain_id: &str) -> Result<f64> {
    network_policy(chain_id)
        .map(|p| p.seconds_per_block)
        .ok_or_else(|| AppError::Config(format!("no block cadence configured for chain {chain_id}")))
}

// ---------------------------------------------------------------------------
// Runtime configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub indexer_url: String,
    pub log_level: String,
    pub api_port: u16,
    /// Freshness window for cached indexer responses (CACHE_TTL_SECS).
    pub cache_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            indexer_url: std::env::var("INDEXER_URL").unwrap_or_else(|_| INDEXER_URL.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            cache_ttl_secs: std::env::var("CACHE_TTL_SECS")
                .unwrap_or_else(|_| CACHE_TTL_SECS.to_string())
                .parse::<u64>()
                .unwrap_or(CACHE_TTL_SECS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_policy_uses_program_window() {
        let policy = network_policy("1").unwrap();
        assert!((policy.seconds_per_block - 12.133).abs() < 1e-9);
        assert!(matches!(policy.round_filter, RoundFilter::ProgramWindow { .. }));
    }

    #[test]
    fn optimism_policy_pins_one_round() {
        let policy = network_policy("10").unwrap();
        assert_eq!(policy.seconds_per_block, 2.0);
        assert_eq!(
            policy.round_filter,
            RoundFilter::SingleRound { round_id: COMMUNITY_ROUND_ID }
        );
    }

    #[test]
    fn unknown_chain_has_no_cadence() {
        assert!(seconds_per_block("424242").is_err());
    }

    #[test]
    fn unknown_chain_gets_unfiltered_catalog() {
        assert_eq!(round_filter_for("424242"), RoundFilter::All);
    }

    #[test]
    fn anchor_time_matches_known_instant() {
        assert_eq!(anchor_block_time().to_rfc3339(), "2023-04-25T12:13:35+00:00");
    }
}
