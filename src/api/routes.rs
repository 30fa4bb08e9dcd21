use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::api::health::HealthState;
use crate::blocktime::interpolate;
use crate::config::{anchor_block_time, seconds_per_block, ANCHOR_BLOCK_NUMBER, MAX_BLOCK_SPAN};
use crate::error::AppError;
use crate::loader::Loader;
use crate::report;
use crate::state::DataCache;
use crate::types::{HourBucket, Project, Round, SeriesPoint};

#[derive(Clone)]
pub struct ApiState {
    pub loader: Arc<Loader>,
    pub cache: Arc<DataCache>,
    pub health: Arc<HealthState>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/networks/:chain_id/rounds", get(get_rounds))
        .route("/networks/:chain_id/summary", get(get_chain_summary))
        .route(
            "/networks/:chain_id/rounds/:round_id/summary",
            get(get_round_summary),
        )
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub cache_entries: usize,
    pub indexer_fetches: u64,
    pub indexer_failures: u64,
}

#[derive(Serialize)]
pub struct RoundColor {
    pub name: String,
    pub color: String,
}

/// Network-level dashboard payload: metric tiles plus both cross-round
/// bar series. Scalars ship raw and display-formatted so the UI never
/// re-implements the formatting rules.
#[derive(Serialize)]
pub struct ChainSummaryResponse {
    pub chain_id: String,
    pub total_votes: u64,
    pub total_usd: f64,
    pub total_rounds: usize,
    pub total_votes_display: String,
    pub total_usd_display: String,
    pub total_rounds_display: String,
    pub usd_by_round: Vec<SeriesPoint>,
    pub votes_by_round: Vec<SeriesPoint>,
    pub round_colors: Vec<RoundColor>,
}

/// Round-level dashboard payload: metric tiles, the approved-project
/// table, the per-project bar series, and the hourly contribution
/// series.
#[derive(Serialize)]
pub struct RoundSummaryResponse {
    pub chain_id: String,
    pub round_id: String,
    pub total_usd: f64,
    pub total_usd_display: String,
    pub total_donations: usize,
    pub total_donations_display: String,
    pub total_donors: usize,
    pub total_donors_display: String,
    pub total_projects: usize,
    pub total_projects_display: String,
    pub projects: Vec<Project>,
    pub usd_by_project: Vec<SeriesPoint>,
    pub votes_by_hour: Vec<HourBucket>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.health.uptime_secs(),
        cache_entries: state.cache.entry_count(),
        indexer_fetches: state.health.indexer_fetches(),
        indexer_failures: state.health.indexer_failures(),
    })
}

/// Filtered round catalog for a network. An unavailable indexer shows
/// up as an empty list, not an error.
async fn get_rounds(
    State(state): State<ApiState>,
    Path(chain_id): Path<String>,
) -> Json<Vec<Round>> {
    Json(state.loader.load_chain_rounds(&chain_id).await)
}

async fn get_chain_summary(
    State(state): State<ApiState>,
    Path(chain_id): Path<String>,
) -> Json<ChainSummaryResponse> {
    let rounds = state.loader.load_chain_rounds(&chain_id).await;
    let totals = report::chain_totals(&rounds);

    Json(ChainSummaryResponse {
        chain_id,
        total_votes: totals.total_votes,
        total_usd: totals.total_usd,
        total_rounds: totals.total_rounds,
        total_votes_display: report::format_count(totals.total_votes),
        total_usd_display: report::format_usd(totals.total_usd),
        total_rounds_display: report::format_count(totals.total_rounds as u64),
        usd_by_round: report::usd_by_round(&rounds),
        votes_by_round: report::votes_by_round(&rounds),
        round_colors: report::color_map(&rounds)
            .into_iter()
            .map(|(name, color)| RoundColor { name, color })
            .collect(),
    })
}

async fn get_round_summary(
    State(state): State<ApiState>,
    Path((chain_id, round_id)): Path<(String, String)>,
) -> Result<Json<RoundSummaryResponse>, AppError> {
    // Resolve the block cadence first: serving a round summary for an
    // unmapped chain is a deployment mistake, not missing data.
    let cadence = seconds_per_block(&chain_id)?;

    let projects = state.loader.load_round_projects(&chain_id, &round_id).await;
    let votes = state.loader.load_round_votes(&chain_id, &round_id).await;
    let totals = report::round_totals(&votes, &projects);

    // The sample range covers [anchor, max observed block] so the join
    // below cannot miss in practice. MAX_BLOCK_SPAN bounds the table
    // against garbage block numbers; votes past the cap simply get no
    // timestamp and stay out of the series.
    let votes_by_hour = match votes.iter().map(|v| v.block_number).max() {
        Some(max_block) if max_block >= ANCHOR_BLOCK_NUMBER => {
            let end_block = max_block
                .saturating_add(1)
                .min(ANCHOR_BLOCK_NUMBER + MAX_BLOCK_SPAN);
            let samples =
                interpolate(ANCHOR_BLOCK_NUMBER, end_block, anchor_block_time(), cadence);
            report::votes_by_hour(&votes, &samples)
        }
        _ => Vec::new(),
    };

    Ok(Json(RoundSummaryResponse {
        chain_id,
        round_id,
        total_usd: totals.total_usd,
        total_usd_display: report::format_usd(totals.total_usd),
        total_donations: totals.total_donations,
        total_donations_display: report::format_count(totals.total_donations as u64),
        total_donors: totals.total_donors,
        total_donors_display: report::format_count(totals.total_donors as u64),
        total_projects: totals.total_projects,
        total_projects_display: report::format_count(totals.total_projects as u64),
        usd_by_project: report::usd_by_project(&votes, &projects),
        projects,
        votes_by_hour,
    }))
}
