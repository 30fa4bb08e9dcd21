//! Catalog builders: raw indexer arrays in, normalized tables out, with
//! the per-network round filters applied.

use serde_json::Value;

use crate::config::RoundFilter;
use crate::error::Result;
use crate::normalize::{parse_project, parse_round, parse_vote};
use crate::types::{Project, ProjectStatus, Round, Vote};

/// Normalize a raw rounds array and apply the network's round filter.
/// Rounds without published metadata are skipped before filtering;
/// rounds with an absent start or end time never match a program window.
pub fn build_round_catalog(items: &[Value], filter: &RoundFilter) -> Vec<Round> {
    let rounds: Vec<Round> = items.iter().filter_map(parse_round).collect();

    match filter {
        RoundFilter::ProgramWindow { starts_by, ends_at } => rounds
            .into_iter()
            .filter(|r| {
                r.votes > 0
                    && r.round_start_time.is_some_and(|t| t.timestamp() <= *starts_by)
                    && r.round_end_time.is_some_and(|t| t.timestamp() == *ends_at)
            })
            .collect(),
        RoundFilter::SingleRound { round_id } => rounds
            .into_iter()
            .filter(|r| r.round_id == *round_id)
            .collect(),
        RoundFilter::All => rounds,
    }
}

/// Normalize a raw projects array, keeping only approved projects.
/// Strict: the first malformed project fails the whole build.
pub fn build_project_catalog(items: &[Value]) -> Result<Vec<Project>> {
    let projects = items.iter().map(parse_project).collect::<Result<Vec<_>>>()?;
    Ok(projects
        .into_iter()
        .filter(|p| p.status == ProjectStatus::Approved)
        .collect())
}

/// Normalize a raw votes array. No filtering.
pub fn build_vote_ledger(items: &[Value]) -> Vec<Vote> {
    items.iter().map(parse_vote).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
