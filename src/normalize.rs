//! Per-record extraction of domain records from raw indexer JSON.
//!
//! The indexer's payload shape varies by network and drifts over time:
//! fields go missing, and numbers and timestamps arrive in whatever
//! encoding the upstream felt like. Round and vote parsing defaults every
//! missing or malformed
//! field so one bad record never takes down a batch. Project parsing is
//! strict on its required nested metadata: a malformed project fails the
//! whole build, which the fetch layer then degrades to "no data" instead
//! of showing a partial catalog.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::error::AppError;
use crate::types::{Project, ProjectStatus, Round, Vote};

/// Read a numeric field the indexer may emit as a JSON number or a
/// numeric string.
fn num_field(v: &Value, key: &str) -> Option<f64> {
    v.get(key)
        .and_then(|x| x.as_f64().or_else(|| x.as_str().and_then(|s| s.parse().ok())))
}

fn str_field(v: &Value, key: &str) -> String {
    v.get(key).and_then(|x| x.as_str()).unwrap_or("").to_string()
}

/// Unix-second timestamp field, tolerating number or string encoding.
/// Present-but-unparsable or out-of-range values are logged and mapped
/// to None.
fn timestamp_field(v: &Value, key: &str) -> Option<DateTime<Utc>> {
    let raw = v.get(key)?;
    if raw.is_null() {
        return None;
    }
    let secs = raw
        .as_i64()
        .or_else(|| raw.as_f64().map(|f| f as i64))
        .or_else(|| raw.as_str().and_then(|s| s.trim().parse::<i64>().ok()));
    match secs.and_then(|s| DateTime::from_timestamp(s, 0)) {
        Some(t) => Some(t),
        None => {
            warn!("unparsable {key} value {raw}, treating as absent");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Rounds
// ---------------------------------------------------------------------------

/// Parse one raw round object. Returns None only when the `metadata`
/// field is absent or null — the indexer lists rounds before their
/// metadata is published and those are not shown. Everything else
/// defaults: missing strings to "", missing numerics to 0, missing
/// optionals to None.
pub fn parse_round(v: &Value) -> Option<Round> {
    let metadata = v.get("metadata").filter(|m| !m.is_null())?;
    let matching_funds = metadata.get("matchingFunds");

    Some(Round {
        round_id: str_field(v, "id"),
        name: str_field(metadata, "name"),
        amount_usd: num_field(v, "amountUSD").unwrap_or(0.0),
        votes: num_field(v, "votes").unwrap_or(0.0) as u64,
        description: str_field(metadata, "description"),
        matching_funds_available: matching_funds
            .and_then(|m| num_field(m, "matchingFundsAvailable")),
        matching_cap: matching_funds.and_then(|m| num_field(m, "matchingCap")),
        round_start_time: timestamp_field(v, "roundStartTime"),
        round_end_time: timestamp_field(v, "roundEndTime"),
    })
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// Parse one raw project object. Strict: id, status, and the nested
/// application title/description are required, and a missing one is an
/// error the caller propagates.
pub fn parse_project(v: &Value) -> Result<Project, AppError> {
    let project_id = v
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Normalize("project missing id".to_string()))?
        .to_string();

    let application = v.pointer("/metadata/application/project").ok_or_else(|| {
        AppError::Normalize(format!("project {project_id} missing application metadata"))
    })?;
    let title = application
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Normalize(format!("project {project_id} missing title")))?
        .to_string();
    let description = application
        .get("description")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Normalize(format!("project {project_id} missing description")))?
        .to_string();

    let status = v
        .get("status")
        .and_then(Value::as_str)
        .map(parse_status_str)
        .ok_or_else(|| AppError::Normalize(format!("project {project_id} missing status")))?;

    Ok(Project {
        project_id,
        title,
        description,
        status,
        amount_usd: num_field(v, "amountUSD").unwrap_or(0.0),
        votes: num_field(v, "votes").unwrap_or(0.0) as u64,
        unique_contributors: num_field(v, "uniqueContributors").unwrap_or(0.0) as u64,
    })
}

pub fn parse_status_str(s: &str) -> ProjectStatus {
    match s {
        "APPROVED" => ProjectStatus::Approved,
        "PENDING" => ProjectStatus::Pending,
        "REJECTED" => ProjectStatus::Rejected,
        _ => ProjectStatus::Other,
    }
}

// ---------------------------------------------------------------------------
// Votes
// ---------------------------------------------------------------------------

/// Parse one raw vote object. Fully tolerant — every field defaults.
pub fn parse_vote(v: &Value) -> Vote {
    Vote {
        id: str_field(v, "id"),
        voter: str_field(v, "voter"),
        project_id: str_field(v, "projectId"),
        amount_usd: num_field(v, "amountUSD").unwrap_or(0.0),
        block_number: num_field(v, "blockNumber").unwrap_or(0.0) as u64,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
