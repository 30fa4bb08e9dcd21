use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Round
// ---------------------------------------------------------------------------

/// One funding round as listed by the indexer. round_id is unique within
/// a network's catalog; the record is immutable once built and lives only
/// as long as its cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub round_id: String,
    pub name: String,
    pub amount_usd: f64,
    pub votes: u64,
    pub description: String,
    pub matching_funds_available: Option<f64>,
    pub matching_cap: Option<f64>,
    pub round_start_time: Option<DateTime<Utc>>,
    pub round_end_time: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// One grant recipient within a round. Only approved projects survive
/// into the catalog served to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub amount_usd: f64,
    pub votes: u64,
    pub unique_contributors: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectStatus {
    Approved,
    Pending,
    Rejected,
    Other,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProjectStatus::Approved => "APPROVED",
            ProjectStatus::Pending => "PENDING",
            ProjectStatus::Rejected => "REJECTED",
            ProjectStatus::Other => "OTHER",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Vote
// ---------------------------------------------------------------------------

/// One donation event. No uniqueness is enforced — a voter may appear
/// any number of times within a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub id: String,
    pub voter: String,
    pub project_id: String,
    pub amount_usd: f64,
    pub block_number: u64,
}

// ---------------------------------------------------------------------------
// BlockTimeSample
// ---------------------------------------------------------------------------

/// Estimated wall-clock time for one block. Synthetic: derived by linear
/// extrapolation from a single anchor block, not fetched from the chain,
/// so treat it as an approximation rather than ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockTimeSample {
    pub block_number: u64,
    pub utc_time: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Fetch outcome
// ---------------------------------------------------------------------------

/// Outcome of one fetch-and-build operation against the indexer.
///
/// `Unavailable` covers transport failures, non-200 responses, bad
/// envelopes, and strict-normalization failures. Callers collapse it to
/// an empty table at the API boundary — the dashboard always renders —
/// but the distinction stays observable here.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Rows(Vec<T>),
    Empty,
    Unavailable(String),
}

impl<T> FetchOutcome<T> {
    /// Wrap built rows, mapping an empty build to `Empty`.
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Rows(rows)
        }
    }

    /// Collapse to a plain table. `Empty` and `Unavailable` both become
    /// an empty vec — the uniform "nothing to show" signal.
    pub fn into_rows(self) -> Vec<T> {
        match self {
            FetchOutcome::Rows(rows) => rows,
            FetchOutcome::Empty | FetchOutcome::Unavailable(_) => Vec::new(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, FetchOutcome::Unavailable(_))
    }
}

// ---------------------------------------------------------------------------
// Chart series
// ---------------------------------------------------------------------------

/// One (category, value) pair of a bar-chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// One hour of the contribution time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourBucket {
    pub hour: DateTime<Utc>,
    pub count: u64,
}
