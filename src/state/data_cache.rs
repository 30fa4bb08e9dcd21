use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::types::{Project, Round, Vote};

/// Read-through TTL cache over the indexer fetches, keyed by operation
/// plus (network, round).
///
/// Entries are whole-table values: a concurrent refill replaces the
/// entry wholesale, so last writer wins and a reader never observes a
/// partial table. There is no invalidation API — staleness is bounded by
/// the freshness window alone. Empty tables are cached like any other
/// result, so an unavailable indexer is not hammered on every request.
pub struct DataCache {
    rounds: DashMap<String, Entry<Round>>,
    projects: DashMap<String, Entry<Project>>,
    votes: DashMap<String, Entry<Vote>>,
    ttl: Duration,
}

struct Entry<T> {
    inserted_at: Instant,
    rows: Vec<T>,
}

impl DataCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            rounds: DashMap::new(),
            projects: DashMap::new(),
            votes: DashMap::new(),
            ttl,
        }
    }

    pub fn get_rounds(&self, chain_id: &str) -> Option<Vec<Round>> {
        get_fresh(&self.rounds, chain_id, self.ttl)
    }

    pub fn put_rounds(&self, chain_id: &str, rows: Vec<Round>) {
        put(&self.rounds, chain_id.to_string(), rows);
    }

    pub fn get_projects(&self, chain_id: &str, round_id: &str) -> Option<Vec<Project>> {
        get_fresh(&self.projects, &round_key(chain_id, round_id), self.ttl)
    }

    pub fn put_projects(&self, chain_id: &str, round_id: &str, rows: Vec<Project>) {
        put(&self.projects, round_key(chain_id, round_id), rows);
    }

    pub fn get_votes(&self, chain_id: &str, round_id: &str) -> Option<Vec<Vote>> {
        get_fresh(&self.votes, &round_key(chain_id, round_id), self.ttl)
    }

    pub fn put_votes(&self, chain_id: &str, round_id: &str, rows: Vec<Vote>) {
        put(&self.votes, round_key(chain_id, round_id), rows);
    }

    /// Live entry count across all three tables, fresh or stale.
    pub fn entry_count(&self) -> usize {
        self.rounds.len() + self.projects.len() + self.votes.len()
    }
}

fn round_key(chain_id: &str, round_id: &str) -> String {
    format!("{chain_id}/{round_id}")
}

/// Fresh-entry lookup. A stale entry reads as a miss; the caller's
/// subsequent put replaces it.
fn get_fresh<T: Clone>(map: &DashMap<String, Entry<T>>, key: &str, ttl: Duration) -> Option<Vec<T>> {
    let entry = map.get(key)?;
    if entry.inserted_at.elapsed() < ttl {
        Some(entry.rows.clone())
    } else {
        None
    }
}

fn put<T>(map: &DashMap<String, Entry<T>>, key: String, rows: Vec<T>) {
    map.insert(key, Entry { inserted_at: Instant::now(), rows });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
