//! Cache-through loading of the three indexer tables.
//!
//! The `load_*` methods are what the API handlers call: cache lookup,
//! fetch-and-build on a miss, insert, and collapse of the fetch outcome
//! to a plain table. Transport failures and strict-normalization
//! failures alike surface as an empty table here, which the dashboard
//! renders as zeroed metrics. The `*_outcome` methods keep the
//! distinction for callers that need it.

use std::sync::Arc;

use reqwest::Client;
use tracing::warn;

use crate::api::health::HealthState;
use crate::catalog::{build_project_catalog, build_round_catalog, build_vote_ledger};
use crate::config::{round_filter_for, Config};
use crate::fetcher::{fetch_projects, fetch_rounds, fetch_votes};
use crate::state::DataCache;
use crate::types::{FetchOutcome, Project, Round, Vote};

pub struct Loader {
    cfg: Config,
    client: Client,
    cache: Arc<DataCache>,
    health: Arc<HealthState>,
}

impl Loader {
    pub fn new(
        cfg: Config,
        client: Client,
        cache: Arc<DataCache>,
        health: Arc<HealthState>,
    ) -> Self {
        Self { cfg, client, cache, health }
    }

    /// Filtered round catalog for a network, served from cache when
    /// fresh.
    pub async fn load_chain_rounds(&self, chain_id: &str) -> Vec<Round> {
        if let Some(rows) = self.cache.get_rounds(chain_id) {
            return rows;
        }
        let outcome = self.rounds_outcome(chain_id).await;
        let rows = outcome.into_rows();
        self.cache.put_rounds(chain_id, rows.clone());
        rows
    }

    /// Approved-project catalog for one round, served from cache when
    /// fresh.
    pub async fn load_round_projects(&self, chain_id: &str, round_id: &str) -> Vec<Project> {
        if let Some(rows) = self.cache.get_projects(chain_id, round_id) {
            return rows;
        }
        let outcome = self.projects_outcome(chain_id, round_id).await;
        let rows = outcome.into_rows();
        self.cache.put_projects(chain_id, round_id, rows.clone());
        rows
    }

    /// Vote ledger for one round, served from cache when fresh.
    pub async fn load_round_votes(&self, chain_id: &str, round_id: &str) -> Vec<Vote> {
        if let Some(rows) = self.cache.get_votes(chain_id, round_id) {
            return rows;
        }
        let outcome = self.votes_outcome(chain_id, round_id).await;
        let rows = outcome.into_rows();
        self.cache.put_votes(chain_id, round_id, rows.clone());
        rows
    }

    /// Fetch and build the round catalog, keeping the outcome distinct.
    pub async fn rounds_outcome(&self, chain_id: &str) -> FetchOutcome<Round> {
        let raw = fetch_rounds(&self.client, &self.cfg.indexer_url, chain_id).await;
        self.health.record_fetch(!raw.is_unavailable());
        match raw {
            FetchOutcome::Rows(items) => {
                let filter = round_filter_for(chain_id);
                FetchOutcome::from_rows(build_round_catalog(&items, &filter))
            }
            FetchOutcome::Empty => FetchOutcome::Empty,
            FetchOutcome::Unavailable(reason) => FetchOutcome::Unavailable(reason),
        }
    }

    /// Fetch and build the approved-project catalog. A strict
    /// normalization failure degrades the whole round to `Unavailable`.
    pub async fn projects_outcome(&self, chain_id: &str, round_id: &str) -> FetchOutcome<Project> {
        let raw = fetch_projects(&self.client, &self.cfg.indexer_url, chain_id, round_id).await;
        self.health.record_fetch(!raw.is_unavailable());
        match raw {
            FetchOutcome::Rows(items) => match build_project_catalog(&items) {
                Ok(projects) => FetchOutcome::from_rows(projects),
                Err(e) => {
                    warn!("project catalog for round {round_id} on chain {chain_id} failed: {e}");
                    FetchOutcome::Unavailable(e.to_string())
                }
            },
            FetchOutcome::Empty => FetchOutcome::Empty,
            FetchOutcome::Unavailable(reason) => FetchOutcome::Unavailable(reason),
        }
    }

    /// Fetch and build the vote ledger, keeping the outcome distinct.
    pub async fn votes_outcome(&self, chain_id: &str, round_id: &str) -> FetchOutcome<Vote> {
        let raw = fetch_votes(&self.client, &self.cfg.indexer_url, chain_id, round_id).await;
        self.health.record_fetch(!raw.is_unavailable());
        match raw {
            FetchOutcome::Rows(items) => FetchOutcome::from_rows(build_vote_ledger(&items)),
            FetchOutcome::Empty => FetchOutcome::Empty,
            FetchOutcome::Unavailable(reason) => FetchOutcome::Unavailable(reason),
        }
    }
}
