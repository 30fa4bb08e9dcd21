//! Pure aggregations over built catalogs: grouped bar-chart series,
//! scalar metrics, the hourly contribution series, palette assignment,
//! and display formatting.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use num_format::{Locale, ToFormattedString};

use crate::config::ROUND_PALETTE;
use crate::types::{BlockTimeSample, HourBucket, Project, Round, SeriesPoint, Vote};

// ---------------------------------------------------------------------------
// Grouped series
// ---------------------------------------------------------------------------

/// Crowdfunded USD per round name, ascending by amount.
pub fn usd_by_round(rounds: &[Round]) -> Vec<SeriesPoint> {
    grouped_sum(rounds.iter().map(|r| (r.name.clone(), r.amount_usd)))
}

/// Contribution counts per round name, ascending.
pub fn votes_by_round(rounds: &[Round]) -> Vec<SeriesPoint> {
    grouped_sum(rounds.iter().map(|r| (r.name.clone(), r.votes as f64)))
}

/// Vote USD per project title, ascending. Left join: votes whose project
/// id has no approved match keep their rows and group under the empty
/// title.
pub fn usd_by_project(votes: &[Vote], projects: &[Project]) -> Vec<SeriesPoint> {
    let titles: HashMap<&str, &str> = projects
        .iter()
        .map(|p| (p.project_id.as_str(), p.title.as_str()))
        .collect();

    grouped_sum(votes.iter().map(|v| {
        let title = titles.get(v.project_id.as_str()).copied().unwrap_or("");
        (title.to_string(), v.amount_usd)
    }))
}

fn grouped_sum(pairs: impl Iterator<Item = (String, f64)>) -> Vec<SeriesPoint> {
    let mut sums: HashMap<String, f64> = HashMap::new();
    for (label, value) in pairs {
        *sums.entry(label).or_insert(0.0) += value;
    }
    let mut points: Vec<SeriesPoint> = sums
        .into_iter()
        .map(|(label, value)| SeriesPoint { label, value })
        .collect();
    points.sort_by(|a, b| a.value.total_cmp(&b.value).then_with(|| a.label.cmp(&b.label)));
    points
}

// ---------------------------------------------------------------------------
// Scalar metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ChainTotals {
    pub total_votes: u64,
    pub total_usd: f64,
    pub total_rounds: usize,
}

/// Network-level metric tiles, straight off the round catalog.
pub fn chain_totals(rounds: &[Round]) -> ChainTotals {
    ChainTotals {
        total_votes: rounds.iter().map(|r| r.votes).sum(),
        total_usd: rounds.iter().map(|r| r.amount_usd).sum(),
        total_rounds: rounds.len(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundTotals {
    pub total_usd: f64,
    pub total_donations: usize,
    pub total_donors: usize,
    pub total_projects: usize,
}

/// Round-level metric tiles.
///
/// A donation is a vote row with amount_usd > 0. Donors are counted
/// after summing per voter — a voter whose contributions net to zero is
/// not a donor.
pub fn round_totals(votes: &[Vote], projects: &[Project]) -> RoundTotals {
    let total_usd = votes.iter().map(|v| v.amount_usd).sum();
    let total_donations = votes.iter().filter(|v| v.amount_usd > 0.0).count();

    let mut by_voter: HashMap<&str, f64> = HashMap::new();
    for v in votes {
        *by_voter.entry(v.voter.as_str()).or_insert(0.0) += v.amount_usd;
    }
    let total_donors = by_voter.values().filter(|&&sum| sum > 0.0).count();

    RoundTotals {
        total_usd,
        total_donations,
        total_donors,
        total_projects: projects.len(),
    }
}

// ---------------------------------------------------------------------------
// Hourly contribution series
// ---------------------------------------------------------------------------

/// Distinct vote ids per UTC hour, zero-filled over every hour between
/// the first and last occupied bucket inclusive.
///
/// Votes are placed in time via the interpolated block-time samples. A
/// vote whose block has no sample stays out of the series — the sample
/// range is built to cover the observed blocks, so this is a guard, not
/// a policy.
pub fn votes_by_hour(votes: &[Vote], samples: &[BlockTimeSample]) -> Vec<HourBucket> {
    let times: HashMap<u64, DateTime<Utc>> = samples
        .iter()
        .map(|s| (s.block_number, s.utc_time))
        .collect();

    let mut buckets: BTreeMap<i64, HashSet<&str>> = BTreeMap::new();
    for vote in votes {
        let Some(t) = times.get(&vote.block_number) else { continue };
        let secs = t.timestamp();
        buckets.entry(secs - secs.rem_euclid(3600)).or_default().insert(vote.id.as_str());
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Vec::new();
    };

    (first..=last)
        .step_by(3600)
        .map(|hour| HourBucket {
            // hour keys are floored copies of valid timestamps
            hour: DateTime::from_timestamp(hour, 0).expect("hour timestamp in range"),
            count: buckets.get(&hour).map_or(0, |ids| ids.len() as u64),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Palette assignment
// ---------------------------------------------------------------------------

/// Assign each distinct round name a palette color in first-seen order,
/// cycling when the catalog outgrows the palette.
pub fn color_map(rounds: &[Round]) -> Vec<(String, String)> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut map = Vec::new();
    for r in rounds {
        if seen.insert(r.name.as_str()) {
            let color = ROUND_PALETTE[map.len() % ROUND_PALETTE.len()];
            map.push((r.name.clone(), color.to_string()));
        }
    }
    map
}

// ---------------------------------------------------------------------------
// Display formatting
// ---------------------------------------------------------------------------

/// Thousands-grouped integer for metric tiles: 1234567 → "1,234,567".
pub fn format_count(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

/// Two-decimal currency string: 1234.5 → "$1,234.50".
pub fn format_usd(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let whole = ((cents / 100) as u64).to_formatted_string(&Locale::en);
    format!("{sign}${whole}.{:02}", cents % 100)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::blocktime::interpolate;

    fn round(name: &str, amount_usd: f64, votes: u64) -> Round {
        Round {
            round_id: format!("0x{name}"),
            name: name.to_string(),
            amount_usd,
            votes,
            description: String::new(),
            matching_funds_available: None,
            matching_cap: None,
            round_start_time: None,
            round_end_time: None,
        }
    }

    fn vote(id: &str, voter: &str, project_id: &str, amount_usd: f64, block_number: u64) -> Vote {
        Vote {
            id: id.to_string(),
            voter: voter.to_string(),
            project_id: project_id.to_string(),
            amount_usd,
            block_number,
        }
    }

    fn project(id: &str, title: &str) -> Project {
        Project {
            project_id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            status: crate::types::ProjectStatus::Approved,
            amount_usd: 0.0,
            votes: 0,
            unique_contributors: 0,
        }
    }

    #[test]
    fn usd_by_round_groups_and_sorts_ascending() {
        let rounds = vec![round("B", 300.0, 1), round("A", 100.0, 1), round("A", 50.0, 1)];
        let series = usd_by_round(&rounds);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "A");
        assert_eq!(series[0].value, 150.0);
        assert_eq!(series[1].label, "B");
    }

    #[test]
    fn chain_totals_sum_the_catalog() {
        let rounds = vec![round("A", 100.0, 5), round("B", 50.0, 2)];
        let totals = chain_totals(&rounds);
        assert_eq!(totals.total_votes, 7);
        assert_eq!(totals.total_usd, 150.0);
        assert_eq!(totals.total_rounds, 2);
    }

    #[test]
    fn round_totals_count_donations_and_net_positive_donors() {
        // Donations count rows with positive amounts; donors are judged
        // on their per-voter sum.
        let votes = vec![
            vote("v1", "alice", "p1", 10.0, 1),
            vote("v2", "alice", "p1", 0.0, 2),
            vote("v3", "bob", "p2", 5.0, 3),
            vote("v4", "carol", "p2", 0.0, 4),
        ];
        let projects = vec![project("p1", "One"), project("p2", "Two")];
        let totals = round_totals(&votes, &projects);
        assert_eq!(totals.total_usd, 15.0);
        assert_eq!(totals.total_donations, 2);
        assert_eq!(totals.total_donors, 2); // carol nets to zero
        assert_eq!(totals.total_projects, 2);
    }

    #[test]
    fn usd_by_project_left_joins_on_title() {
        let votes = vec![
            vote("v1", "a", "p1", 10.0, 1),
            vote("v2", "b", "p1", 2.0, 2),
            vote("v3", "c", "unknown", 1.0, 3),
        ];
        let projects = vec![project("p1", "One")];
        let series = usd_by_project(&votes, &projects);
        assert_eq!(series.len(), 2);
        // unmatched votes keep their rows under the empty title
        assert_eq!(series[0].label, "");
        assert_eq!(series[0].value, 1.0);
        assert_eq!(series[1].label, "One");
        assert_eq!(series[1].value, 12.0);
    }

    #[test]
    fn hourly_series_zero_fills_gaps() {
        let anchor = Utc.with_ymd_and_hms(2023, 4, 25, 12, 0, 0).unwrap();
        // One block per hour across four hours.
        let samples = interpolate(100, 105, anchor, 3600.0);
        // Votes in hour 0 and hour 3, nothing between.
        let votes = vec![
            vote("v1", "a", "p1", 1.0, 100),
            vote("v2", "b", "p1", 1.0, 100),
            vote("v3", "c", "p1", 1.0, 103),
        ];
        let series = votes_by_hour(&votes, &samples);
        assert_eq!(series.len(), 4);
        assert_eq!(series[0].hour, anchor);
        assert_eq!(series[0].count, 2);
        assert_eq!(series[1].count, 0);
        assert_eq!(series[2].count, 0);
        assert_eq!(series[3].count, 1);
        // contiguous hourly index
        for pair in series.windows(2) {
            assert_eq!((pair[1].hour - pair[0].hour).num_seconds(), 3600);
        }
    }

    #[test]
    fn hourly_series_counts_distinct_vote_ids() {
        let anchor = Utc.with_ymd_and_hms(2023, 4, 25, 12, 0, 0).unwrap();
        let samples = interpolate(100, 102, anchor, 60.0);
        let votes = vec![
            vote("v1", "a", "p1", 1.0, 100),
            vote("v1", "a", "p1", 1.0, 101), // duplicate id, same hour
        ];
        let series = votes_by_hour(&votes, &samples);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].count, 1);
    }

    #[test]
    fn hourly_series_is_empty_without_matching_samples() {
        let votes = vec![vote("v1", "a", "p1", 1.0, 999)];
        assert!(votes_by_hour(&votes, &[]).is_empty());
    }

    #[test]
    fn palette_assignment_is_first_seen_and_cycles() {
        let rounds: Vec<Round> = (0..17).map(|i| round(&format!("R{i}"), 1.0, 1)).collect();
        let map = color_map(&rounds);
        assert_eq!(map.len(), 17);
        assert_eq!(map[0].1, ROUND_PALETTE[0]);
        assert_eq!(map[15].1, ROUND_PALETTE[0]); // wraps
        assert_eq!(map[16].1, ROUND_PALETTE[1]);
    }

    #[test]
    fn palette_assignment_dedups_repeated_names() {
        let rounds = vec![round("A", 1.0, 1), round("A", 2.0, 1), round("B", 1.0, 1)];
        let map = color_map(&rounds);
        assert_eq!(map.len(), 2);
        assert_eq!(map[1].0, "B");
        assert_eq!(map[1].1, ROUND_PALETTE[1]);
    }

    #[test]
    fn counts_format_with_thousands_grouping() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn usd_formats_with_two_decimals() {
        assert_eq!(format_usd(1234.5), "$1,234.50");
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(999999.999), "$1,000,000.00");
    }
}
