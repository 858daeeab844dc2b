//! Top-N selection of the busiest network interfaces.
//!
//! Kept free of any terminal or runtime dependency; it only looks at the
//! network section of one snapshot.

use std::time::{Duration, Instant};

use crate::system::snapshot::NetworkStat;

pub const DEFAULT_TOP_N: usize = 3;
pub const DEFAULT_CADENCE: Duration = Duration::from_secs(30);

/// Names of the `limit` interfaces with the highest `rx + tx` rate.
///
/// The sort is stable, so equal totals keep the provider's order.
pub fn rank_interfaces(entries: &[NetworkStat], limit: usize) -> Vec<String> {
    let mut ranked: Vec<&NetworkStat> = entries.iter().collect();
    ranked.sort_by(|a, b| b.total_bytes().cmp(&a.total_bytes()));
    ranked
        .into_iter()
        .take(limit)
        .map(|n| n.name.clone())
        .collect()
}

#[derive(Debug, Clone)]
pub struct RankingCache {
    top_names: Vec<String>,
    last_refresh: Option<Instant>,
    cadence: Duration,
    limit: usize,
}

impl Default for RankingCache {
    fn default() -> Self {
        Self::new(DEFAULT_CADENCE, DEFAULT_TOP_N)
    }
}

impl RankingCache {
    /// `limit` is capped at [`DEFAULT_TOP_N`].
    pub fn new(cadence: Duration, limit: usize) -> Self {
        RankingCache {
            top_names: Vec::new(),
            last_refresh: None,
            cadence,
            limit: limit.min(DEFAULT_TOP_N),
        }
    }

    pub fn top_names(&self) -> &[String] {
        &self.top_names
    }

    pub fn last_refresh(&self) -> Option<Instant> {
        self.last_refresh
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_refresh {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.cadence,
        }
    }

    /// Re-ranks from `entries` when the cadence has elapsed. Returns whether it did.
    pub fn refresh(&mut self, entries: &[NetworkStat], now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.top_names = rank_interfaces(entries, self.limit);
        self.last_refresh = Some(now);
        true
    }
}
