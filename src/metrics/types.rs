use serde::Serialize;

use crate::hunter::SkipEpisode;

/// Counters and recent history for the detection loop.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Slow-mode polls executed
    pub scan_ticks: u64,
    /// Fast-mode polls executed
    pub ad_ticks: u64,
    /// Countdowns confirmed (ad mode entries)
    pub confirmations: u64,
    /// Times the safety ceiling ended a skip
    pub brake_activations: u64,
    /// Most recent skip episodes, oldest first
    pub recent_episodes: Vec<SkipEpisode>,
}
