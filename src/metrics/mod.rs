mod types;

pub use types::MetricsSnapshot;

use std::sync::{Arc, Mutex};

use crate::hunter::SkipEpisode;

const MAX_RECENT_EPISODES: usize = 20;

/// Shared in-memory counters for the detection loop. Clones share state;
/// everything is process-local and gone when the page goes away.
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsState>>,
}

struct MetricsState {
    scan_ticks: u64,
    ad_ticks: u64,
    confirmations: u64,
    brake_activations: u64,
    recent_episodes: Vec<SkipEpisode>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsState {
                scan_ticks: 0,
                ad_ticks: 0,
                confirmations: 0,
                brake_activations: 0,
                recent_episodes: Vec::with_capacity(MAX_RECENT_EPISODES),
            })),
        }
    }

    pub fn record_scan_tick(&self) {
        self.inner.lock().unwrap().scan_ticks += 1;
    }

    pub fn record_ad_tick(&self) {
        self.inner.lock().unwrap().ad_ticks += 1;
    }

    pub fn record_confirmation(&self) {
        self.inner.lock().unwrap().confirmations += 1;
    }

    pub fn record_brake(&self) {
        self.inner.lock().unwrap().brake_activations += 1;
    }

    /// Keep a bounded window of finished episodes.
    pub fn record_episode(&self, episode: SkipEpisode) {
        let mut state = self.inner.lock().unwrap();
        if state.recent_episodes.len() == MAX_RECENT_EPISODES {
            state.recent_episodes.remove(0);
        }
        state.recent_episodes.push(episode);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.inner.lock().unwrap();
        MetricsSnapshot {
            scan_ticks: state.scan_ticks,
            ad_ticks: state.ad_ticks,
            confirmations: state.confirmations,
            brake_activations: state.brake_activations,
            recent_episodes: state.recent_episodes.clone(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
