use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

/// Tunable thresholds for detection and playback control.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tuning {
    /// Slow poll cadence while searching the page for ad timers
    pub scan_interval_ms: u64,

    /// Fast poll cadence while an ad is being skipped
    pub ad_mode_interval_ms: u64,

    /// Playback rate applied while an ad is active
    pub speed_multiplier: f64,

    /// Timers at or above this many seconds are not ads (VOD scrubbers,
    /// stream-start countdowns)
    pub max_ad_duration_secs: u32,

    /// Fraction of the viewport, from the top, searched for timers; the
    /// bottom of the screen is player-bar territory
    pub screen_search_area: f64,

    /// Hard ceiling on continuous accelerated playback, in milliseconds
    pub max_skip_time_ms: u64,

    /// Elements with longer text are skipped before regex evaluation
    pub max_candidate_text_len: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            scan_interval_ms: 1000,
            ad_mode_interval_ms: 50,
            speed_multiplier: 16.0,
            max_ad_duration_secs: 180,
            screen_search_area: 0.30,
            max_skip_time_ms: 60_000,
            max_candidate_text_len: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct UserSettings {
    tuning: Tuning,
}

/// JSON-backed store for tuning overrides. Detection state itself is never
/// persisted; only the knobs are.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn tuning(&self) -> Tuning {
        self.data.read().unwrap().tuning.clone()
    }

    pub fn update_tuning(&self, tuning: Tuning) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.tuning = tuning;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
