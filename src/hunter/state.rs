use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PlayerMode {
    /// Slow-polling search for candidate ad timers.
    Scan,
    /// Fast-polling accelerated playback while a confirmed timer persists.
    AdSkip,
}

impl Default for PlayerMode {
    fn default() -> Self {
        PlayerMode::Scan
    }
}

/// Why an accelerated-playback episode ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SkipEndReason {
    /// The confirmed timer disappeared, hid, or stopped parsing.
    TimerGone,
    /// The hard ceiling on continuous accelerated playback fired.
    SafetyBrake,
    /// The hunter was shut down while skipping.
    Stopped,
}

/// One stretch of accelerated playback, for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipEpisode {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub end_reason: Option<SkipEndReason>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HunterState {
    pub mode: PlayerMode,
    pub episode: Option<SkipEpisode>,
    /// Monotonic anchor for the safety ceiling; the wall-clock timestamps on
    /// the episode are for display only.
    #[serde(skip)]
    pub skip_anchor: Option<Instant>,
}

impl Default for HunterState {
    fn default() -> Self {
        Self {
            mode: PlayerMode::Scan,
            episode: None,
            skip_anchor: None,
        }
    }
}

impl HunterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_skipping(&self) -> bool {
        self.mode == PlayerMode::AdSkip
    }

    /// Enter ad-skip mode and open a fresh episode.
    pub fn begin_skip(&mut self, started_at: DateTime<Utc>, now: Instant) {
        self.mode = PlayerMode::AdSkip;
        self.skip_anchor = Some(now);
        self.episode = Some(SkipEpisode {
            id: Uuid::new_v4().to_string(),
            started_at,
            ended_at: None,
            end_reason: None,
        });
    }

    /// Return to scanning; finishes and yields the episode if one was open.
    pub fn end_skip(
        &mut self,
        reason: SkipEndReason,
        ended_at: DateTime<Utc>,
    ) -> Option<SkipEpisode> {
        self.mode = PlayerMode::Scan;
        self.skip_anchor = None;
        let mut episode = self.episode.take()?;
        episode.ended_at = Some(ended_at);
        episode.end_reason = Some(reason);
        Some(episode)
    }

    /// Whether continuous accelerated playback has outrun the hard ceiling.
    pub fn ceiling_exceeded(&self, max_skip: Duration) -> bool {
        self.skip_anchor
            .map(|anchor| anchor.elapsed() > max_skip)
            .unwrap_or(false)
    }
}
