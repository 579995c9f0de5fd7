mod detect;
mod hunter;
mod metrics;
mod page;
mod settings;
mod utils;

pub use detect::{parse_timer_text, Candidate, CandidateTracker, Observation};
pub use hunter::{
    HunterController, HunterSnapshot, HunterState, PlaybackController, PlayerMode, SkipEndReason,
    SkipEpisode,
};
pub use metrics::{MetricsCollector, MetricsSnapshot};
pub use page::{sim, ElementId, Page, PageElement, VideoSurface};
pub use settings::{SettingsStore, Tuning};
