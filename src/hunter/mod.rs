pub mod controller;
pub mod loop_worker;
pub mod playback;
pub mod state;

pub use controller::{HunterController, HunterSnapshot};
pub use playback::PlaybackController;
pub use state::{HunterState, PlayerMode, SkipEndReason, SkipEpisode};
