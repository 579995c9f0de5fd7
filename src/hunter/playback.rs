use crate::page::VideoSurface;

/// Applies and reverts accelerated playback on the video surface.
///
/// Nothing else touches playback properties; the loop calls `engage` on
/// confirmation, `maintain` every ad-mode tick, and `disengage` on every
/// return to scanning.
#[derive(Debug)]
pub struct PlaybackController {
    multiplier: f64,
    engaged: bool,
}

impl PlaybackController {
    pub fn new(multiplier: f64) -> Self {
        Self {
            multiplier,
            engaged: false,
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Accelerate and mute. Safe to call when already engaged.
    pub fn engage<V: VideoSurface>(&mut self, video: &V) {
        video.set_playback_rate(self.multiplier);
        video.set_muted(true);
        self.engaged = true;
    }

    /// Restore normal playback: rate 1.0, unmuted. Safe to call repeatedly.
    pub fn disengage<V: VideoSurface>(&mut self, video: &V) {
        video.set_playback_rate(1.0);
        video.set_muted(false);
        self.engaged = false;
    }

    /// Re-assert the accelerated rate if a page script or the user reset it.
    pub fn maintain<V: VideoSurface>(&self, video: &V) {
        if video.playback_rate() != self.multiplier {
            video.set_playback_rate(self.multiplier);
        }
    }
}
