use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::detect::{CandidateTracker, Observation};
use crate::metrics::MetricsCollector;
use crate::page::{Page, PageElement, VideoSurface};
use crate::settings::Tuning;

use super::playback::PlaybackController;
use super::state::{HunterState, PlayerMode, SkipEndReason};

// Set to false to silence per-tick logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Single self-rescheduling poll loop.
///
/// Exactly one tick runs at a time: each tick completes, decides the next
/// interval from the state it ended in, then sleeps. Cancellation is the only
/// way out, and the shutdown path restores normal playback first.
pub async fn hunter_loop<P: Page>(
    page: P,
    tuning: Tuning,
    state: Arc<Mutex<HunterState>>,
    metrics: MetricsCollector,
    cancel_token: CancellationToken,
) {
    let mut tracker = CandidateTracker::new(tuning.max_ad_duration_secs);
    let mut playback = PlaybackController::new(tuning.speed_multiplier);

    loop {
        let next = {
            let mut guard = state.lock().await;
            tick(
                &page,
                &tuning,
                &mut guard,
                &mut tracker,
                &mut playback,
                &metrics,
            )
        };

        tokio::select! {
            _ = tokio::time::sleep(next) => {}
            _ = cancel_token.cancelled() => {
                let mut guard = state.lock().await;
                shutdown(&page, &mut guard, &mut playback, &metrics);
                break;
            }
        }
    }
}

/// Run one poll and return the interval until the next one.
///
/// The interval is a function of the state the tick *ends* in, so entering
/// ad mode speeds the loop up immediately and leaving it slows back down.
pub(crate) fn tick<P: Page>(
    page: &P,
    tuning: &Tuning,
    state: &mut HunterState,
    tracker: &mut CandidateTracker<P::Element>,
    playback: &mut PlaybackController,
    metrics: &MetricsCollector,
) -> Duration {
    let Some(video) = page.video() else {
        // No video surface yet; nothing to drive or to protect.
        return Duration::from_millis(tuning.scan_interval_ms);
    };

    match state.mode {
        PlayerMode::AdSkip => {
            ad_skip_tick(&video, tuning, state, tracker, playback, metrics)
        }
        PlayerMode::Scan => {
            scan_tick(page, &video, tuning, state, tracker, playback, metrics)
        }
    }

    next_interval(state.mode, tuning)
}

/// Poll cadence for a given mode: fast while an ad is being skipped, slow
/// while scanning the full page.
pub(crate) fn next_interval(mode: PlayerMode, tuning: &Tuning) -> Duration {
    match mode {
        PlayerMode::AdSkip => Duration::from_millis(tuning.ad_mode_interval_ms),
        PlayerMode::Scan => Duration::from_millis(tuning.scan_interval_ms),
    }
}

fn ad_skip_tick<E: PageElement, V: VideoSurface>(
    video: &V,
    tuning: &Tuning,
    state: &mut HunterState,
    tracker: &mut CandidateTracker<E>,
    playback: &mut PlaybackController,
    metrics: &MetricsCollector,
) {
    metrics.record_ad_tick();

    if state.ceiling_exceeded(Duration::from_millis(tuning.max_skip_time_ms)) {
        log_warn!(
            "safety brake: accelerated playback exceeded {}ms, restoring",
            tuning.max_skip_time_ms
        );
        playback.disengage(video);
        tracker.clear();
        if let Some(episode) = state.end_skip(SkipEndReason::SafetyBrake, Utc::now()) {
            metrics.record_brake();
            metrics.record_episode(episode);
        }
        return;
    }

    if tracker.any_confirmed_valid() {
        // Ad still running; a page script may have reset the rate under us
        playback.maintain(video);
    } else {
        log_info!("ad timer gone; restoring normal playback");
        playback.disengage(video);
        tracker.clear();
        if let Some(episode) = state.end_skip(SkipEndReason::TimerGone, Utc::now()) {
            metrics.record_episode(episode);
        }
    }
}

fn scan_tick<P: Page>(
    page: &P,
    video: &P::Video,
    tuning: &Tuning,
    state: &mut HunterState,
    tracker: &mut CandidateTracker<P::Element>,
    playback: &mut PlaybackController,
    metrics: &MetricsCollector,
) {
    metrics.record_scan_tick();

    // Ad timers sit near the top of the player; the bottom of the viewport
    // is scrubber territory
    let cutoff = page.viewport_height() * tuning.screen_search_area;

    for element in page.text_elements() {
        let text = element.text();
        if text.is_empty() || text.chars().count() > tuning.max_candidate_text_len {
            continue;
        }
        if element.top() > cutoff {
            continue;
        }

        let outcome = tracker.observe(&element, &text);
        if outcome == Observation::Confirmed && !state.is_skipping() {
            log_info!(
                "ad countdown confirmed on element {}; accelerating playback",
                element.id()
            );
            playback.engage(video);
            state.begin_skip(Utc::now(), Instant::now());
            metrics.record_confirmation();
        }
    }

    tracker.sweep();
}

fn shutdown<P: Page>(
    page: &P,
    state: &mut HunterState,
    playback: &mut PlaybackController,
    metrics: &MetricsCollector,
) {
    if state.is_skipping() {
        if let Some(video) = page.video() {
            playback.disengage(&video);
        }
        if let Some(episode) = state.end_skip(SkipEndReason::Stopped, Utc::now()) {
            metrics.record_episode(episode);
        }
    }
    log_info!("hunter loop shutting down");
}
