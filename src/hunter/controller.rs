use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::metrics::MetricsCollector;
use crate::page::Page;
use crate::settings::Tuning;

use super::loop_worker::hunter_loop;
use super::state::{HunterState, PlayerMode, SkipEpisode};

/// Point-in-time view of the hunter, for diagnostics.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HunterSnapshot {
    pub mode: PlayerMode,
    pub episode: Option<SkipEpisode>,
}

/// Owns the spawned poll loop: fire-and-forget start, cancellation on stop.
///
/// The loop itself exposes nothing to the hosting page; this surface exists
/// so the embedder can tear the task down on unload and read diagnostics.
pub struct HunterController {
    tuning: Tuning,
    state: Arc<Mutex<HunterState>>,
    metrics: MetricsCollector,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl HunterController {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            state: Arc::new(Mutex::new(HunterState::new())),
            metrics: MetricsCollector::new(),
            handle: None,
            cancel_token: None,
        }
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    pub async fn snapshot(&self) -> HunterSnapshot {
        let guard = self.state.lock().await;
        HunterSnapshot {
            mode: guard.mode,
            episode: guard.episode.clone(),
        }
    }

    /// Spawn the poll loop over the given page.
    pub fn start<P: Page>(&mut self, page: P) -> Result<()> {
        if self.handle.is_some() {
            bail!("hunter already active");
        }

        info!(
            "starting ad hunt: scan every {}ms, ad mode every {}ms, {}x speed",
            self.tuning.scan_interval_ms, self.tuning.ad_mode_interval_ms,
            self.tuning.speed_multiplier
        );

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(hunter_loop(
            page,
            self.tuning.clone(),
            self.state.clone(),
            self.metrics.clone(),
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Cancel the loop and wait for it to wind down. If an ad was being
    /// skipped, the loop restores normal playback on its way out.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("hunter loop task failed to join")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hunter::state::SkipEndReason;
    use crate::page::sim::SimPage;
    use crate::page::{PageElement, VideoSurface};
    use std::time::Duration;

    fn fast_tuning() -> Tuning {
        Tuning {
            scan_interval_ms: 10,
            ad_mode_interval_ms: 5,
            ..Tuning::default()
        }
    }

    #[tokio::test]
    async fn double_start_is_rejected() {
        let page = SimPage::new(1000.0);
        let mut controller = HunterController::new(fast_tuning());

        controller.start(page.clone()).unwrap();
        assert!(controller.start(page).is_err());
        controller.stop().await.unwrap();
    }

    #[tokio::test]
    async fn stop_without_start_is_fine() {
        let mut controller = HunterController::new(fast_tuning());
        controller.stop().await.unwrap();
    }

    #[tokio::test]
    async fn full_ad_cycle_through_the_spawned_loop() {
        let page = SimPage::new(1000.0);
        let video = page.attach_video();
        let mut controller = HunterController::new(fast_tuning());
        controller.start(page.clone()).unwrap();

        let el = page.insert_text("0:10", 40.0);
        tokio::time::sleep(Duration::from_millis(30)).await;
        page.set_text(el.id(), "0:09");
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(controller.snapshot().await.mode, PlayerMode::AdSkip);
        assert_eq!(video.playback_rate(), 16.0);
        assert!(video.muted());

        page.detach(el.id());
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(controller.snapshot().await.mode, PlayerMode::Scan);
        assert_eq!(video.playback_rate(), 1.0);
        assert!(!video.muted());

        controller.stop().await.unwrap();

        let snapshot = controller.metrics().snapshot();
        assert_eq!(snapshot.confirmations, 1);
        assert_eq!(snapshot.recent_episodes.len(), 1);
        assert_eq!(
            snapshot.recent_episodes[0].end_reason,
            Some(SkipEndReason::TimerGone)
        );
    }

    #[tokio::test]
    async fn stop_mid_skip_restores_playback() {
        let page = SimPage::new(1000.0);
        let video = page.attach_video();
        let mut controller = HunterController::new(fast_tuning());
        controller.start(page.clone()).unwrap();

        let el = page.insert_text("0:10", 40.0);
        tokio::time::sleep(Duration::from_millis(30)).await;
        page.set_text(el.id(), "0:09");
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(video.playback_rate(), 16.0);

        controller.stop().await.unwrap();
        assert_eq!(video.playback_rate(), 1.0);
        assert!(!video.muted());

        let snapshot = controller.metrics().snapshot();
        assert_eq!(
            snapshot.recent_episodes[0].end_reason,
            Some(SkipEndReason::Stopped)
        );
    }
}
