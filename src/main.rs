use std::time::Duration;

use anyhow::Result;
use log::info;

use adhunter::sim::SimPage;
use adhunter::{HunterController, PageElement, Tuning, VideoSurface};

/// Demo run against a scripted page: content plays, an ad countdown appears
/// near the top of the viewport, ticks down, then disappears. Watch the
/// playback rate jump to the multiplier and drop back.
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("adhunter demo starting up...");

    let page = SimPage::new(900.0);
    let video = page.attach_video();

    // Quicker cadence than the defaults so the demo finishes in seconds
    let tuning = Tuning {
        scan_interval_ms: 200,
        ad_mode_interval_ms: 20,
        ..Tuning::default()
    };

    let mut controller = HunterController::new(tuning);
    controller.start(page.clone())?;

    tokio::time::sleep(Duration::from_millis(500)).await;
    info!("content playing at {}x", video.playback_rate());

    let timer = page.insert_text("0:05", 40.0);
    info!("ad break: countdown appeared");

    for seconds in (0..5).rev() {
        tokio::time::sleep(Duration::from_millis(450)).await;
        page.set_text(timer.id(), &format!("0:{:02}", seconds));
        info!(
            "ad timer shows 0:{:02}, playback at {}x",
            seconds,
            video.playback_rate()
        );
    }

    tokio::time::sleep(Duration::from_millis(200)).await;
    page.detach(timer.id());
    tokio::time::sleep(Duration::from_millis(300)).await;
    info!("ad over, playback back at {}x", video.playback_rate());

    controller.stop().await?;

    let metrics = controller.metrics().snapshot();
    println!("{}", serde_json::to_string_pretty(&metrics)?);

    Ok(())
}
