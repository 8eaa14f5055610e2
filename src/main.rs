use estate_heatmap::api::{BackgroundFetcher, HttpListingSource};
use estate_heatmap::db::{init_db, Database};
use estate_heatmap::geometry::PixelSize;
use estate_heatmap::render::Rgb;
use estate_heatmap::timing::{Clock, SystemClock};
use estate_heatmap::{AppError, Config, HeatmapApp};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const CONTAINER: PixelSize = PixelSize {
    width: 1024,
    height: 768,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        error!(error = %e, "❌ Heat map run failed");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // 1️⃣ Config and the optional snapshot cache
    let config = Config::from_env()?;

    let db = Database::new(&config.cache_path);
    let cache = match init_db(&db) {
        Ok(()) => Some(&db),
        Err(e) => {
            warn!(error = %e, "Snapshot cache unavailable, continuing without it");
            None
        }
    };

    // 2️⃣ Initial load
    let source = Arc::new(HttpListingSource::new(
        config.api_url.clone(),
        config.http_timeout(),
    )?);
    info!(endpoint = %source.endpoint(), "Loading listings");

    let mut app = HeatmapApp::new(&config, CONTAINER);
    let report = app.bootstrap(
        source.as_ref(),
        cache,
        chrono::Utc::now().timestamp_millis(),
        config.cache_max_age,
        &mut rand::thread_rng(),
        std::thread::sleep,
    )?;
    info!(origin = ?report.origin, kept = report.kept, skipped = report.skipped, "Listings loaded");

    app.on_map_ready();
    app.on_animation_frame();

    // 3️⃣ One settled view, fetched in the background like a real pan would be
    let clock = SystemClock::new();
    let fetcher = BackgroundFetcher::new(source);
    let give_up_at = clock.now() + config.bounds_debounce + config.request_timeout;

    app.on_view_settled(clock.now());
    loop {
        let now = clock.now();
        if let Some(ticket) = app.tick(now).fetch {
            fetcher.spawn(ticket);
        }
        if let Some(done) = fetcher.recv_timeout(Duration::from_millis(25)) {
            let outcome = app.on_fetch_complete(done);
            info!(?outcome, "Bounds fetch finished");
            break;
        }
        if now >= give_up_at {
            warn!("No bounds response in time, keeping the initial listings");
            break;
        }
    }

    if let Some(stats) = app.on_animation_frame() {
        info!(
            drawn = stats.drawn,
            culled = stats.culled,
            coalesced_frames = app.scheduler().cancelled(),
            "Final frame painted"
        );
    }
    if let Some(banner) = app.error_banner_html() {
        warn!(%banner, "Error banner showing");
    }

    // 4️⃣ Write the heat layer out
    app.canvas().save(&config.output_path, Rgb::new(255, 255, 255))?;

    info!(path = %config.output_path.display(), "🗺️ Heat layer written");
    Ok(())
}
