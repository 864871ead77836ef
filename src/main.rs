//! weather-station: periodic weather observation service.
//!
//! Single-binary Tokio application that:
//! 1. Resolves the configured city to a coordinate
//! 2. Fetches the current temperature on a fixed interval
//! 3. Accumulates readings in an in-memory store
//! 4. Serves the accumulated series over HTTP

use clap::Parser;
use geocoding_client::GeocodingClient;
use observation_store::ObservationStore;
use open_meteo_client::OpenMeteoClient;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use weather_station::{config, http, scheduler};

/// Periodic weather observation service
#[derive(Parser)]
#[command(name = "weather-station", about = "Periodic weather observation service")]
struct Cli {
    /// Run a single refresh cycle, print the stored series, and exit.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "weather_station=info,geocoding_client=info,open_meteo_client=info,observation_store=info"
                    .into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    info!("Weather station starting up...");

    // Load configuration.
    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "Tracking {} every {}s, serving on port {}",
        cfg.city, cfg.refresh_interval_secs, cfg.http_port
    );

    // Build clients and the store.
    let timeout = Duration::from_secs(cfg.request_timeout_secs);
    let geocoding = match GeocodingClient::new(timeout) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build geocoding client: {}", e);
            std::process::exit(1);
        }
    };
    let open_meteo = match OpenMeteoClient::new(timeout) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build forecast client: {}", e);
            std::process::exit(1);
        }
    };

    let store = Arc::new(ObservationStore::new());
    let mut job = scheduler::RefreshJob::new(
        geocoding,
        open_meteo,
        store.clone(),
        cfg.city.clone(),
        cfg.location_key(),
    );

    // ── Dry-run mode ─────────────────────────────────────────────────
    if cli.dry_run {
        info!("Running a single refresh cycle (dry-run)...");
        if let Err(e) = job.run_cycle().await {
            error!("Refresh cycle failed: {}", e);
            std::process::exit(1);
        }
        let series = store.read(&cfg.location_key()).await.unwrap_or_default();
        match serde_json::to_string_pretty(&series) {
            Ok(body) => println!("{}", body),
            Err(e) => error!("Failed to serialize series: {}", e),
        }
        return;
    }

    // ── Spawn tasks ──────────────────────────────────────────────────
    let shutdown = CancellationToken::new();

    let mut scheduler_handle = tokio::spawn(job.run(
        Duration::from_secs(cfg.refresh_interval_secs),
        shutdown.clone(),
    ));

    tokio::spawn(run_heartbeat(
        store.clone(),
        Duration::from_secs(cfg.heartbeat_interval_secs),
        shutdown.clone(),
    ));

    // ── HTTP server ──────────────────────────────────────────────────
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.http_port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    info!("Listening on {}", addr);

    let app = http::router(store.clone());
    let server_shutdown = shutdown.clone();
    let mut server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
            .await
        {
            error!("HTTP server error: {}", e);
        }
    });

    // ── Wait for shutdown ────────────────────────────────────────────
    info!("Weather station is running. Press Ctrl+C to stop.");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        r = &mut scheduler_handle => {
            error!("Scheduler task exited unexpectedly: {:?}", r);
            shutdown.cancel();
            std::process::exit(1);
        }
        r = &mut server_handle => {
            error!("HTTP server task exited unexpectedly: {:?}", r);
            shutdown.cancel();
            std::process::exit(1);
        }
    }

    // Let the server drain in-flight requests and the refresh loop finish
    // its current cycle.
    shutdown.cancel();
    let _ = server_handle.await;
    let _ = scheduler_handle.await;

    info!("Weather station shut down.");
}

/// Periodic log line summarizing the store contents.
async fn run_heartbeat(
    store: Arc<ObservationStore>,
    period: Duration,
    shutdown: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let mut keys = store.tracked_keys().await;
                keys.sort();
                let mut parts = Vec::with_capacity(keys.len());
                for key in &keys {
                    parts.push(format!("{}={}", key, store.len(key).await));
                }
                info!("HEARTBEAT: locations={} readings=[{}]", keys.len(), parts.join(" "));
            }
            _ = shutdown.cancelled() => return,
        }
    }
}
