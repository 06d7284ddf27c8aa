// Framework bootstrap for the paddle server runtime.

use crate::domain::GameRng;
use crate::domain::tuning::ball::BallTuning;
use crate::frameworks::config;
use crate::interface_adapters::net::ws_handler;
use crate::interface_adapters::protocol::encode_world_update;
use crate::interface_adapters::state::AppState;
use crate::use_cases::{GameEvent, GameWorld, WorldSettings, world_task};

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};
use tokio::sync::mpsc;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Serves the game on an already bound listener until the server fails.
pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(WorldSettings {
        tick_interval: config::TICK_INTERVAL,
        side_policy: config::side_policy(),
        ball: BallTuning::default(),
    });

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::new(config::http_host(), config::http_port());

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state(settings: WorldSettings) -> Arc<AppState> {
    let rng = match config::serve_seed() {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };

    // All connects, disconnects and moves go through this one queue.
    let (event_tx, event_rx) = mpsc::channel::<GameEvent>(config::EVENT_CHANNEL_CAPACITY);

    let world = GameWorld::new(settings.side_policy, settings.ball, rng, encode_world_update);
    tracing::debug!(
        side_policy = ?world.registry().policy(),
        tick_ms = settings.tick_interval.as_millis() as u64,
        "world configured"
    );

    // Spawn the authoritative world loop; it owns the game state outright.
    tokio::spawn(world_task(event_rx, world, settings.tick_interval));

    Arc::new(AppState {
        event_tx,
        outbound_capacity: config::OUTBOUND_CHANNEL_CAPACITY,
    })
}
