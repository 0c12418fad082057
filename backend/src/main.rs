use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use shared::reward_wheel::TierTable;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::games::backend_wheel_game::create_router as create_wheel_game_router;
use crate::services::cooldown_service::CooldownStore;
use crate::services::reward_odds::RewardOdds;

mod auth;
mod config;
mod error;
mod games;
mod logging;
mod services;

const COOLDOWN_PURGE_INTERVAL: Duration = Duration::from_secs(600);

#[derive(Clone)]
pub struct AppState {
    cooldowns: Arc<CooldownStore>,
    odds: Arc<RewardOdds>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            cooldowns: Arc::new(CooldownStore::new(config.spin_cooldown)),
            odds: Arc::new(RewardOdds::reference()),
        }
    }
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let cors = match config.allowed_origin.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => cors.allow_origin(origin),
        Some(Err(_)) => {
            warn!("WHEEL_ALLOWED_ORIGIN is not a valid header value, allowing any origin");
            cors.allow_origin(Any)
        }
        None => cors.allow_origin(Any),
    };

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/wheel", create_wheel_game_router())
        .layer(cors)
        .with_state(state)
}

// Expired cooldowns are harmless but would otherwise pile up forever
fn spawn_cooldown_purge(cooldowns: Arc<CooldownStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(COOLDOWN_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = cooldowns.purge_expired(Instant::now());
            if purged > 0 {
                tracing::debug!("purged {} expired wheel cooldowns", purged);
            }
        }
    });
}

#[tokio::main]
async fn main() {
    dotenvy::from_path(".env").ok();
    logging::setup();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState::new(&config);

    let missing = state.odds.missing_from(TierTable::reference());
    if !missing.is_empty() {
        warn!("Reward odds include rewards the wheel cannot show: {:?}", missing);
    }

    spawn_cooldown_purge(state.cooldowns.clone());

    let app = build_router(state, &config);

    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", config.bind_addr, e);
            std::process::exit(1);
        }
    };

    info!(
        "Wheel authority listening on {} (cooldown {}s)",
        config.bind_addr,
        config.spin_cooldown.as_secs()
    );

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}
