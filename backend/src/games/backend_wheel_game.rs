use std::time::Instant;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use rand::rngs::OsRng;
use shared::constants::COOLDOWN_MESSAGE_PREFIX;
use shared::reward_wheel::*;

use crate::auth::PlayerId;
use crate::services::cooldown_service::ceil_secs;
use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/spin", post(spin_wheel))
        .route("/cooldown", get(get_wheel_cooldown))
}

/// Decides whether the player may spin and, if so, what they won.
async fn spin_wheel(
    State(state): State<AppState>,
    player: PlayerId,
    Json(_request): Json<WheelSpinRequest>,
) -> Json<WheelSpinResponse> {
    // Check and start the cooldown in one step so a double tap can't spin twice
    if let Err(left) = state.cooldowns.try_start(&player.0, Instant::now()) {
        let seconds = ceil_secs(left);
        tracing::debug!("wheel spin refused, player {} on cooldown for {}s", player, seconds);
        return Json(WheelSpinResponse {
            success: false,
            reward_points: None,
            cooldown_seconds: seconds,
            message: Some(format!("{} {} seconds before spinning again.", COOLDOWN_MESSAGE_PREFIX, seconds)),
        });
    }

    let (reward, result_number) = state.odds.draw(&mut OsRng);

    tracing::info!("🎡 WHEEL SPIN: Player {} rolled {:.2} and won {} points", player, result_number, reward);

    Json(WheelSpinResponse {
        success: true,
        reward_points: Some(reward),
        cooldown_seconds: ceil_secs(state.cooldowns.window()),
        message: Some(format!("You rolled {:.2} and won {} points! 🎉", result_number, reward)),
    })
}

async fn get_wheel_cooldown(
    State(state): State<AppState>,
    player: PlayerId,
) -> Json<WheelStatusResponse> {
    let cooldown_seconds = state
        .cooldowns
        .remaining(&player.0, Instant::now())
        .map(ceil_secs)
        .unwrap_or(0);

    Json(WheelStatusResponse {
        cooldown_seconds,
        requires_membership: false,
        window_seconds: Some(ceil_secs(state.cooldowns.window())),
    })
}
