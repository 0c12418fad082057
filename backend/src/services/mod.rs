pub mod cooldown_service;
pub mod reward_odds;
