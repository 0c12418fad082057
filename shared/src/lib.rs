pub mod animation;
pub mod authority;
pub mod constants;
pub mod controller;
pub mod error;
pub mod reward_wheel;
pub mod spin_session;

pub use authority::{SpinAuthority, SpinStatus};
pub use controller::{spin_once, SpinOutcome, WheelController};
pub use error::WheelError;
pub use reward_wheel::{map_outcome_to_angle, RewardTier, TierTable};
pub use spin_session::{GateRejection, SpinPhase, SpinSession, SpinTicket};
