use crate::error::WheelError;
use crate::reward_wheel::WheelStatusResponse;

/// What the authority currently says about spinning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpinStatus {
    pub cooldown_seconds: i64,
    pub requires_membership: bool,
    pub window_seconds: Option<i64>,
}

impl SpinStatus {
    pub fn can_spin(&self) -> bool {
        self.cooldown_seconds <= 0 && !self.requires_membership
    }
}

impl From<WheelStatusResponse> for SpinStatus {
    fn from(response: WheelStatusResponse) -> Self {
        Self {
            cooldown_seconds: response.cooldown_seconds,
            requires_membership: response.requires_membership,
            window_seconds: response.window_seconds,
        }
    }
}

/// The service that decides eligibility and reward value. The wheel only
/// visualizes its decisions.
#[allow(async_fn_in_trait)]
pub trait SpinAuthority {
    async fn spin_status(&self) -> Result<SpinStatus, WheelError>;

    /// `Ok(None)` means the spin was not granted.
    async fn request_spin_outcome(&self) -> Result<Option<u32>, WheelError>;
}
