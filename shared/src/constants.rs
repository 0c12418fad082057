pub const API_BASE_URL: &str = "http://127.0.0.1:3000";
pub const WHEEL_STATUS_ENDPOINT: &str = "/api/wheel/cooldown";
pub const WHEEL_SPIN_ENDPOINT: &str = "/api/wheel/spin";

pub const NETWORK_ERROR: &str = "Network error. Please try again";
pub const SPIN_FAILED_ERROR: &str = "The wheel couldn't spin right now. Please try again";
pub const COOLDOWN_MESSAGE_PREFIX: &str = "Please wait";
