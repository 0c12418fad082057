use std::cell::Cell;

use gloo_net::http::{Request, Response};
use shared::constants::{WHEEL_SPIN_ENDPOINT, WHEEL_STATUS_ENDPOINT};
use shared::reward_wheel::{WheelSpinRequest, WheelSpinResponse, WheelStatusResponse};
use shared::{SpinAuthority, SpinStatus, WheelError};
use web_sys::window;

// Get auth token from storage
pub fn get_auth_token() -> Option<String> {
    window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item("token").ok().flatten())
        .or_else(|| window()
            .and_then(|w| w.session_storage().ok().flatten())
            .and_then(|s| s.get_item("token").ok().flatten()))
}

/// Talks to the wheel endpoints of the backend.
pub struct HttpSpinAuthority {
    base_url: String,
    token: Option<String>,
    last_cooldown: Cell<Option<i64>>,
    last_window: Cell<Option<i64>>,
}

impl HttpSpinAuthority {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            base_url,
            token,
            last_cooldown: Cell::new(None),
            last_window: Cell::new(None),
        }
    }

    /// Cooldown reported by the most recent status or spin response.
    pub fn last_cooldown(&self) -> Option<i64> {
        self.last_cooldown.get()
    }

    /// Full cooldown window the server reported with its last status.
    pub fn last_window(&self) -> Option<i64> {
        self.last_window.get()
    }

    fn bearer(&self) -> Result<String, WheelError> {
        self.token
            .as_ref()
            .map(|token| format!("Bearer {}", token))
            .ok_or_else(|| WheelError::request_failed("No authentication token found"))
    }

    fn checked(response: Response) -> Result<Response, WheelError> {
        if response.ok() {
            Ok(response)
        } else {
            Err(WheelError::request_failed(format!("Error status: {}", response.status())))
        }
    }
}

impl SpinAuthority for HttpSpinAuthority {
    async fn spin_status(&self) -> Result<SpinStatus, WheelError> {
        let response = Request::get(&format!("{}{}", self.base_url, WHEEL_STATUS_ENDPOINT))
            .header("Authorization", &self.bearer()?)
            .send()
            .await
            .map_err(|e| WheelError::request_failed(format!("Network error: {}", e)))?;

        let status = Self::checked(response)?
            .json::<WheelStatusResponse>()
            .await
            .map_err(|e| WheelError::request_failed(format!("Error parsing status response: {}", e)))?;

        self.last_cooldown.set(Some(status.cooldown_seconds));
        self.last_window.set(status.window_seconds);
        Ok(status.into())
    }

    async fn request_spin_outcome(&self) -> Result<Option<u32>, WheelError> {
        let spin_req = WheelSpinRequest {
            timestamp: js_sys::Date::now() as u64,
        };

        let response = Request::post(&format!("{}{}", self.base_url, WHEEL_SPIN_ENDPOINT))
            .header("Authorization", &self.bearer()?)
            .json(&spin_req)
            .map_err(|e| WheelError::request_failed(format!("Failed to build request: {}", e)))?
            .send()
            .await
            .map_err(|e| WheelError::request_failed(format!("Network error: {}", e)))?;

        let spin_resp = Self::checked(response)?
            .json::<WheelSpinResponse>()
            .await
            .map_err(|e| WheelError::request_failed(format!("Error parsing spin response: {}", e)))?;

        self.last_cooldown.set(Some(spin_resp.cooldown_seconds));

        if !spin_resp.success {
            if let Some(message) = &spin_resp.message {
                log::info!("wheel spin not granted: {}", message);
            }
            return Ok(None);
        }

        Ok(spin_resp.reward_points)
    }
}
