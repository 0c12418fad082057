use shared::constants::API_BASE_URL;
use web_sys::window;

pub fn get_api_base_url() -> String {
    if let Some(window) = window() {
        if let Ok(host) = window.location().host() {
            if !host.is_empty() {
                // Same host and port as the page, so the app works when
                // opened from another machine on the network
                let protocol = window.location().protocol().unwrap_or_else(|_| "http:".to_string());
                return format!("{}//{}", protocol, host);
            }
        }
    }

    // Default to 127.0.0.1 for development
    API_BASE_URL.to_string()
}
