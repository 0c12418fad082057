use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use shared::reward_wheel::WHEEL_SPIN_COOLDOWN_SECS;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const MAX_SPIN_COOLDOWN_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub spin_cooldown: Duration,
    pub allowed_origin: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    InvalidBindAddr(String),
    InvalidCooldown(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBindAddr(value) => write!(f, "BIND_ADDR is not a socket address: {}", value),
            Self::InvalidCooldown(value) => write!(f, "WHEEL_SPIN_COOLDOWN_SECS must be between 1 and {} seconds: {}", MAX_SPIN_COOLDOWN_SECS, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_raw.clone()))?;

        let spin_cooldown = match lookup("WHEEL_SPIN_COOLDOWN_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if (1..=MAX_SPIN_COOLDOWN_SECS).contains(&secs) => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidCooldown(raw)),
            },
            None => Duration::from_secs(WHEEL_SPIN_COOLDOWN_SECS),
        };

        let allowed_origin = lookup("WHEEL_ALLOWED_ORIGIN")
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty());

        Ok(Self {
            bind_addr,
            spin_cooldown,
            allowed_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.spin_cooldown, Duration::from_secs(82800));
        assert_eq!(config.allowed_origin, None);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("WHEEL_SPIN_COOLDOWN_SECS", "30"),
            ("WHEEL_ALLOWED_ORIGIN", "http://localhost:8081"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.spin_cooldown, Duration::from_secs(30));
        assert_eq!(config.allowed_origin.as_deref(), Some("http://localhost:8081"));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            AppConfig::from_lookup(lookup_from(&[("BIND_ADDR", "nowhere")])).unwrap_err(),
            ConfigError::InvalidBindAddr("nowhere".to_string())
        );
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[("WHEEL_SPIN_COOLDOWN_SECS", "0")])),
            Err(ConfigError::InvalidCooldown(_))
        ));
        assert!(AppConfig::from_lookup(lookup_from(&[("WHEEL_SPIN_COOLDOWN_SECS", "soon")])).is_err());
    }

    #[test]
    fn test_cooldown_upper_bound() {
        let config = AppConfig::from_lookup(lookup_from(&[("WHEEL_SPIN_COOLDOWN_SECS", "2592000")])).unwrap();
        assert_eq!(config.spin_cooldown, Duration::from_secs(30 * 24 * 60 * 60));

        assert_eq!(
            AppConfig::from_lookup(lookup_from(&[("WHEEL_SPIN_COOLDOWN_SECS", "2592001")])).unwrap_err(),
            ConfigError::InvalidCooldown("2592001".to_string())
        );
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[("WHEEL_SPIN_COOLDOWN_SECS", "18446744073709551615")])),
            Err(ConfigError::InvalidCooldown(_))
        ));
    }
}
