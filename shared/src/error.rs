use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum WheelError {
    /// The authority handed us a reward the local tier table doesn't know.
    NoMatchingTier { reward: u32 },
    /// The authority call failed or granted no outcome.
    OutcomeRequestFailure { reason: String },
    InvalidTierTable(String),
    /// A response arrived for a session that was dismissed or replaced.
    SessionDiscarded,
}

impl WheelError {
    pub fn request_failed(reason: impl Into<String>) -> Self {
        Self::OutcomeRequestFailure { reason: reason.into() }
    }
}

impl fmt::Display for WheelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatchingTier { reward } => write!(f, "No wheel tier matches reward {}", reward),
            Self::OutcomeRequestFailure { reason } => write!(f, "Spin outcome request failed: {}", reason),
            Self::InvalidTierTable(reason) => write!(f, "Invalid tier table: {}", reason),
            Self::SessionDiscarded => write!(f, "Spin session was discarded"),
        }
    }
}

impl std::error::Error for WheelError {}
