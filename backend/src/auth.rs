use std::fmt;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;

const MAX_TOKEN_LEN: usize = 128;

/// Player key taken from `Authorization: Bearer <token>`. The cooldown is
/// tracked per key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerId(pub String);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

#[async_trait]
impl<S> FromRequestParts<S> for PlayerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(AppError::Unauthorized)?;

        if token.is_empty() || token.len() > MAX_TOKEN_LEN || !token.chars().all(is_token_char) {
            return Err(AppError::Unauthorized);
        }

        Ok(PlayerId(token.to_string()))
    }
}
