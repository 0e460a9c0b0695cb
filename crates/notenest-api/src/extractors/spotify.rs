//! `SpotifyToken` extractor: the bearer token held in the auth cookies.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;

use notenest_core::error::AppError;

use crate::error::ApiError;

/// Access token cookie.
pub const ACCESS_COOKIE: &str = "spotify_access_token";
/// Refresh token cookie.
pub const REFRESH_COOKIE: &str = "spotify_refresh_token";
/// Access token expiry, in Unix milliseconds.
pub const EXPIRY_COOKIE: &str = "spotify_token_expiry";
/// OAuth anti-forgery state, set by `/login` and checked by `/callback`.
pub const STATE_COOKIE: &str = "spotify_auth_state";

/// A Spotify access token taken from the request cookies.
#[derive(Debug, Clone)]
pub struct SpotifyToken(pub String);

impl SpotifyToken {
    /// The raw bearer token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for SpotifyToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(ACCESS_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized("Not authenticated with Spotify"))?;

        let expired = jar
            .get(EXPIRY_COOKIE)
            .and_then(|c| c.value().parse::<i64>().ok())
            .is_some_and(|expiry_ms| expiry_ms <= Utc::now().timestamp_millis());
        if expired {
            return Err(AppError::unauthorized("Spotify access token expired").into());
        }

        Ok(Self(token))
    }
}
