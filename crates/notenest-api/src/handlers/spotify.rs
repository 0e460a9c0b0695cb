//! Spotify OAuth and playback proxy handlers.
//!
//! Tokens live in HTTP-only cookies; the browser never sees them.
//! Every playback endpoint forwards to the Web API with the cookie's
//! bearer token and maps upstream failures through [`AppError`].

use axum::Json;
use axum::extract::{Query, State};
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::Value;
use tracing::{info, warn};

use notenest_core::error::AppError;
use notenest_service::TokenSet;
use notenest_service::spotify::PlayRequest as SpotifyPlayRequest;

use crate::dto::request::{
    DeviceQuery, PageQuery, PlayRequest, RepeatRequest, SeekRequest, ShuffleRequest,
    SpotifyCallbackQuery, TransferRequest, VolumeRequest,
};
use crate::dto::response::{ApiResponse, MessageResponse, TokenRefreshResponse};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::extractors::spotify::{
    ACCESS_COOKIE, EXPIRY_COOKIE, REFRESH_COOKIE, STATE_COOKIE, SpotifyToken,
};
use crate::state::AppState;

const STATE_LENGTH: usize = 16;
/// Upper bound on the lifetime recorded in the expiry cookie.
const MAX_TOKEN_LIFETIME_SECS: i64 = 86_400;

/// GET /api/spotify/login
pub async fn login(State(state): State<AppState>, jar: CookieJar) -> ApiResult<(CookieJar, Redirect)> {
    let auth_state: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LENGTH)
        .map(char::from)
        .collect();
    let url = state.spotify.authorize_url(&auth_state)?;

    let jar = jar.add(auth_cookie(&state, STATE_COOKIE, auth_state));
    Ok((jar, Redirect::to(&url)))
}

/// GET /api/spotify/callback
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<SpotifyCallbackQuery>,
) -> ApiResult<(CookieJar, Redirect)> {
    if let Some(error) = query.error {
        warn!(error = %error, "Spotify authorization declined");
        return Err(AppError::unauthorized(format!("Spotify authorization failed: {error}")).into());
    }

    let expected = jar.get(STATE_COOKIE).map(|c| c.value().to_string());
    match (expected.as_deref(), query.state.as_deref()) {
        (Some(expected), Some(received)) if !expected.is_empty() && expected == received => {}
        _ => return Err(AppError::unauthorized("OAuth state mismatch").into()),
    }
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::validation("Missing authorization code"))?;

    let tokens = state.spotify.exchange_code(&code).await?;
    let jar = store_tokens(&state, jar.remove(removal(STATE_COOKIE)), &tokens);

    info!("Spotify account connected");
    Ok((jar, Redirect::to(state.spotify.post_login_redirect())))
}

/// POST /api/spotify/refresh
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<ApiResponse<TokenRefreshResponse>>)> {
    let refresh_token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("No Spotify refresh token"))?;

    let tokens = state.spotify.refresh_token(&refresh_token).await?;
    let expires_at = expiry_of(&tokens);
    let jar = store_tokens(&state, jar, &tokens);

    Ok((
        jar,
        Json(ApiResponse::ok(TokenRefreshResponse {
            expires_in: tokens.expires_in,
            expires_at,
        })),
    ))
}

/// POST /api/spotify/logout
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<MessageResponse>>) {
    let jar = jar
        .remove(removal(ACCESS_COOKIE))
        .remove(removal(REFRESH_COOKIE))
        .remove(removal(EXPIRY_COOKIE));
    (
        jar,
        Json(ApiResponse::ok(MessageResponse::new("Disconnected from Spotify"))),
    )
}

/// GET /api/spotify/player
///
/// `data` is null when nothing is playing.
pub async fn player(
    State(state): State<AppState>,
    token: SpotifyToken,
) -> ApiResult<Json<ApiResponse<Option<Value>>>> {
    let playback = state.spotify.player_state(token.as_str()).await?;
    Ok(Json(ApiResponse::ok(playback)))
}

/// GET /api/spotify/devices
pub async fn devices(
    State(state): State<AppState>,
    token: SpotifyToken,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let devices = state.spotify.devices(token.as_str()).await?;
    Ok(Json(ApiResponse::ok(devices)))
}

/// PUT /api/spotify/play
pub async fn play(
    State(state): State<AppState>,
    token: SpotifyToken,
    ValidatedJson(req): ValidatedJson<PlayRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let body = SpotifyPlayRequest {
        context_uri: req.context_uri,
        uris: req.uris,
        position_ms: req.position_ms,
    };
    state
        .spotify
        .play(token.as_str(), req.device_id.as_deref(), &body)
        .await?;
    Ok(done("Playback started"))
}

/// PUT /api/spotify/pause
pub async fn pause(
    State(state): State<AppState>,
    token: SpotifyToken,
    Query(query): Query<DeviceQuery>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .spotify
        .pause(token.as_str(), query.device_id.as_deref())
        .await?;
    Ok(done("Playback paused"))
}

/// POST /api/spotify/next
pub async fn next(
    State(state): State<AppState>,
    token: SpotifyToken,
    Query(query): Query<DeviceQuery>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .spotify
        .next(token.as_str(), query.device_id.as_deref())
        .await?;
    Ok(done("Skipped to next track"))
}

/// POST /api/spotify/previous
pub async fn previous(
    State(state): State<AppState>,
    token: SpotifyToken,
    Query(query): Query<DeviceQuery>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .spotify
        .previous(token.as_str(), query.device_id.as_deref())
        .await?;
    Ok(done("Skipped to previous track"))
}

/// PUT /api/spotify/seek
pub async fn seek(
    State(state): State<AppState>,
    token: SpotifyToken,
    ValidatedJson(req): ValidatedJson<SeekRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .spotify
        .seek(token.as_str(), req.position_ms, req.device_id.as_deref())
        .await?;
    Ok(done("Seeked"))
}

/// PUT /api/spotify/volume
pub async fn volume(
    State(state): State<AppState>,
    token: SpotifyToken,
    ValidatedJson(req): ValidatedJson<VolumeRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .spotify
        .set_volume(token.as_str(), req.volume_percent, req.device_id.as_deref())
        .await?;
    Ok(done("Volume set"))
}

/// PUT /api/spotify/shuffle
pub async fn shuffle(
    State(state): State<AppState>,
    token: SpotifyToken,
    ValidatedJson(req): ValidatedJson<ShuffleRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .spotify
        .set_shuffle(token.as_str(), req.state, req.device_id.as_deref())
        .await?;
    Ok(done("Shuffle updated"))
}

/// PUT /api/spotify/repeat
pub async fn repeat(
    State(state): State<AppState>,
    token: SpotifyToken,
    ValidatedJson(req): ValidatedJson<RepeatRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .spotify
        .set_repeat(token.as_str(), req.state, req.device_id.as_deref())
        .await?;
    Ok(done("Repeat mode updated"))
}

/// PUT /api/spotify/transfer
pub async fn transfer(
    State(state): State<AppState>,
    token: SpotifyToken,
    ValidatedJson(req): ValidatedJson<TransferRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .spotify
        .transfer(token.as_str(), &req.device_id, req.play)
        .await?;
    Ok(done("Playback transferred"))
}

/// GET /api/spotify/playlists
pub async fn playlists(
    State(state): State<AppState>,
    token: SpotifyToken,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let list = state
        .spotify
        .playlists(token.as_str(), page.limit, page.offset)
        .await?;
    Ok(Json(ApiResponse::ok(list)))
}

/// GET /api/spotify/liked-tracks
pub async fn liked_tracks(
    State(state): State<AppState>,
    token: SpotifyToken,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let tracks = state
        .spotify
        .liked_tracks(token.as_str(), page.limit, page.offset)
        .await?;
    Ok(Json(ApiResponse::ok(tracks)))
}

fn done(message: &str) -> Json<ApiResponse<MessageResponse>> {
    Json(ApiResponse::ok(MessageResponse::new(message)))
}

fn expiry_of(tokens: &TokenSet) -> chrono::DateTime<Utc> {
    let secs = i64::try_from(tokens.expires_in)
        .unwrap_or(MAX_TOKEN_LIFETIME_SECS)
        .min(MAX_TOKEN_LIFETIME_SECS);
    Utc::now() + Duration::seconds(secs)
}

/// Writes the access token and expiry, plus the refresh token when one was issued.
fn store_tokens(state: &AppState, jar: CookieJar, tokens: &TokenSet) -> CookieJar {
    let expires_at = expiry_of(tokens);
    let mut jar = jar
        .add(auth_cookie(state, ACCESS_COOKIE, tokens.access_token.clone()))
        .add(auth_cookie(
            state,
            EXPIRY_COOKIE,
            expires_at.timestamp_millis().to_string(),
        ));
    if let Some(refresh) = tokens.refresh_token.as_ref().filter(|t| !t.is_empty()) {
        jar = jar.add(auth_cookie(state, REFRESH_COOKIE, refresh.clone()));
    }
    jar
}

fn auth_cookie(state: &AppState, name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.spotify.secure_cookies())
        .build()
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_of() {
        let tokens = TokenSet {
            access_token: "a".into(),
            refresh_token: None,
            expires_in: 3600,
            scope: None,
        };
        let delta = expiry_of(&tokens) - Utc::now();
        assert!((3598..=3600).contains(&delta.num_seconds()));
    }

    #[test]
    fn test_removal_cookie_matches_path() {
        let cookie = removal(ACCESS_COOKIE);
        assert_eq!(cookie.name(), ACCESS_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
    }
}
