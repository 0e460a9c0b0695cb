//! HTTP client for the Spotify accounts service and Web API.

use std::time::Duration;

use reqwest::header::{CONTENT_LENGTH, RETRY_AFTER};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use notenest_core::config::SpotifyConfig;
use notenest_core::error::{AppError, ErrorKind};
use notenest_core::result::AppResult;

use super::types::{PlayRequest, RepeatMode, TokenSet};

/// Thin wrapper over the Spotify REST endpoints the playback panel uses.
///
/// Calls carry no retry logic; each request is bounded by the configured
/// timeout.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: reqwest::Client,
    config: SpotifyConfig,
}

impl SpotifyClient {
    /// Builds a client with the configured request timeout.
    pub fn new(config: SpotifyConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build Spotify HTTP client",
                    e,
                )
            })?;
        Ok(Self { http, config })
    }

    /// Whether client credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.config.client_id.is_empty() && !self.config.client_secret.is_empty()
    }

    /// Where to send the browser after the OAuth callback.
    pub fn post_login_redirect(&self) -> &str {
        &self.config.post_login_redirect
    }

    /// Whether auth cookies should be marked `Secure`.
    pub fn secure_cookies(&self) -> bool {
        self.config.secure_cookies
    }

    /// The accounts-service authorize URL for the code flow.
    pub fn authorize_url(&self, state: &str) -> AppResult<String> {
        self.require_credentials()?;
        let scopes = self.config.scopes.join(" ");
        let url = Url::parse_with_params(
            &format!("{}/authorize", self.config.accounts_base.trim_end_matches('/')),
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", scopes.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid Spotify accounts URL", e)
        })?;
        Ok(url.into())
    }

    /// Exchanges an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> AppResult<TokenSet> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ])
        .await
    }

    /// Trades a refresh token for a new access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<TokenSet> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    /// Current playback state, or `None` when nothing is playing.
    pub async fn player_state(&self, token: &str) -> AppResult<Option<Value>> {
        self.send(Method::GET, "/me/player", token, &[], None).await
    }

    /// Available playback devices.
    pub async fn devices(&self, token: &str) -> AppResult<Value> {
        self.send_expect(Method::GET, "/me/player/devices", token, &[])
            .await
    }

    /// Starts or resumes playback.
    pub async fn play(
        &self,
        token: &str,
        device_id: Option<&str>,
        request: &PlayRequest,
    ) -> AppResult<()> {
        let body = serde_json::to_value(request)?;
        self.send(
            Method::PUT,
            "/me/player/play",
            token,
            &device_query(device_id),
            Some(body),
        )
        .await
        .map(drop)
    }

    /// Pauses playback.
    pub async fn pause(&self, token: &str, device_id: Option<&str>) -> AppResult<()> {
        self.command(Method::PUT, "/me/player/pause", token, device_query(device_id))
            .await
    }

    /// Skips to the next track.
    pub async fn next(&self, token: &str, device_id: Option<&str>) -> AppResult<()> {
        self.command(Method::POST, "/me/player/next", token, device_query(device_id))
            .await
    }

    /// Skips to the previous track.
    pub async fn previous(&self, token: &str, device_id: Option<&str>) -> AppResult<()> {
        self.command(Method::POST, "/me/player/previous", token, device_query(device_id))
            .await
    }

    /// Seeks within the current track.
    pub async fn seek(&self, token: &str, position_ms: u64, device_id: Option<&str>) -> AppResult<()> {
        let mut query = device_query(device_id);
        query.push(("position_ms", position_ms.to_string()));
        self.command(Method::PUT, "/me/player/seek", token, query).await
    }

    /// Sets the volume (0 to 100).
    pub async fn set_volume(
        &self,
        token: &str,
        volume_percent: u8,
        device_id: Option<&str>,
    ) -> AppResult<()> {
        if volume_percent > 100 {
            return Err(AppError::validation("Volume must be between 0 and 100"));
        }
        let mut query = device_query(device_id);
        query.push(("volume_percent", volume_percent.to_string()));
        self.command(Method::PUT, "/me/player/volume", token, query).await
    }

    /// Turns shuffle on or off.
    pub async fn set_shuffle(&self, token: &str, state: bool, device_id: Option<&str>) -> AppResult<()> {
        let mut query = device_query(device_id);
        query.push(("state", state.to_string()));
        self.command(Method::PUT, "/me/player/shuffle", token, query).await
    }

    /// Sets the repeat mode.
    pub async fn set_repeat(
        &self,
        token: &str,
        mode: RepeatMode,
        device_id: Option<&str>,
    ) -> AppResult<()> {
        let mut query = device_query(device_id);
        query.push(("state", mode.as_str().to_string()));
        self.command(Method::PUT, "/me/player/repeat", token, query).await
    }

    /// Moves playback to another device.
    pub async fn transfer(&self, token: &str, device_id: &str, play: bool) -> AppResult<()> {
        let body = serde_json::json!({ "device_ids": [device_id], "play": play });
        self.send(Method::PUT, "/me/player", token, &[], Some(body))
            .await
            .map(drop)
    }

    /// The user's playlists.
    pub async fn playlists(&self, token: &str, limit: u32, offset: u32) -> AppResult<Value> {
        self.send_expect(Method::GET, "/me/playlists", token, &page_query(limit, offset))
            .await
    }

    /// The user's saved tracks.
    pub async fn liked_tracks(&self, token: &str, limit: u32, offset: u32) -> AppResult<Value> {
        self.send_expect(Method::GET, "/me/tracks", token, &page_query(limit, offset))
            .await
    }

    fn require_credentials(&self) -> AppResult<()> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(AppError::service_unavailable(
                "Spotify integration is not configured",
            ))
        }
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> AppResult<TokenSet> {
        self.require_credentials()?;
        let url = format!("{}/api/token", self.config.accounts_base.trim_end_matches('/'));
        let response = self
            .http
            .post(url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Spotify token request rejected");
            return Err(token_error(status, &body));
        }

        response.json::<TokenSet>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Malformed Spotify token response",
                e,
            )
        })
    }

    async fn command(
        &self,
        method: Method,
        path: &str,
        token: &str,
        query: Vec<(&'static str, String)>,
    ) -> AppResult<()> {
        let request = self.request(method, path, token, &query).header(CONTENT_LENGTH, 0);
        self.execute(request, path).await.map(drop)
    }

    async fn send_expect(
        &self,
        method: Method,
        path: &str,
        token: &str,
        query: &[(&'static str, String)],
    ) -> AppResult<Value> {
        self.send(method, path, token, query, None)
            .await?
            .ok_or_else(|| AppError::external_service(format!("Empty Spotify response from {path}")))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        token: &str,
        query: &[(&'static str, String)],
        body: Option<Value>,
    ) -> AppResult<Option<Value>> {
        let mut request = self.request(method, path, token, query);
        if let Some(body) = body {
            request = request.json(&body);
        }
        self.execute(request, path).await
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        token: &str,
        query: &[(&'static str, String)],
    ) -> RequestBuilder {
        let url = format!("{}{path}", self.config.api_base.trim_end_matches('/'));
        let mut request = self.http.request(method, url).bearer_auth(token);
        if !query.is_empty() {
            request = request.query(query);
        }
        request
    }

    async fn execute(&self, request: RequestBuilder, path: &str) -> AppResult<Option<Value>> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        debug!(path, %status, "Spotify API call");

        if !status.is_success() {
            return Err(api_error(response).await);
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        if bytes.is_empty() {
            return Ok(None);
        }
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            // Some command endpoints answer 200 with a non-JSON body.
            Err(_) if path.starts_with("/me/player/") => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::ExternalService,
                format!("Malformed Spotify response from {path}"),
                e,
            )),
        }
    }
}

fn device_query(device_id: Option<&str>) -> Vec<(&'static str, String)> {
    device_id
        .map(|id| vec![("device_id", id.to_string())])
        .unwrap_or_default()
}

fn page_query(limit: u32, offset: u32) -> Vec<(&'static str, String)> {
    vec![
        ("limit", limit.clamp(1, 50).to_string()),
        ("offset", offset.to_string()),
    ]
}

fn transport_error(e: reqwest::Error) -> AppError {
    let message = if e.is_timeout() {
        "Spotify request timed out"
    } else {
        "Spotify request failed"
    };
    AppError::with_source(ErrorKind::ExternalService, message, e)
}

async fn api_error(response: Response) -> AppError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

    map_status(status, &detail, retry_after.as_deref())
}

/// Translates a Web API failure into an application error.
fn map_status(status: StatusCode, detail: &str, retry_after: Option<&str>) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED => {
            AppError::unauthorized("Spotify access token expired or invalid")
        }
        StatusCode::NOT_FOUND => AppError::not_found(format!("Spotify: {detail}")),
        StatusCode::TOO_MANY_REQUESTS => AppError::rate_limit(match retry_after {
            Some(secs) => format!("Spotify rate limit hit, retry after {secs}s"),
            None => "Spotify rate limit hit".to_string(),
        }),
        _ => AppError::external_service(format!("Spotify API error {}: {detail}", status.as_u16())),
    }
}

fn token_error(status: StatusCode, body: &str) -> AppError {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let code = parsed
        .as_ref()
        .and_then(|v| v["error"].as_str())
        .unwrap_or_default();
    let description = parsed
        .as_ref()
        .and_then(|v| v["error_description"].as_str())
        .unwrap_or("token request failed");

    if status == StatusCode::BAD_REQUEST && code == "invalid_grant" {
        AppError::unauthorized(format!("Spotify authorization rejected: {description}"))
    } else {
        AppError::external_service(format!(
            "Spotify token endpoint error {}: {description}",
            status.as_u16()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> SpotifyClient {
        SpotifyClient::new(SpotifyConfig {
            client_id: "cid".into(),
            client_secret: "secret".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_authorize_url() {
        let url = configured().authorize_url("xyz").unwrap();
        let parsed = Url::parse(&url).unwrap();
        assert_eq!(parsed.path(), "/authorize");

        let params: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();
        assert_eq!(params["client_id"], "cid");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["state"], "xyz");
        assert!(params["scope"].contains("user-modify-playback-state"));
    }

    #[test]
    fn test_unconfigured_client() {
        let client = SpotifyClient::new(SpotifyConfig::default()).unwrap();
        assert!(!client.is_configured());
        let err = client.authorize_url("s").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            map_status(StatusCode::UNAUTHORIZED, "x", None).kind,
            ErrorKind::Unauthorized
        );
        assert_eq!(
            map_status(StatusCode::NOT_FOUND, "Player command failed: No active device found", None)
                .kind,
            ErrorKind::NotFound
        );
        let limited = map_status(StatusCode::TOO_MANY_REQUESTS, "x", Some("3"));
        assert_eq!(limited.kind, ErrorKind::RateLimit);
        assert!(limited.message.contains('3'));
        assert_eq!(
            map_status(StatusCode::FORBIDDEN, "Premium required", None).kind,
            ErrorKind::ExternalService
        );
    }

    #[test]
    fn test_token_error_mapping() {
        let err = token_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"Refresh token revoked"}"#,
        );
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert!(err.message.contains("revoked"));

        let err = token_error(StatusCode::INTERNAL_SERVER_ERROR, "oops");
        assert_eq!(err.kind, ErrorKind::ExternalService);
    }

    #[test]
    fn test_page_query_clamps_limit() {
        assert_eq!(page_query(500, 10)[0].1, "50");
        assert_eq!(page_query(0, 0)[0].1, "1");
    }
}
