use crate::config::Config;
use crate::error::{auth_error, AppResult};
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// OAuth scope required for inserting events
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

/// Google OAuth token endpoint
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// What to do with a token found in the cache file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CachedToken {
    Valid,
    Refresh,
    Reauthorize,
}

/// Decide whether a cached token is usable as-is, refreshable, or spent
///
/// A token is refreshable only when it is expired and still carries a
/// refresh token; anything without a usable expiry forces reauthorization.
fn classify_cached_token(token: &Value, now: i64) -> CachedToken {
    match token.get("expires_at").and_then(|v| v.as_i64()) {
        Some(expiry) if expiry > now => CachedToken::Valid,
        Some(_) if token.get("refresh_token").and_then(|v| v.as_str()).is_some() => {
            CachedToken::Refresh
        }
        _ => CachedToken::Reauthorize,
    }
}

/// Extract one query parameter from the raw callback URL
fn callback_param<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    let marker = format!("{}=", key);
    url.split(marker.as_str())
        .nth(1)
        .and_then(|s| s.split('&').next())
}

/// Manages the cached OAuth token, refreshing or reauthorizing as needed
#[derive(Clone)]
pub struct TokenManager {
    config: Arc<RwLock<Config>>,
    token_path: PathBuf,
    client: Client,
}

impl TokenManager {
    pub fn new(config: Arc<RwLock<Config>>, token_path: impl AsRef<Path>) -> Self {
        Self {
            config,
            token_path: token_path.as_ref().to_path_buf(),
            client: Client::new(),
        }
    }

    /// Get a valid OAuth token, either from the cache file or by acquiring a new one
    ///
    /// An unexpired cached token is returned as-is. An expired token with a
    /// refresh token is refreshed; anything else falls back to the interactive
    /// authorization flow. The cache file is rewritten after every successful
    /// acquisition.
    pub async fn get_token(&self) -> AppResult<Value> {
        if self.token_path.exists() {
            let token_str = std::fs::read_to_string(&self.token_path)?;
            let token: Value = serde_json::from_str(&token_str)
                .map_err(|e| auth_error(&format!("Failed to parse cached token: {}", e)))?;

            match classify_cached_token(&token, Utc::now().timestamp()) {
                CachedToken::Valid => return Ok(token),
                CachedToken::Refresh => return self.refresh_token(&token).await,
                CachedToken::Reauthorize => {
                    warn!("Cached token is unusable, reauthorizing");
                }
            }
        }

        self.authorize().await
    }

    /// Refresh an expired token
    async fn refresh_token(&self, token: &Value) -> AppResult<Value> {
        let refresh_token = token
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| auth_error("No refresh token in token data"))?;

        let (client_id, client_secret) = {
            let config_read = self.config.read().await;
            (
                config_read.google_client_id.clone(),
                config_read.google_client_secret.clone(),
            )
        };

        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token.to_string()),
            ("grant_type", "refresh_token".to_string()),
        ];

        let response = self
            .client
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| auth_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(auth_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let new_token: Value = response
            .json()
            .await
            .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))?;

        let access_token = new_token
            .get("access_token")
            .cloned()
            .ok_or_else(|| auth_error("Token response missing 'access_token' field"))?;

        // Combine new access token with the existing refresh token
        let mut token_data = serde_json::Map::new();
        token_data.insert("access_token".to_string(), access_token);
        token_data.insert("refresh_token".to_string(), json!(refresh_token));

        let expires_in = new_token
            .get("expires_in")
            .and_then(|v| v.as_i64())
            .unwrap_or(3600);
        token_data.insert(
            "expires_at".to_string(),
            json!(Utc::now().timestamp() + expires_in),
        );

        let token_json = json!(token_data);
        self.save_token(&token_json)?;

        info!("Refreshed OAuth token");
        Ok(token_json)
    }

    /// Run the interactive browser authorization flow
    ///
    /// Opens the consent page in the system browser and waits for the OAuth
    /// redirect on a one-shot local HTTP listener.
    async fn authorize(&self) -> AppResult<Value> {
        let (client_id, client_secret, port) = {
            let config_read = self.config.read().await;
            (
                config_read.google_client_id.clone(),
                config_read.google_client_secret.clone(),
                config_read.oauth_redirect_port,
            )
        };

        let redirect_uri = format!("http://localhost:{}", port);

        // Random state for security
        let state = uuid::Uuid::new_v4().to_string();

        let auth_url = format!(
            "https://accounts.google.com/o/oauth2/v2/auth?\
            client_id={}&\
            redirect_uri={}&\
            response_type=code&\
            access_type=offline&\
            prompt=consent&\
            scope={}&\
            state={}",
            client_id, redirect_uri, CALENDAR_SCOPE, state
        );

        info!("Opening browser for Google Calendar authorization");
        webbrowser::open(&auth_url)?;

        // Start local server to receive the callback
        let server = tiny_http::Server::http(("0.0.0.0", port))
            .map_err(|e| auth_error(&format!("Failed to start callback listener: {}", e)))?;
        info!("Waiting for authorization callback on port {}", port);

        let request = server.recv()?;
        let url = request.url().to_string();

        // The callback must echo the state we sent on the consent URL
        if callback_param(&url, "state") != Some(state.as_str()) {
            return Err(auth_error("State mismatch in authorization callback"));
        }

        let code = callback_param(&url, "code")
            .ok_or_else(|| auth_error("No authorization code found in callback"))?
            .to_string();

        // Exchange the code for tokens
        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code".to_string()),
            ])
            .send()
            .await
            .map_err(|e| auth_error(&format!("Failed to exchange code: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(auth_error(&format!("Failed to get token: {}", error_text)));
        }

        let mut token_data: Value = response
            .json()
            .await
            .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))?;

        // Stamp the expiry
        let expires_in = token_data
            .get("expires_in")
            .and_then(|v| v.as_i64())
            .unwrap_or(3600);
        let expires_at = Utc::now().timestamp() + expires_in;

        match token_data.as_object_mut() {
            Some(obj) => {
                obj.insert("expires_at".to_string(), json!(expires_at));
            }
            None => return Err(auth_error("Token data is not an object")),
        }

        self.save_token(&token_data)?;

        let response =
            tiny_http::Response::from_string("Authorization successful! You can close this window.");
        request.respond(response)?;

        info!("Token saved to {}", self.token_path.display());
        Ok(token_data)
    }

    /// Persist the token to the cache file for the next run
    fn save_token(&self, token: &Value) -> AppResult<()> {
        std::fs::write(&self.token_path, token.to_string())?;
        Ok(())
    }
}
