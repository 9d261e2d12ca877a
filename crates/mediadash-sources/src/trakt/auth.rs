use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SourceError;
use crate::fetcher::DEFAULT_TIMEOUT;

const SOURCE: &str = "trakt";

/// Create a reqwest Client with browser-like headers to bypass Cloudflare
pub fn create_trakt_client() -> Client {
    Client::builder()
        .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Response of `POST /oauth/device/code`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceCode {
    pub device_code: String,
    pub user_code: String,
    pub verification_url: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub interval: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Start the device-code flow. The caller shows `user_code` and
/// `verification_url` to the user.
pub async fn request_device_code(
    client: &Client,
    base_url: &str,
    client_id: &str,
) -> Result<DeviceCode, SourceError> {
    let payload = serde_json::json!({ "client_id": client_id });

    let response = client
        .post(format!("{}/oauth/device/code", base_url))
        .json(&payload)
        .header("Content-Type", "application/json")
        .send()
        .await
        .map_err(SourceError::http(SOURCE))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(SourceError::Auth {
            source_name: SOURCE,
            message: format!("Failed to get device code: {} - {}", status, error_text),
        });
    }

    response
        .json()
        .await
        .map_err(|e| SourceError::decode(SOURCE, e))
}

/// Exchange a device code for tokens. Makes exactly one attempt: a pending
/// authorization (400) is reported as an error like any other non-200.
pub async fn exchange_device_code(
    client: &Client,
    base_url: &str,
    client_id: &str,
    client_secret: &str,
    device_code: &str,
) -> Result<TokenInfo, SourceError> {
    let payload = serde_json::json!({
        "code": device_code,
        "client_id": client_id,
        "client_secret": client_secret,
    });

    let response = client
        .post(format!("{}/oauth/device/token", base_url))
        .json(&payload)
        .header("Content-Type", "application/json")
        .send()
        .await
        .map_err(SourceError::http(SOURCE))?;

    if response.status() != reqwest::StatusCode::OK {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(SourceError::Auth {
            source_name: SOURCE,
            message: format!("Failed to get access token: {} - {}", status, error_text),
        });
    }

    let token_response: TokenResponse = response
        .json()
        .await
        .map_err(|e| SourceError::decode(SOURCE, e))?;
    let expires_at = Utc::now() + Duration::seconds(token_response.expires_in as i64 - 120);

    info!("Obtained Trakt access token (expires at {})", expires_at);
    Ok(TokenInfo {
        access_token: token_response.access_token,
        refresh_token: token_response.refresh_token,
        expires_at,
    })
}
