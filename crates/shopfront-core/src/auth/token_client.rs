use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ApiConfig;

use super::{AuthError, AuthTokens};

pub const LOGIN_ENDPOINT: &str = "/api/v1/auth/login";
pub const REGISTER_ENDPOINT: &str = "/api/v1/auth/register";
pub const REFRESH_ENDPOINT: &str = "/api/v1/auth/refresh";

const DEFAULT_USER_AGENT: &str = "shopfront-rs/0.1.0";

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountProfile {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// The user identity the auth endpoints return alongside the token pair.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSummary {
    pub id: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub profile: Option<AccountProfile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: AccountSummary,
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthResponse {
    pub fn tokens(&self) -> AuthTokens {
        AuthTokens::new(self.access_token.clone(), self.refresh_token.clone())
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Refresh responses carry extra fields the client does not depend on; only
/// the new token pair is extracted.
#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
    refresh_token: String,
}

/// Client for the `/api/v1/auth` endpoints.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: Client,
    base_url: Url,
}

impl AuthClient {
    pub fn new(config: &ApiConfig) -> Result<Self, AuthError> {
        let http = Client::builder().user_agent(DEFAULT_USER_AGENT).build()?;
        Ok(Self::with_http(http, config.base_url.clone()))
    }

    /// Build a client over an existing connection pool. The request pipeline
    /// uses this so the refresh call shares its `reqwest::Client`.
    pub fn with_http(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AuthError> {
        let response = self
            .http
            .post(self.endpoint(LOGIN_ENDPOINT)?)
            .json(request)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AuthError> {
        let response = self
            .http
            .post(self.endpoint(REGISTER_ENDPOINT)?)
            .json(request)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Exchange a refresh token for a new access/refresh pair. Any non-2xx
    /// response counts as refresh failure.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        if refresh_token.is_empty() {
            return Err(AuthError::RefreshUnavailable);
        }
        let response = self
            .http
            .post(self.endpoint(REFRESH_ENDPOINT)?)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenEndpoint { status, body });
        }
        let payload: RefreshResponse = response.json().await?;
        Ok(AuthTokens::new(payload.access_token, payload.refresh_token))
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        Ok(self.base_url.join(path)?)
    }

    async fn handle_response(response: reqwest::Response) -> Result<AuthResponse, AuthError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenEndpoint { status, body });
        }
        Ok(response.json().await?)
    }
}
