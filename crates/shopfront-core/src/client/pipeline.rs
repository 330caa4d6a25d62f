use std::sync::Arc;

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{AuthClient, CredentialStore};
use crate::config::ApiConfig;

use super::error::{ApiError, ApiResult};
use super::redirect::{NoopRedirectHandler, RedirectHandler, RedirectReason};

/// Requests under this prefix are never recovered via refresh; a failing
/// refresh call must not trigger another refresh.
const AUTH_PATH_PREFIX: &str = "/api/v1/auth/";

const DEFAULT_USER_AGENT: &str = "shopfront-rs/0.1.0";

/// HTTP client for the storefront backend.
///
/// Every request passes through the same two steps: on the way out the
/// stored access token is attached as a bearer header (or nothing, when no
/// token can be read); on the way back a 401 from a non-auth endpoint
/// triggers a single refresh-token exchange and one resend of the original
/// request. Unrecoverable expiry clears the stored tokens and reports the
/// reason through the injected [`RedirectHandler`].
///
/// Clone is cheap: the reqwest client pools connections behind an Arc, and
/// the store and redirect handler are shared.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    store: Arc<dyn CredentialStore>,
    auth: AuthClient,
    redirect: Arc<dyn RedirectHandler>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, store: Arc<dyn CredentialStore>) -> ApiResult<Self> {
        let http = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(ApiError::Http)?;
        let auth = AuthClient::with_http(http.clone(), config.base_url.clone());
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            store,
            auth,
            redirect: Arc::new(NoopRedirectHandler),
        })
    }

    pub fn with_redirect_handler(mut self, handler: Arc<dyn RedirectHandler>) -> Self {
        self.redirect = handler;
        self
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request_json(Method::GET, path, &[], None).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        self.request_json(Method::GET, path, query, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = serde_json::to_value(body)?;
        self.request_json(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = serde_json::to_value(body)?;
        self.request_json(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request_json(Method::DELETE, path, &[], None).await
    }

    pub async fn delete_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        self.request_json(Method::DELETE, path, query, None).await
    }

    /// POST where the response body is empty or not interesting.
    pub async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        let body = serde_json::to_value(body)?;
        self.execute(Method::POST, path, &[], Some(body)).await?;
        Ok(())
    }

    /// DELETE where the response body is empty or not interesting.
    pub async fn delete_unit(&self, path: &str) -> ApiResult<()> {
        self.execute(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> ApiResult<T> {
        let response = self.execute(method, path, query, body).await?;
        Ok(response.json::<T>().await?)
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> ApiResult<Response> {
        let response = self
            .send(method.clone(), path, query, body.as_ref(), None)
            .await?;
        if response.status() != StatusCode::UNAUTHORIZED || is_auth_path(path) {
            return Self::check(response).await;
        }
        self.refresh_and_retry(method, path, query, body.as_ref(), response)
            .await
    }

    /// Single recovery attempt for a rejected access token. The retried send
    /// below has no recovery branch of its own, so one original request can
    /// never trigger more than one refresh.
    async fn refresh_and_retry(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        original: Response,
    ) -> ApiResult<Response> {
        let Some(refresh_token) = self.store.refresh_token() else {
            debug!(path, "401 with no stored refresh token");
            self.clear_store();
            self.redirect.redirect_to_login(RedirectReason::AuthRequired);
            return Err(Self::status_error(original).await);
        };

        debug!(path, "access token rejected, attempting refresh");
        let tokens = match self.auth.refresh(&refresh_token).await {
            Ok(tokens) => tokens,
            Err(err) => {
                warn!(path, error = %err, "token refresh failed");
                self.clear_store();
                self.redirect
                    .redirect_to_login(RedirectReason::SessionExpired);
                return Err(err.into());
            }
        };

        if let Err(err) = self.store.save(&tokens) {
            warn!(error = %err, "failed to persist refreshed tokens");
        }

        let retry = self
            .send(method, path, query, body, Some(&tokens.access_token))
            .await?;
        Self::check(retry).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        bearer_override: Option<&str>,
    ) -> ApiResult<Response> {
        let url = self.base_url.join(path)?;
        let mut request = self.http.request(method, url);
        // Outbound step: attach the stored token when one is readable and
        // send the request untouched otherwise. Never an error.
        match bearer_override {
            Some(token) => request = request.bearer_auth(token),
            None => {
                if let Some(token) = self.store.access_token() {
                    request = request.bearer_auth(token);
                }
            }
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    fn clear_store(&self) {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear stored credentials");
        }
    }

    async fn check(response: Response) -> ApiResult<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::status_error(response).await)
        }
    }

    async fn status_error(response: Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        ApiError::Status { status, body }
    }
}

fn is_auth_path(path: &str) -> bool {
    path.starts_with(AUTH_PATH_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, AuthTokens, MemoryCredentialStore};
    use httpmock::prelude::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRedirect {
        reasons: Mutex<Vec<RedirectReason>>,
    }

    impl RecordingRedirect {
        fn reasons(&self) -> Vec<RedirectReason> {
            self.reasons.lock().unwrap().clone()
        }
    }

    impl RedirectHandler for RecordingRedirect {
        fn redirect_to_login(&self, reason: RedirectReason) {
            self.reasons.lock().unwrap().push(reason);
        }
    }

    fn client_with(
        base_url: &str,
        store: Arc<dyn CredentialStore>,
        redirect: Arc<RecordingRedirect>,
    ) -> ApiClient {
        let config = ApiConfig::new(Url::parse(base_url).unwrap());
        ApiClient::new(&config, store)
            .unwrap()
            .with_redirect_handler(redirect)
    }

    fn refresh_body(access: &str, refresh: &str) -> serde_json::Value {
        serde_json::json!({
            "user": { "id": "user-1", "email": "ada@example.com", "role": "customer" },
            "access_token": access,
            "refresh_token": refresh
        })
    }

    #[tokio::test]
    async fn attaches_bearer_when_token_present() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/me")
                .header("authorization", "Bearer access-1");
            then.status(200)
                .json_body_obj(&serde_json::json!({ "ok": true }));
        });

        let store = Arc::new(MemoryCredentialStore::with_tokens(AuthTokens::new(
            "access-1",
            "refresh-1",
        )));
        let redirect = Arc::new(RecordingRedirect::default());
        let client = client_with(&server.base_url(), store, redirect.clone());
        let body: Value = client.get("/api/v1/me").await.unwrap();
        mock.assert();
        assert_eq!(body["ok"], true);
        assert!(redirect.reasons().is_empty());
    }

    #[tokio::test]
    async fn omits_header_when_logged_out() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v1/products").matches(|req| {
                req.headers
                    .as_ref()
                    .map(|headers| {
                        headers
                            .iter()
                            .all(|(name, _)| !name.eq_ignore_ascii_case("authorization"))
                    })
                    .unwrap_or(true)
            });
            then.status(200)
                .json_body_obj(&serde_json::json!({ "products": [] }));
        });

        let store = Arc::new(MemoryCredentialStore::new());
        let redirect = Arc::new(RecordingRedirect::default());
        let client = client_with(&server.base_url(), store, redirect);
        let _: Value = client.get("/api/v1/products").await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn refresh_then_retry_hides_the_401() {
        let server = MockServer::start();
        let stale = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/cart")
                .header("authorization", "Bearer stale");
            then.status(401).body("token expired");
        });
        let refresh = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v1/auth/refresh")
                .json_body_obj(&serde_json::json!({ "refresh_token": "refresh-1" }));
            then.status(200)
                .json_body_obj(&refresh_body("fresh", "rotated"));
        });
        let retried = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/cart")
                .header("authorization", "Bearer fresh");
            then.status(200)
                .json_body_obj(&serde_json::json!({ "items": [] }));
        });

        let store = Arc::new(MemoryCredentialStore::with_tokens(AuthTokens::new(
            "stale",
            "refresh-1",
        )));
        let redirect = Arc::new(RecordingRedirect::default());
        let client = client_with(&server.base_url(), store.clone(), redirect.clone());

        let body: Value = client.get("/api/v1/cart").await.unwrap();
        stale.assert();
        refresh.assert();
        retried.assert();
        assert_eq!(body["items"], serde_json::json!([]));
        assert_eq!(
            store.load().unwrap().unwrap(),
            AuthTokens::new("fresh", "rotated")
        );
        assert!(redirect.reasons().is_empty());
    }

    #[tokio::test]
    async fn missing_refresh_token_propagates_original_401() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/orders");
            then.status(401).body("token expired");
        });
        let refresh = server.mock(|when, then| {
            when.method(POST).path("/api/v1/auth/refresh");
            then.status(200).json_body_obj(&refresh_body("x", "y"));
        });

        let store = Arc::new(MemoryCredentialStore::with_tokens(AuthTokens::new(
            "stale", "",
        )));
        let redirect = Arc::new(RecordingRedirect::default());
        let client = client_with(&server.base_url(), store.clone(), redirect.clone());

        let err = client.get::<Value>("/api/v1/orders").await.unwrap_err();
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "token expired");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        refresh.assert_hits(0);
        assert!(store.load().unwrap().is_none());
        assert_eq!(redirect.reasons(), vec![RedirectReason::AuthRequired]);
    }

    #[tokio::test]
    async fn refresh_failure_clears_session_and_propagates_refresh_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/cart");
            then.status(401).body("token expired");
        });
        let refresh = server.mock(|when, then| {
            when.method(POST).path("/api/v1/auth/refresh");
            then.status(401).body("refresh token revoked");
        });

        let store = Arc::new(MemoryCredentialStore::with_tokens(AuthTokens::new(
            "stale",
            "refresh-1",
        )));
        let redirect = Arc::new(RecordingRedirect::default());
        let client = client_with(&server.base_url(), store.clone(), redirect.clone());

        let err = client.get::<Value>("/api/v1/cart").await.unwrap_err();
        refresh.assert();
        match err {
            ApiError::Auth(AuthError::TokenEndpoint { status, body }) => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "refresh token revoked");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.load().unwrap().is_none());
        assert_eq!(redirect.reasons(), vec![RedirectReason::SessionExpired]);
    }

    #[tokio::test]
    async fn auth_endpoints_are_never_refreshed() {
        let server = MockServer::start();
        let login = server.mock(|when, then| {
            when.method(POST).path("/api/v1/auth/login");
            then.status(401).body("invalid credentials");
        });
        let refresh = server.mock(|when, then| {
            when.method(POST).path("/api/v1/auth/refresh");
            then.status(200).json_body_obj(&refresh_body("x", "y"));
        });

        let store = Arc::new(MemoryCredentialStore::with_tokens(AuthTokens::new(
            "stale",
            "refresh-1",
        )));
        let redirect = Arc::new(RecordingRedirect::default());
        let client = client_with(&server.base_url(), store.clone(), redirect.clone());

        let err = client
            .post::<Value, _>(
                "/api/v1/auth/login",
                &serde_json::json!({ "email": "a@b.c", "password": "nope" }),
            )
            .await
            .unwrap_err();
        login.assert();
        refresh.assert_hits(0);
        match err {
            ApiError::Status { status, .. } => assert_eq!(status, StatusCode::UNAUTHORIZED),
            other => panic!("unexpected error: {other:?}"),
        }
        // The stored tokens survive a failed login attempt.
        assert!(store.load().unwrap().is_some());
        assert!(redirect.reasons().is_empty());
    }

    #[tokio::test]
    async fn second_401_after_refresh_propagates_without_another_refresh() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/me")
                .header("authorization", "Bearer stale");
            then.status(401).body("token expired");
        });
        let refresh = server.mock(|when, then| {
            when.method(POST).path("/api/v1/auth/refresh");
            then.status(200)
                .json_body_obj(&refresh_body("fresh", "rotated"));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/me")
                .header("authorization", "Bearer fresh");
            then.status(401).body("still unauthorized");
        });

        let store = Arc::new(MemoryCredentialStore::with_tokens(AuthTokens::new(
            "stale",
            "refresh-1",
        )));
        let redirect = Arc::new(RecordingRedirect::default());
        let client = client_with(&server.base_url(), store.clone(), redirect.clone());

        let err = client.get::<Value>("/api/v1/me").await.unwrap_err();
        refresh.assert_hits(1);
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "still unauthorized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // The refreshed pair was persisted even though the retry failed.
        assert_eq!(
            store.load().unwrap().unwrap(),
            AuthTokens::new("fresh", "rotated")
        );
        assert!(redirect.reasons().is_empty());
    }

    #[tokio::test]
    async fn non_401_failures_pass_through_untouched() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/products/p-1");
            then.status(500)
                .json_body_obj(&serde_json::json!({ "message": "database down" }));
        });
        let refresh = server.mock(|when, then| {
            when.method(POST).path("/api/v1/auth/refresh");
            then.status(200).json_body_obj(&refresh_body("x", "y"));
        });

        let store = Arc::new(MemoryCredentialStore::with_tokens(AuthTokens::new(
            "access-1",
            "refresh-1",
        )));
        let redirect = Arc::new(RecordingRedirect::default());
        let client = client_with(&server.base_url(), store.clone(), redirect.clone());

        let err = client.get::<Value>("/api/v1/products/p-1").await.unwrap_err();
        refresh.assert_hits(0);
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.message("request failed"), "database down");
        assert!(store.load().unwrap().is_some());
        assert!(redirect.reasons().is_empty());
    }
}
