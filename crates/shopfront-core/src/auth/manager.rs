use std::sync::Arc;

use super::{
    AccountSummary, AuthClient, AuthError, CredentialStore, LoginRequest, RegisterRequest,
};

/// Coordinates the auth endpoints with token persistence.
pub struct AuthManager {
    store: Arc<dyn CredentialStore>,
    client: AuthClient,
}

impl AuthManager {
    pub fn new(store: Arc<dyn CredentialStore>, client: AuthClient) -> Self {
        Self { store, client }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AccountSummary, AuthError> {
        let response = self.client.login(request).await?;
        self.store.save(&response.tokens())?;
        Ok(response.user)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AccountSummary, AuthError> {
        let response = self.client.register(request).await?;
        self.store.save(&response.tokens())?;
        Ok(response.user)
    }

    /// Forget the stored token pair. The backend holds no client session
    /// state, so logout is purely local.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.clear()
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.has_access_token()
    }
}
