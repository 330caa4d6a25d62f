mod credential_store;
mod error;
mod manager;
mod session;
mod token_client;

pub use credential_store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use error::AuthError;
pub use manager::AuthManager;
pub use session::AuthTokens;
pub use token_client::{
    AccountProfile, AccountSummary, AuthClient, AuthResponse, LoginRequest, RegisterRequest,
    LOGIN_ENDPOINT, REFRESH_ENDPOINT, REGISTER_ENDPOINT,
};
