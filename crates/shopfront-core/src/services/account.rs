use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ApiResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub profile: Option<Profile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAddress {
    pub id: String,
    pub user_id: String,
    pub label: String,
    pub address: Address,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAddress {
    pub label: String,
    pub address: Address,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: String,
    pub product_id: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct AddressesEnvelope {
    #[serde(default)]
    addresses: Vec<UserAddress>,
}

#[derive(Deserialize)]
struct WishlistEnvelope {
    #[serde(default)]
    items: Vec<WishlistItem>,
}

#[derive(Serialize)]
struct WishlistAddRequest<'a> {
    product_id: &'a str,
}

/// Profile, addresses, and wishlist of the authenticated user.
#[derive(Clone)]
pub struct AccountService {
    client: ApiClient,
}

impl AccountService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn me(&self) -> ApiResult<User> {
        self.client.get("/api/v1/me").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<User> {
        self.client.put("/api/v1/me", update).await
    }

    pub async fn addresses(&self) -> ApiResult<Vec<UserAddress>> {
        let envelope: AddressesEnvelope = self.client.get("/api/v1/addresses").await?;
        Ok(envelope.addresses)
    }

    pub async fn add_address(&self, address: &NewAddress) -> ApiResult<UserAddress> {
        self.client.post("/api/v1/addresses", address).await
    }

    pub async fn wishlist(&self) -> ApiResult<Vec<WishlistItem>> {
        let envelope: WishlistEnvelope = self.client.get("/api/v1/wishlist").await?;
        Ok(envelope.items)
    }

    pub async fn add_to_wishlist(&self, product_id: &str) -> ApiResult<()> {
        self.client
            .post_unit("/api/v1/wishlist", &WishlistAddRequest { product_id })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthTokens, MemoryCredentialStore};
    use crate::config::ApiConfig;
    use httpmock::prelude::*;
    use std::sync::Arc;
    use url::Url;

    fn service(base_url: &str) -> AccountService {
        let config = ApiConfig::new(Url::parse(base_url).unwrap());
        let store = Arc::new(MemoryCredentialStore::with_tokens(AuthTokens::new(
            "access-1",
            "refresh-1",
        )));
        AccountService::new(ApiClient::new(&config, store).unwrap())
    }

    #[tokio::test]
    async fn update_profile_omits_unset_fields() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/v1/me")
                .json_body_obj(&serde_json::json!({ "phone": "+15551234" }));
            then.status(200).json_body_obj(&serde_json::json!({
                "id": "user-1",
                "email": "ada@example.com",
                "role": "customer",
                "profile": {
                    "first_name": "Ada",
                    "last_name": "Lovelace",
                    "phone": "+15551234"
                },
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-06-01T00:00:00Z"
            }));
        });

        let user = service(&server.base_url())
            .update_profile(&ProfileUpdate {
                phone: Some("+15551234".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        mock.assert();
        assert_eq!(user.profile.unwrap().phone.as_deref(), Some("+15551234"));
    }

    #[tokio::test]
    async fn addresses_unwraps_envelope() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/addresses");
            then.status(200).json_body_obj(&serde_json::json!({
                "addresses": [{
                    "id": "addr-1",
                    "user_id": "user-1",
                    "label": "Home",
                    "address": {
                        "street": "1 Infinite Loop",
                        "city": "Cupertino",
                        "state": "CA",
                        "zip_code": "95014",
                        "country": "US"
                    },
                    "is_default": true
                }]
            }));
        });

        let addresses = service(&server.base_url()).addresses().await.unwrap();
        assert_eq!(addresses.len(), 1);
        assert!(addresses[0].is_default);
    }

    #[tokio::test]
    async fn wishlist_add_posts_product_id() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v1/wishlist")
                .json_body_obj(&serde_json::json!({ "product_id": "p-1" }));
            then.status(201);
        });

        service(&server.base_url()).add_to_wishlist("p-1").await.unwrap();
        mock.assert();
    }
}
