use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ApiResult};

use super::products::Money;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub total_price: Money,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: String,
    pub items: Vec<CartItem>,
    pub total: Money,
    pub updated_at: DateTime<Utc>,
}

/// The backend trusts nothing in here for pricing; name and unit price are
/// display snapshots echoed back in the cart view.
#[derive(Debug, Clone, Serialize)]
pub struct AddCartItemRequest {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Serialize)]
struct UpdateQuantityRequest {
    quantity: u32,
}

/// The authenticated user's cart.
#[derive(Clone)]
pub struct CartService {
    client: ApiClient,
}

impl CartService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> ApiResult<Cart> {
        self.client.get("/api/v1/cart").await
    }

    pub async fn add_item(&self, request: &AddCartItemRequest) -> ApiResult<Cart> {
        self.client.post("/api/v1/cart/items", request).await
    }

    pub async fn update_item(&self, product_id: &str, quantity: u32) -> ApiResult<Cart> {
        self.client
            .put(
                &format!("/api/v1/cart/items/{product_id}"),
                &UpdateQuantityRequest { quantity },
            )
            .await
    }

    pub async fn remove_item(&self, product_id: &str) -> ApiResult<Cart> {
        self.client
            .delete(&format!("/api/v1/cart/items/{product_id}"))
            .await
    }

    pub async fn clear(&self) -> ApiResult<()> {
        self.client.delete_unit("/api/v1/cart").await
    }
}
