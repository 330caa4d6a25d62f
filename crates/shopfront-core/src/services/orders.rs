use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ApiResult};

use super::account::Address;
use super::products::{Money, Pagination};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub total_price: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusHistory {
    pub id: String,
    pub status: i32,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// An order as the backend reports it. `status` is the backend's numeric
/// state code; the client renders it without interpreting transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub status: i32,
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
    pub shipping_address: Address,
    pub payment_method_id: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<OrderStatusHistory>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrdersPage {
    pub orders: Vec<Order>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub shipping_address: Address,
    pub payment_method_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct OrderListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub status: Option<String>,
}

impl OrderListParams {
    fn into_query(self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            query.push(("page_size", page_size.to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status", status));
        }
        query
    }
}

/// Order history and checkout for the authenticated user.
#[derive(Clone)]
pub struct OrderService {
    client: ApiClient,
}

impl OrderService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: OrderListParams) -> ApiResult<OrdersPage> {
        self.client
            .get_with_query("/api/v1/orders", &params.into_query())
            .await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Order> {
        self.client.get(&format!("/api/v1/orders/{id}")).await
    }

    pub async fn create(&self, request: &CreateOrderRequest) -> ApiResult<Order> {
        self.client.post("/api/v1/orders", request).await
    }

    pub async fn cancel(&self, id: &str, reason: Option<&str>) -> ApiResult<Order> {
        let path = format!("/api/v1/orders/{id}");
        match reason {
            Some(reason) => {
                self.client
                    .delete_with_query(&path, &[("reason", reason.to_owned())])
                    .await
            }
            None => self.client.delete(&path).await,
        }
    }
}
