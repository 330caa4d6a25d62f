use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ApiResult};

use super::account::User;
use super::products::{Money, Pagination, Product};

#[derive(Debug, Clone, Deserialize)]
pub struct UsersPage {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Money,
    pub category_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
    pub stock_quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Money,
    pub category_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
    pub stock_quantity: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UserListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl UserListParams {
    fn into_query(self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            query.push(("page_size", page_size.to_string()));
        }
        query
    }
}

/// Admin-only user listing and product CRUD. The backend enforces the role;
/// non-admin tokens get the usual 401/403 responses through the pipeline.
#[derive(Clone)]
pub struct AdminService {
    client: ApiClient,
}

impl AdminService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_users(&self, params: UserListParams) -> ApiResult<UsersPage> {
        self.client
            .get_with_query("/api/v1/admin/users", &params.into_query())
            .await
    }

    pub async fn create_product(&self, request: &CreateProductRequest) -> ApiResult<Product> {
        self.client.post("/api/v1/admin/products", request).await
    }

    pub async fn update_product(
        &self,
        id: &str,
        request: &UpdateProductRequest,
    ) -> ApiResult<Product> {
        self.client
            .put(&format!("/api/v1/admin/products/{id}"), request)
            .await
    }

    pub async fn delete_product(&self, id: &str) -> ApiResult<()> {
        self.client
            .delete_unit(&format!("/api/v1/admin/products/{id}"))
            .await
    }
}
