use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ApiResult};

/// Monetary amount as the backend represents it: integer cents plus an ISO
/// currency code. Never a float.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount_cents: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Money,
    pub category_id: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub stock_quantity: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductsPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

#[derive(Deserialize)]
struct CategoriesEnvelope {
    #[serde(default)]
    categories: Vec<Category>,
}

/// Paging and filter options for product listings.
#[derive(Debug, Clone, Default)]
pub struct ProductListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub category_id: Option<String>,
}

impl ProductListParams {
    fn into_query(self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            query.push(("page_size", page_size.to_string()));
        }
        if let Some(category_id) = self.category_id {
            query.push(("category_id", category_id));
        }
        query
    }
}

/// Catalog browsing: public endpoints, no authentication required.
#[derive(Clone)]
pub struct ProductService {
    client: ApiClient,
}

impl ProductService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: ProductListParams) -> ApiResult<ProductsPage> {
        self.client
            .get_with_query("/api/v1/products", &params.into_query())
            .await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Product> {
        self.client.get(&format!("/api/v1/products/{id}")).await
    }

    pub async fn search(&self, query: &str) -> ApiResult<ProductsPage> {
        self.client
            .get_with_query("/api/v1/products/search", &[("q", query.to_owned())])
            .await
    }

    pub async fn categories(&self) -> ApiResult<Vec<Category>> {
        let envelope: CategoriesEnvelope = self.client.get("/api/v1/categories").await?;
        Ok(envelope.categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryCredentialStore;
    use crate::config::ApiConfig;
    use httpmock::prelude::*;
    use std::sync::Arc;
    use url::Url;

    fn service(base_url: &str) -> ProductService {
        let config = ApiConfig::new(Url::parse(base_url).unwrap());
        let client = ApiClient::new(&config, Arc::new(MemoryCredentialStore::new())).unwrap();
        ProductService::new(client)
    }

    fn sample_product(id: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": "Trail Mug",
            "slug": "trail-mug",
            "description": "Enamel camping mug.",
            "price": { "amount_cents": 1450, "currency": "USD" },
            "category_id": "cat-1",
            "image_urls": ["https://cdn.example/mug.jpg"],
            "stock_quantity": 12,
            "is_active": true,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-02T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn list_passes_paging_query() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/products")
                .query_param("page", "2")
                .query_param("page_size", "10")
                .query_param("category_id", "cat-1");
            then.status(200).json_body_obj(&serde_json::json!({
                "products": [sample_product("p-1")],
                "pagination": { "page": 2, "page_size": 10, "total_pages": 3, "total_count": 25 }
            }));
        });

        let page = service(&server.base_url())
            .list(ProductListParams {
                page: Some(2),
                page_size: Some(10),
                category_id: Some("cat-1".into()),
            })
            .await
            .unwrap();
        mock.assert();
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].price.amount_cents, 1450);
        assert_eq!(page.pagination.total_count, 25);
    }

    #[tokio::test]
    async fn search_sends_query_term() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/products/search")
                .query_param("q", "mug");
            then.status(200).json_body_obj(&serde_json::json!({
                "products": [sample_product("p-1")],
                "pagination": { "page": 1, "page_size": 20, "total_pages": 1, "total_count": 1 }
            }));
        });

        let page = service(&server.base_url()).search("mug").await.unwrap();
        mock.assert();
        assert_eq!(page.products[0].slug, "trail-mug");
    }

    #[tokio::test]
    async fn categories_unwraps_envelope() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/categories");
            then.status(200).json_body_obj(&serde_json::json!({
                "categories": [{
                    "id": "cat-1",
                    "name": "Kitchen",
                    "slug": "kitchen",
                    "description": "",
                    "created_at": "2024-01-01T00:00:00Z"
                }]
            }));
        });

        let categories = service(&server.base_url()).categories().await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].slug, "kitchen");
    }

    #[tokio::test]
    async fn categories_missing_field_defaults_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/categories");
            then.status(200).json_body_obj(&serde_json::json!({}));
        });

        let categories = service(&server.base_url()).categories().await.unwrap();
        assert!(categories.is_empty());
    }
}
