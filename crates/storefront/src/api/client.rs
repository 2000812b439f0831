//! REST client for the Fashion Store backend.
//!
//! Catalog reads (product list, single product, categories) are cached with
//! `moka` for 5 minutes; user and order operations always hit the backend.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use fashion_store_core::{OrderId, ProductId, UserId};

use crate::config::BackendApiConfig;

use super::ApiError;
use super::cache::{CacheKey, CacheValue};
use super::types::{
    AuthResponse, CategoryList, CreateOrderRequest, ErrorDetail, LoginRequest, Order, OrderList,
    OrderResponse, Product, ProductFilter, ProductPage, RegisterRequest,
};

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Fashion Store backend REST API.
///
/// Cheaply cloneable; all clones share one connection pool and cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new backend API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &BackendApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_owned(),
                cache,
            }),
        })
    }

    /// Issue a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.inner.base_url);
        let mut request = self.inner.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        decode_response(response).await
    }

    /// Issue a request with a JSON body and decode the JSON response.
    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self
            .inner
            .client
            .request(method, &url)
            .json(body)
            .send()
            .await?;
        decode_response(response).await
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// List products matching the given filter.
    ///
    /// Search queries bypass the cache; all other filter combinations are
    /// cached under their canonical query string.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, filter: &ProductFilter) -> Result<ProductPage, ApiError> {
        let pairs = filter.query_pairs();
        let cache_key = CacheKey::Products {
            query: pairs
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&"),
        };

        // Check cache (search results are too volatile to cache)
        if filter.search.is_none()
            && let Some(CacheValue::Products(page)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for product list");
            return Ok(page);
        }

        let page: ProductPage = self.get_json("/api/products/", &pairs).await?;

        if filter.search.is_none() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(page.clone()))
                .await;
        }

        Ok(page)
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the product does not exist, or
    /// another error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let result: Result<Product, ApiError> =
            self.get_json(&format!("/api/products/{id}"), &[]).await;

        let product = match result {
            Ok(product) => product,
            Err(ApiError::Backend {
                status: StatusCode::NOT_FOUND,
                ..
            }) => return Err(ApiError::NotFound(format!("Product {id}"))),
            Err(e) => return Err(e),
        };

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// List all product categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let list: CategoryList = self.get_json("/api/products/categories", &[]).await?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(list.categories.clone()),
            )
            .await;

        Ok(list.categories)
    }

    /// Probe backend reachability, bypassing the cache.
    ///
    /// Used by the readiness endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    pub async fn ping(&self) -> Result<(), ApiError> {
        let url = format!("{}/api/products/categories", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await?;
            Err(backend_error(status, &body))
        }
    }

    // =========================================================================
    // User Methods (not cached - credentials and sessions)
    // =========================================================================

    /// Authenticate a user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] with the backend's detail message on
    /// rejected credentials.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.send_json(Method::POST, "/api/users/login", request)
            .await
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] with the backend's detail message if
    /// the email is already taken or the input is rejected.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.send_json(Method::POST, "/api/users/register", request)
            .await
    }

    // =========================================================================
    // Order Methods (not cached - mutable state)
    // =========================================================================

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] with the backend's detail message if
    /// the order is rejected (e.g., insufficient stock).
    #[instrument(skip(self, request), fields(user_id = %request.user_id, items = request.items.len()))]
    pub async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<OrderResponse, ApiError> {
        self.send_json(Method::POST, "/api/orders/", request).await
    }

    /// List a user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn user_orders(&self, user_id: &UserId) -> Result<Vec<Order>, ApiError> {
        let list: OrderList = self
            .get_json(&format!("/api/orders/user/{user_id}"), &[])
            .await?;
        Ok(list.orders)
    }

    /// Cancel an order.
    ///
    /// The backend enforces which statuses may be cancelled; its refusal
    /// message comes back verbatim in [`ApiError::Backend`].
    ///
    /// # Errors
    ///
    /// Returns an error if the cancellation is refused or the request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn cancel_order(&self, order_id: &OrderId) -> Result<OrderResponse, ApiError> {
        self.send_json(
            Method::PUT,
            &format!("/api/orders/{order_id}/cancel"),
            &serde_json::json!({}),
        )
        .await
    }
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Decode a backend response, mapping non-2xx statuses to [`ApiError::Backend`].
async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(backend_error(status, &body));
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse backend response"
        );
        ApiError::Decode(e)
    })
}

fn backend_error(status: StatusCode, body: &str) -> ApiError {
    ApiError::Backend {
        status,
        detail: parse_detail(status, body),
    }
}

/// Extract the `{detail}` message from an error body, falling back to the
/// HTTP status text when the body is not the expected envelope.
fn parse_detail(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorDetail>(body).map_or_else(
        |_| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        },
        |envelope| envelope.detail,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detail_extracts_message() {
        let detail = parse_detail(
            StatusCode::UNAUTHORIZED,
            r#"{"detail": "Email ou senha incorretos"}"#,
        );
        assert_eq!(detail, "Email ou senha incorretos");
    }

    #[test]
    fn test_parse_detail_falls_back_to_status_text() {
        assert_eq!(
            parse_detail(StatusCode::BAD_GATEWAY, "<html>nginx</html>"),
            "Bad Gateway"
        );
        assert_eq!(
            parse_detail(StatusCode::NOT_FOUND, r#"{"error": "wrong shape"}"#),
            "Not Found"
        );
    }

    #[test]
    fn test_backend_error_carries_status() {
        let err = backend_error(StatusCode::CONFLICT, r#"{"detail": "Email já cadastrado"}"#);
        match err {
            ApiError::Backend { status, detail } => {
                assert_eq!(status, StatusCode::CONFLICT);
                assert_eq!(detail, "Email já cadastrado");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
