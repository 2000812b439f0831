//! Wire types for the Fashion Store backend API.
//!
//! Field names and shapes match the backend JSON exactly; display concerns
//! live in the route view structs, not here.

use serde::{Deserialize, Serialize};

use fashion_store_core::{Email, Gender, OrderId, OrderStatus, Price, ProductId, UserId};

// =============================================================================
// Catalog
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub image_url: String,
    pub stock: u32,
    pub brand: String,
    pub gender: Gender,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews_count: u32,
}

/// Response envelope for `GET /api/products/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u32,
}

/// Response envelope for `GET /api/products/categories`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryList {
    pub categories: Vec<String>,
}

/// Catalog filter parameters.
///
/// Every field is optional; unset fields are omitted from the query string
/// entirely, matching what the backend expects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub gender: Option<Gender>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub search: Option<String>,
}

impl ProductFilter {
    /// Whether no filter is set at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.gender.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.search.is_none()
    }

    /// Query-string pairs for the backend, omitting unset fields.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(gender) = self.gender {
            pairs.push(("gender", gender.as_str().to_string()));
        }
        if let Some(min_price) = self.min_price {
            pairs.push(("min_price", min_price.amount().to_string()));
        }
        if let Some(max_price) = self.max_price {
            pairs.push(("max_price", max_price.amount().to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }
}

// =============================================================================
// Users
// =============================================================================

/// A user record as the backend returns it.
///
/// This is mirrored into the session on login; see
/// `crate::models::CurrentUser`.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Request body for `POST /api/users/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /api/users/register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Response envelope for login and register.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: User,
}

// =============================================================================
// Orders
// =============================================================================

/// One line of an order, as the backend returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub size: String,
    pub color: String,
    pub unit_price: Price,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Computed by the backend as `unit_price * quantity`.
    pub subtotal: Price,
}

/// An order record.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub total: Price,
    /// ISO 8601 timestamp without timezone, as the backend emits it.
    pub created_at: String,
    pub shipping_address: String,
}

/// One line of an order creation request.
///
/// Captured values (name, price, image) are sent as stored in the cart at
/// add time; the backend decides what to trust.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemInput {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub size: String,
    pub color: String,
    pub unit_price: Price,
    pub image_url: String,
}

/// Request body for `POST /api/orders/`.
#[derive(Debug, Serialize)]
pub struct CreateOrderRequest {
    pub user_id: UserId,
    pub items: Vec<OrderItemInput>,
    pub shipping_address: String,
}

/// Response envelope for order creation and cancellation.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    pub message: String,
    pub order: Order,
}

/// Response envelope for `GET /api/orders/user/{user_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
    pub total: u32,
}

/// Error envelope carried by every non-2xx backend response.
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_decodes_backend_json() {
        let json = r#"{
            "id": "a1b2c3",
            "name": "Basic Tee",
            "description": "Cotton tee",
            "price": 59.9,
            "category": "camisetas",
            "sizes": ["P", "M", "G"],
            "colors": ["preto", "branco"],
            "image_url": "https://img.example/tee.jpg",
            "stock": 12,
            "brand": "FashionCo",
            "gender": "unissex",
            "rating": 4.5,
            "reviews_count": 37
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "a1b2c3");
        assert_eq!(product.price, Price::parse("59.9").unwrap());
        assert_eq!(product.gender, Gender::Unissex);
        assert_eq!(product.sizes.len(), 3);
    }

    #[test]
    fn test_product_tolerates_missing_rating_fields() {
        let json = r#"{
            "id": "x",
            "name": "n",
            "description": "d",
            "price": 10,
            "category": "c",
            "sizes": [],
            "colors": [],
            "image_url": "",
            "stock": 0,
            "brand": "b",
            "gender": "feminino"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert!((product.rating - 0.0).abs() < f64::EPSILON);
        assert_eq!(product.reviews_count, 0);
    }

    #[test]
    fn test_filter_query_pairs_omit_unset() {
        let filter = ProductFilter {
            category: Some("vestidos".to_string()),
            gender: None,
            min_price: None,
            max_price: Some(Price::parse("200").unwrap()),
            search: None,
        };

        let pairs = filter.query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("category", "vestidos".to_string()),
                ("max_price", "200".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_filter_has_no_pairs() {
        let filter = ProductFilter::default();
        assert!(filter.is_empty());
        assert!(filter.query_pairs().is_empty());
    }

    #[test]
    fn test_register_request_skips_blank_optionals() {
        let request = RegisterRequest {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "pw".to_string(),
            address: None,
            phone: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("address").is_none());
        assert!(json.get("phone").is_none());
    }

    #[test]
    fn test_order_decodes_with_items() {
        let json = r#"{
            "id": "o-1",
            "user_id": "u-1",
            "items": [{
                "product_id": "p-1",
                "product_name": "Basic Tee",
                "quantity": 2,
                "size": "M",
                "color": "preto",
                "unit_price": 59.9,
                "image_url": "https://img.example/tee.jpg",
                "subtotal": 119.8
            }],
            "status": "pendente",
            "total": 119.8,
            "created_at": "2024-01-15T10:30:00",
            "shipping_address": "Rua A, 123"
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Pendente);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total, Price::parse("119.8").unwrap());
    }
}
