//! Cache types for backend catalog responses.

use fashion_store_core::ProductId;

use super::types::{Product, ProductPage};

/// Cache key for catalog reads.
///
/// Product listings are keyed by their canonical query string so each
/// filter combination caches independently.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products { query: String },
    Categories,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(ProductPage),
    Categories(Vec<String>),
}
