//! Fashion Store backend API client.
//!
//! # Architecture
//!
//! - Plain REST/JSON over `reqwest`
//! - The backend is the source of truth for pricing, stock, and order
//!   lifecycle - NO local sync, direct API calls
//! - In-memory caching via `moka` for catalog responses (5 minute TTL);
//!   user and order calls are never cached
//!
//! # Error contract
//!
//! Every backend response is JSON. Non-2xx responses carry
//! `{"detail": "..."}`; that detail is surfaced verbatim to the customer.
//!
//! # Example
//!
//! ```rust,ignore
//! use fashion_store_storefront::api::{ApiClient, ProductFilter};
//!
//! let client = ApiClient::new(&config.api);
//!
//! // List products with filters
//! let page = client.products(&ProductFilter::default()).await?;
//!
//! // Fetch one product
//! let product = client.product(&product_id).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when calling the Fashion Store backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the request with a `{detail}` payload.
    #[error("Backend error ({status}): {detail}")]
    Backend {
        /// HTTP status returned by the backend.
        status: StatusCode,
        /// The `detail` message, verbatim.
        detail: String,
    },

    /// Response body did not match the expected shape.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Message suitable for a customer-facing flash banner.
    ///
    /// Backend `{detail}` messages pass through verbatim; transport and
    /// decode failures collapse into a generic retry prompt.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend { detail, .. } => detail.clone(),
            Self::NotFound(what) => format!("{what} was not found"),
            Self::Http(_) | Self::Decode(_) => {
                "The store is temporarily unavailable. Please try again.".to_string()
            }
        }
    }
}
