//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Session-backed cart persistence

pub mod cart;

pub use cart::CartStore;
