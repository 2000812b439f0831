//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use fashion_store_core::{Email, UserId};

use crate::api::types::User;

/// Session-stored user identity.
///
/// Mirrors the backend's user record so pages can render account details
/// without refetching it on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's backend ID.
    pub id: UserId,
    /// User's display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Shipping address on file, if any.
    #[serde(default)]
    pub address: Option<String>,
    /// Phone number on file, if any.
    #[serde(default)]
    pub phone: Option<String>,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            address: user.address.clone(),
            phone: user.phone.clone(),
        }
    }
}

/// Session keys for storefront state.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for storing the cart lines.
    pub const CART: &str = "cart";
}
