//! Session-backed cart persistence.
//!
//! The cart lives entirely in the visitor's session. [`CartStore`] loads it
//! once per request and writes the full line list back after every mutation,
//! so the session always holds a complete cart.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use tower_sessions::Session;
use tracing::debug;

use crate::models::cart::{Cart, CartLine, VariantKey};
use crate::models::session::keys;

/// Cart state synchronized with the visitor's session.
///
/// # Example
///
/// ```rust,ignore
/// async fn add_to_cart(mut cart: CartStore) -> Result<Redirect, StorefrontError> {
///     cart.add(line).await?;
///     Ok(Redirect::to("/cart"))
/// }
/// ```
pub struct CartStore {
    session: Session,
    cart: Cart,
}

impl CartStore {
    /// Load the cart from the given session.
    ///
    /// Unreadable cart state (e.g., a value written by an older build) is
    /// discarded and treated as an empty cart.
    pub async fn load(session: Session) -> Self {
        let cart = load_cart(&session).await;
        Self { session, cart }
    }

    /// The current cart.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add a line, merging with any existing line for the same variant.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn add(&mut self, line: CartLine) -> Result<(), tower_sessions::session::Error> {
        self.cart.add(line);
        self.persist().await
    }

    /// Set the quantity of the given variant; zero or less removes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn update_quantity(
        &mut self,
        key: &VariantKey,
        quantity: i64,
    ) -> Result<(), tower_sessions::session::Error> {
        self.cart.update_quantity(key, quantity);
        self.persist().await
    }

    /// Remove the given variant.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn remove(&mut self, key: &VariantKey) -> Result<(), tower_sessions::session::Error> {
        self.cart.remove(key);
        self.persist().await
    }

    /// Remove all lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn clear(&mut self) -> Result<(), tower_sessions::session::Error> {
        self.cart.clear();
        self.persist().await
    }

    async fn persist(&self) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(keys::CART, self.cart.lines()).await
    }
}

impl<S> FromRequestParts<S> for CartStore
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

        Ok(Self::load(session).await)
    }
}

/// Read the cart from a session without constructing a [`CartStore`].
///
/// Used by pages that only show the cart badge.
pub async fn load_cart(session: &Session) -> Cart {
    match session.get::<Vec<CartLine>>(keys::CART).await {
        Ok(Some(lines)) => Cart::from_lines(lines),
        Ok(None) => Cart::default(),
        Err(e) => {
            debug!(error = %e, "Discarding unreadable cart state");
            Cart::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use fashion_store_core::ProductId;

    use super::*;

    fn test_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn sample_line(quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::from("p1"),
            name: "Slim Jeans".to_string(),
            unit_price: "129.99".parse().unwrap(),
            quantity,
            size: "M".to_string(),
            color: "Blue".to_string(),
            image_url: Some("https://cdn.example.com/jeans.jpg".to_string()),
        }
    }

    #[tokio::test]
    async fn test_fresh_session_yields_empty_cart() {
        let store = CartStore::load(test_session()).await;
        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_add_persists_to_session() {
        let session = test_session();

        let mut store = CartStore::load(session.clone()).await;
        store.add(sample_line(2)).await.unwrap();

        let reloaded = CartStore::load(session).await;
        assert_eq!(reloaded.cart().count(), 2);
        assert_eq!(reloaded.cart().lines()[0].name, "Slim Jeans");
    }

    #[tokio::test]
    async fn test_update_and_remove_persist() {
        let session = test_session();
        let key = VariantKey::new("p1", "M", "Blue");

        let mut store = CartStore::load(session.clone()).await;
        store.add(sample_line(1)).await.unwrap();
        store.update_quantity(&key, 4).await.unwrap();

        let reloaded = CartStore::load(session.clone()).await;
        assert_eq!(reloaded.cart().count(), 4);

        let mut store = CartStore::load(session.clone()).await;
        store.remove(&key).await.unwrap();

        let reloaded = CartStore::load(session).await;
        assert!(reloaded.cart().is_empty());
    }

    #[tokio::test]
    async fn test_clear_persists() {
        let session = test_session();

        let mut store = CartStore::load(session.clone()).await;
        store.add(sample_line(2)).await.unwrap();
        store.clear().await.unwrap();

        let reloaded = CartStore::load(session).await;
        assert!(reloaded.cart().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_cart_value_falls_back_to_empty() {
        let session = test_session();
        session
            .insert(keys::CART, serde_json::json!({"not": "a cart"}))
            .await
            .unwrap();

        let cart = load_cart(&session).await;
        assert!(cart.is_empty());
    }
}
