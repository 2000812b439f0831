//! Cart route handlers.
//!
//! The cart lives in the visitor's session; every mutation redirects back to
//! a re-rendered page, which is how changes become visible.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use fashion_store_core::{Price, ProductId};

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::cart::{Cart, CartLine, VariantKey};
use crate::routes::{MessageQuery, PageContext, redirect_with_error, redirect_with_success};
use crate::services::CartStore;

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub subtotal: Price,
    pub image_url: Option<String>,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            size: line.size.clone(),
            color: line.color.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            subtotal: line.subtotal(),
            image_url: line.image_url.clone(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total: Price,
    pub count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartLineView::from).collect(),
            total: cart.total(),
            count: cart.count(),
        }
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
///
/// Carries the product snapshot (name, price, image) captured by the product
/// page, so adding never refetches the catalog.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub product_name: String,
    pub image_url: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub unit_price: String,
    pub quantity: Option<u32>,
}

/// Update quantity form data.
///
/// The quantity is signed: zero or less means "remove this line".
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub size: String,
    pub color: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
    pub size: String,
    pub color: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub ctx: PageContext,
    pub cart: CartView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(store, user))]
pub async fn show(
    store: CartStore,
    OptionalAuth(user): OptionalAuth,
    Query(flash): Query<MessageQuery>,
) -> CartShowTemplate {
    let cart = CartView::from(store.cart());
    let ctx = PageContext {
        user,
        cart_count: cart.count,
        error: flash.error,
        success: flash.success,
    };

    CartShowTemplate { ctx, cart }
}

/// Add an item to the cart.
///
/// Merges with an existing line for the same `(product, size, color)`
/// variant, then redirects back to the product page.
#[instrument(skip(store, form), fields(product_id = %form.product_id))]
pub async fn add(
    mut store: CartStore,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let product_path = format!("/products/{}", form.product_id);

    // The storefront refuses to add until a variant is picked
    let (Some(size), Some(color)) = (
        form.size.filter(|s| !s.trim().is_empty()),
        form.color.filter(|c| !c.trim().is_empty()),
    ) else {
        return Ok(
            redirect_with_error(&product_path, "Please choose a size and color.").into_response(),
        );
    };

    let Ok(unit_price) = Price::parse(&form.unit_price) else {
        return Err(AppError::BadRequest("invalid unit price".to_string()));
    };

    let line = CartLine {
        product_id: ProductId::from(form.product_id.clone()),
        name: form.product_name,
        unit_price,
        quantity: form.quantity.unwrap_or(1).max(1),
        size,
        color,
        image_url: form.image_url.filter(|url| !url.is_empty()),
    };

    store.add(line).await?;

    add_breadcrumb(
        "cart",
        "Added item to cart",
        Some(&[("product_id", form.product_id.as_str())]),
    );

    Ok(redirect_with_success(&product_path, "Added to cart.").into_response())
}

/// Set the quantity of a cart line; zero or less removes it.
#[instrument(skip(store, form), fields(product_id = %form.product_id, quantity = form.quantity))]
pub async fn update(
    mut store: CartStore,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect, AppError> {
    let key = VariantKey::new(form.product_id, form.size, form.color);
    store.update_quantity(&key, form.quantity).await?;

    Ok(Redirect::to("/cart"))
}

/// Remove a cart line.
#[instrument(skip(store, form), fields(product_id = %form.product_id))]
pub async fn remove(
    mut store: CartStore,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect, AppError> {
    let key = VariantKey::new(form.product_id, form.size, form.color);
    store.remove(&key).await?;

    Ok(redirect_with_success("/cart", "Item removed from cart."))
}

/// Empty the cart.
#[instrument(skip(store))]
pub async fn clear(mut store: CartStore) -> Result<Redirect, AppError> {
    store.clear().await?;

    Ok(redirect_with_success("/cart", "Cart cleared."))
}
