//! Checkout route handlers.
//!
//! The checkout page requires a logged-in user and a non-empty cart. Placing
//! an order snapshots the session cart into the backend's order payload and
//! clears the cart only after the backend accepts it, so a rejected order
//! leaves the cart intact.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use fashion_store_core::Price;

use crate::api::types::{CreateOrderRequest, OrderItemInput};
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::routes::cart::CartView;
use crate::routes::{PageContext, redirect_with_error};
use crate::services::CartStore;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub shipping_address: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/form.html")]
pub struct CheckoutTemplate {
    pub ctx: PageContext,
    pub cart: CartView,
    /// Shipping address pre-filled from the user's profile.
    pub address: String,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct CheckoutSuccessTemplate {
    pub ctx: PageContext,
    /// Full order id; the page shows the short form.
    pub order_id: String,
    pub total: Price,
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout page.
///
/// Anonymous visitors are sent to login with checkout as the return target;
/// an empty cart goes back to the cart page.
pub async fn form(store: CartStore, OptionalAuth(user): OptionalAuth) -> Response {
    let Some(user) = user else {
        let notice = urlencoding::encode("Please log in to continue.");
        return Redirect::to(&format!("/auth/login?redirect=checkout&error={notice}"))
            .into_response();
    };

    if store.cart().is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let cart = CartView::from(store.cart());
    let address = user.address.clone().unwrap_or_default();
    let ctx = PageContext {
        user: Some(user),
        cart_count: cart.count,
        ..PageContext::default()
    };

    CheckoutTemplate { ctx, cart, address }.into_response()
}

/// Handle order placement.
#[instrument(skip(state, user, store, form), fields(user_id = %user.id))]
pub async fn place_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut store: CartStore,
    Form(form): Form<CheckoutForm>,
) -> Result<Response, AppError> {
    let shipping_address = form.shipping_address.trim().to_string();
    if shipping_address.is_empty() {
        return Ok(
            redirect_with_error("/checkout", "Please provide a shipping address.").into_response(),
        );
    }

    if store.cart().is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let items = store
        .cart()
        .lines()
        .iter()
        .map(|line| OrderItemInput {
            product_id: line.product_id.clone(),
            product_name: line.name.clone(),
            quantity: line.quantity,
            size: line.size.clone(),
            color: line.color.clone(),
            unit_price: line.unit_price,
            image_url: line.image_url.clone().unwrap_or_default(),
        })
        .collect();

    let request = CreateOrderRequest {
        user_id: user.id.clone(),
        items,
        shipping_address,
    };

    let response = match state.api().create_order(&request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Order rejected: {e}");
            return Ok(redirect_with_error("/checkout", &e.user_message()).into_response());
        }
    };

    let order = response.order;
    store.clear().await?;

    let order_id = order.id.to_string();
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", order_id.as_str())]),
    );

    let ctx = PageContext {
        user: Some(user),
        ..PageContext::default()
    };

    Ok(CheckoutSuccessTemplate {
        ctx,
        order_id,
        total: order.total,
        message: response.message,
    }
    .into_response())
}
