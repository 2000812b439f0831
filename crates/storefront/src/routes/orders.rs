//! Order history route handlers.
//!
//! Lists a customer's past orders and lets them cancel the ones the backend
//! still allows. Both pages require a logged-in user.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use tower_sessions::Session;
use tracing::instrument;

use fashion_store_core::{OrderId, Price};

use crate::api::types::{Order, OrderItem};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::{MessageQuery, PageContext, redirect_with_error, redirect_with_success};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Order line as rendered on the history page.
pub struct OrderItemView {
    pub name: String,
    pub quantity: u32,
    pub size: String,
    pub color: String,
    pub unit_price: Price,
    pub subtotal: Price,
    pub image_url: Option<String>,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            name: item.product_name.clone(),
            quantity: item.quantity,
            size: item.size.clone(),
            color: item.color.clone(),
            unit_price: item.unit_price,
            subtotal: item.subtotal,
            image_url: item.image_url.clone(),
        }
    }
}

/// Order as rendered on the history page.
pub struct OrderView {
    /// Full order id; templates show the short form.
    pub id: String,
    pub created_at: String,
    pub status_label: &'static str,
    pub badge_class: &'static str,
    pub cancellable: bool,
    pub items: Vec<OrderItemView>,
    pub total: Price,
    pub shipping_address: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            created_at: order.created_at.clone(),
            status_label: order.status.label(),
            badge_class: order.status.badge_class(),
            cancellable: order.status.is_cancellable(),
            items: order.items.iter().map(OrderItemView::from).collect(),
            total: order.total,
            shipping_address: order.shipping_address.clone(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub ctx: PageContext,
    pub orders: Vec<OrderView>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the customer's order history, newest first.
#[instrument(skip(state, session, user, flash), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Query(flash): Query<MessageQuery>,
) -> Result<OrdersTemplate> {
    let orders = state.api().user_orders(&user.id).await?;
    let orders: Vec<OrderView> = orders.iter().map(OrderView::from).collect();

    let ctx = PageContext::build(&session, Some(user), flash).await;

    Ok(OrdersTemplate { ctx, orders })
}

/// Handle an order cancellation.
///
/// The backend decides whether the order may still be cancelled; either way
/// the customer lands back on the history page with the outcome as a flash
/// message.
#[instrument(skip(state, user), fields(user_id = %user.id, order_id = %id))]
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Redirect {
    match state.api().cancel_order(&id).await {
        Ok(response) => redirect_with_success("/orders", &response.message),
        Err(e) => {
            tracing::warn!("Order cancellation refused: {e}");
            redirect_with_error("/orders", &e.user_message())
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fashion_store_core::{OrderStatus, ProductId, UserId};

    fn sample_order(status: OrderStatus) -> Order {
        Order {
            id: OrderId::new("ord-20240115-abc123"),
            user_id: UserId::new("user-1"),
            items: vec![OrderItem {
                product_id: ProductId::new("prod-1"),
                product_name: "Linen Shirt".to_string(),
                quantity: 2,
                size: "M".to_string(),
                color: "White".to_string(),
                unit_price: Price::parse("89.90").unwrap(),
                image_url: None,
                subtotal: Price::parse("179.80").unwrap(),
            }],
            status,
            total: Price::parse("179.80").unwrap(),
            created_at: "2024-01-15T10:30:00".to_string(),
            shipping_address: "Rua das Flores, 123".to_string(),
        }
    }

    #[test]
    fn test_order_view_maps_status() {
        let view = OrderView::from(&sample_order(OrderStatus::Confirmado));

        assert_eq!(view.status_label, "Confirmed");
        assert_eq!(view.badge_class, "status-confirmed");
        assert!(view.cancellable);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].name, "Linen Shirt");
    }

    #[test]
    fn test_shipped_order_is_not_cancellable() {
        let view = OrderView::from(&sample_order(OrderStatus::Enviado));

        assert_eq!(view.status_label, "Shipped");
        assert!(!view.cancellable);
    }
}
