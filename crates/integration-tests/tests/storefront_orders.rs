//! Integration tests for the order history page.

use fashion_store_integration_tests::TestApp;
use reqwest::StatusCode;
use serde_json::json;

/// Run one full purchase: add the given product, then check out.
/// Returns the backend id of the created order.
async fn purchase(app: &TestApp, product_id: &str, name: &str, price: &str) -> String {
    let resp = app
        .client
        .post(app.url("/cart/add"))
        .form(&[
            ("product_id", product_id),
            ("product_name", name),
            ("size", "M"),
            ("color", "Branco"),
            ("unit_price", price),
        ])
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .client
        .post(app.url("/checkout"))
        .form(&[("shipping_address", "Rua das Flores, 123 - São Paulo, SP")])
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::OK);

    app.backend
        .latest_order_id()
        .expect("Backend holds no order")
}

/// Fetch the order history page body.
async fn orders_page(app: &TestApp) -> String {
    let resp = app
        .client
        .get(app.url("/orders"))
        .send()
        .await
        .expect("Failed to get orders page");

    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.expect("Failed to read response")
}

// ============================================================================
// Listing Tests
// ============================================================================

#[tokio::test]
async fn test_orders_page_shows_empty_state() {
    let app = TestApp::spawn().await;
    app.login().await;

    let body = orders_page(&app).await;

    assert!(body.contains("No orders yet"));
}

#[tokio::test]
async fn test_orders_list_newest_first() {
    let app = TestApp::spawn().await;
    app.login().await;

    purchase(&app, "prod-001", "Camiseta Básica Branca", "49.90").await;
    purchase(&app, "prod-002", "Vestido Floral", "189.90").await;

    let body = orders_page(&app).await;

    assert_eq!(body.matches("Order #").count(), 2);
    let newest = body.find("Vestido Floral").expect("Missing newest order");
    let oldest = body
        .find("Camiseta Básica Branca")
        .expect("Missing older order");
    assert!(newest < oldest, "Orders are not listed newest first");
}

#[tokio::test]
async fn test_new_order_shows_pending_badge() {
    let app = TestApp::spawn().await;
    app.login().await;
    purchase(&app, "prod-001", "Camiseta Básica Branca", "49.90").await;

    let body = orders_page(&app).await;

    assert!(body.contains(r#"<span class="order-status status-pending">Pending</span>"#));
    assert!(body.contains("Ships to: Rua das Flores, 123 - São Paulo, SP"));
    assert!(body.contains("Cancel order"));
}

// ============================================================================
// Cancellation Tests
// ============================================================================

#[tokio::test]
async fn test_cancel_pending_order() {
    let app = TestApp::spawn().await;
    app.login().await;
    let order_id = purchase(&app, "prod-001", "Camiseta Básica Branca", "49.90").await;

    let resp = app
        .client
        .post(app.url(&format!("/orders/{order_id}/cancel")))
        .send()
        .await
        .expect("Failed to cancel order");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");

    assert!(body.contains("Pedido cancelado com sucesso"));
    assert!(body.contains(r#"<span class="order-status status-cancelled">Cancelled</span>"#));
    assert!(!body.contains("Cancel order"));
}

#[tokio::test]
async fn test_cancel_refused_for_shipped_order() {
    let app = TestApp::spawn().await;
    app.login().await;
    let order_id = purchase(&app, "prod-001", "Camiseta Básica Branca", "49.90").await;

    {
        let mut state = app
            .backend
            .state
            .lock()
            .expect("Failed to lock backend state");
        let order = state.orders.first_mut().expect("Backend holds no order");
        order["status"] = json!("enviado");
    }

    let resp = app
        .client
        .post(app.url(&format!("/orders/{order_id}/cancel")))
        .send()
        .await
        .expect("Failed to post cancellation");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");

    assert!(body.contains("Pedido não pode ser cancelado"));
    assert!(body.contains(r#"<span class="order-status status-shipped">Shipped</span>"#));
}

#[tokio::test]
async fn test_cancel_unknown_order_shows_not_found_message() {
    let app = TestApp::spawn().await;
    app.login().await;
    purchase(&app, "prod-001", "Camiseta Básica Branca", "49.90").await;

    let resp = app
        .client
        .post(app.url("/orders/no-such-order/cancel"))
        .send()
        .await
        .expect("Failed to post cancellation");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");

    assert!(body.contains("Pedido não encontrado"));
}
