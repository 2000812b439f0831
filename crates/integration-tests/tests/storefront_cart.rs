//! Integration tests for the session cart.
//!
//! The cart lives in the visitor's session cookie, so these tests reuse one
//! client per test to keep the session across requests.

use fashion_store_integration_tests::TestApp;
use reqwest::StatusCode;

/// Add the seeded shirt to the cart in the given size and quantity.
async fn add_shirt(app: &TestApp, size: &str, quantity: &str) -> String {
    let resp = app
        .client
        .post(app.url("/cart/add"))
        .form(&[
            ("product_id", "prod-001"),
            ("product_name", "Camiseta Básica Branca"),
            ("image_url", "https://img.example.com/camiseta-basica.jpg"),
            ("size", size),
            ("color", "Branco"),
            ("unit_price", "49.90"),
            ("quantity", quantity),
        ])
        .send()
        .await
        .expect("Failed to add to cart");

    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.expect("Failed to read response")
}

/// Fetch the cart page body.
async fn cart_page(app: &TestApp) -> String {
    let resp = app
        .client
        .get(app.url("/cart"))
        .send()
        .await
        .expect("Failed to get cart page");

    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.expect("Failed to read response")
}

// ============================================================================
// Add Tests
// ============================================================================

#[tokio::test]
async fn test_add_lands_back_on_product_with_flash() {
    let app = TestApp::spawn().await;

    let body = add_shirt(&app, "M", "1").await;

    // Back on the product page, with the flash and the badge
    assert!(body.contains("Added to cart."));
    assert!(body.contains("Camiseta Básica Branca"));
    assert!(body.contains(r#"<span class="cart-badge">1</span>"#));
}

#[tokio::test]
async fn test_cart_page_shows_line_details() {
    let app = TestApp::spawn().await;
    add_shirt(&app, "M", "1").await;

    let body = cart_page(&app).await;

    assert!(body.contains("Shopping cart"));
    assert!(body.contains("Camiseta Básica Branca"));
    assert!(body.contains("Size: <strong>M</strong>"));
    assert!(body.contains("Color: <strong>Branco</strong>"));
    assert!(body.contains("R$ 49.90 each"));
    assert!(body.contains("Items (1)"));
}

#[tokio::test]
async fn test_add_same_variant_merges_quantities() {
    let app = TestApp::spawn().await;
    add_shirt(&app, "M", "1").await;
    let body = add_shirt(&app, "M", "2").await;

    assert!(body.contains(r#"<span class="cart-badge">3</span>"#));

    let body = cart_page(&app).await;
    assert!(body.contains(r#"<span class="qty-value">3</span>"#));
    assert!(body.contains("R$ 149.70"));
}

#[tokio::test]
async fn test_add_different_sizes_stay_separate() {
    let app = TestApp::spawn().await;
    add_shirt(&app, "M", "1").await;
    add_shirt(&app, "G", "1").await;

    let body = cart_page(&app).await;

    assert!(body.contains("Size: <strong>M</strong>"));
    assert!(body.contains("Size: <strong>G</strong>"));
    assert!(body.contains("Items (2)"));
    assert!(body.contains("R$ 99.80"));
}

#[tokio::test]
async fn test_add_without_variant_is_refused() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/cart/add"))
        .form(&[
            ("product_id", "prod-001"),
            ("product_name", "Camiseta Básica Branca"),
            ("unit_price", "49.90"),
            ("size", ""),
            ("color", ""),
        ])
        .send()
        .await
        .expect("Failed to post add form");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Please choose a size and color."));

    let body = cart_page(&app).await;
    assert!(body.contains("Your cart is empty"));
}

// ============================================================================
// Update / Remove Tests
// ============================================================================

#[tokio::test]
async fn test_update_sets_quantity() {
    let app = TestApp::spawn().await;
    add_shirt(&app, "M", "1").await;

    let resp = app
        .client
        .post(app.url("/cart/update"))
        .form(&[
            ("product_id", "prod-001"),
            ("size", "M"),
            ("color", "Branco"),
            ("quantity", "3"),
        ])
        .send()
        .await
        .expect("Failed to update quantity");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");

    assert!(body.contains(r#"<span class="qty-value">3</span>"#));
    assert!(body.contains("R$ 149.70"));
}

#[tokio::test]
async fn test_update_to_zero_removes_line() {
    let app = TestApp::spawn().await;
    add_shirt(&app, "M", "1").await;

    let resp = app
        .client
        .post(app.url("/cart/update"))
        .form(&[
            ("product_id", "prod-001"),
            ("size", "M"),
            ("color", "Branco"),
            ("quantity", "0"),
        ])
        .send()
        .await
        .expect("Failed to update quantity");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");

    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_remove_deletes_only_that_variant() {
    let app = TestApp::spawn().await;
    add_shirt(&app, "M", "1").await;
    add_shirt(&app, "G", "1").await;

    let resp = app
        .client
        .post(app.url("/cart/remove"))
        .form(&[
            ("product_id", "prod-001"),
            ("size", "M"),
            ("color", "Branco"),
        ])
        .send()
        .await
        .expect("Failed to remove item");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");

    assert!(body.contains("Item removed from cart."));
    assert!(!body.contains("Size: <strong>M</strong>"));
    assert!(body.contains("Size: <strong>G</strong>"));
}

#[tokio::test]
async fn test_clear_empties_cart() {
    let app = TestApp::spawn().await;
    add_shirt(&app, "M", "2").await;

    let resp = app
        .client
        .post(app.url("/cart/clear"))
        .send()
        .await
        .expect("Failed to clear cart");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");

    assert!(body.contains("Cart cleared."));
    assert!(body.contains("Your cart is empty"));
}
