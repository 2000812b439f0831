//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (catalog with filters)
//!
//! # Products
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add item (merges same variant)
//! POST /cart/update            - Set quantity (0 or less removes)
//! POST /cart/remove            - Remove item
//! POST /cart/clear             - Empty the cart
//!
//! # Checkout
//! GET  /checkout               - Checkout form (requires login, non-empty cart)
//! POST /checkout               - Place order
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//!
//! # Orders (requires auth)
//! GET  /orders                 - Order history
//! POST /orders/{id}/cancel     - Cancel an order
//!
//! # Account (requires auth)
//! GET  /account                - Account overview
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod products;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::services::cart::load_cart;
use crate::state::AppState;

// =============================================================================
// Shared Page Context
// =============================================================================

/// Data every page needs for the shared chrome: header login state, cart
/// badge, and the flash banner.
#[derive(Default)]
pub struct PageContext {
    /// Logged-in user, if any.
    pub user: Option<CurrentUser>,
    /// Unit count for the header cart badge.
    pub cart_count: u32,
    /// One-shot error message from the query string.
    pub error: Option<String>,
    /// One-shot success message from the query string.
    pub success: Option<String>,
}

impl PageContext {
    /// Assemble the context from the request's session state and flash query.
    pub async fn build(session: &Session, user: Option<CurrentUser>, flash: MessageQuery) -> Self {
        let cart_count = load_cart(session).await.count();
        Self {
            user,
            cart_count,
            error: flash.error,
            success: flash.success,
        }
    }
}

/// Query parameters for error/success display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Flash Redirect Helpers
// =============================================================================

/// Redirect to `path` carrying a percent-encoded error flash.
pub fn redirect_with_error(path: &str, message: &str) -> Redirect {
    let sep = if path.contains('?') { '&' } else { '?' };
    Redirect::to(&format!(
        "{path}{sep}error={}",
        urlencoding::encode(message)
    ))
}

/// Redirect to `path` carrying a percent-encoded success flash.
pub fn redirect_with_success(path: &str, message: &str) -> Redirect {
    let sep = if path.contains('?') { '&' } else { '?' };
    Redirect::to(&format!(
        "{path}{sep}success={}",
        urlencoding::encode(message)
    ))
}

// =============================================================================
// Not Found
// =============================================================================

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub ctx: PageContext,
}

/// Fallback handler for unknown paths.
pub async fn not_found(
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> (StatusCode, NotFoundTemplate) {
    let ctx = PageContext::build(&session, user, MessageQuery::default()).await;
    (StatusCode::NOT_FOUND, NotFoundTemplate { ctx })
}

// =============================================================================
// Router Assembly
// =============================================================================

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}/cancel", post(orders::cancel))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page / catalog
        .route("/", get(home::home))
        // Product detail
        .route("/products/{id}", get(products::show))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", get(checkout::form).post(checkout::place_order))
        // Auth routes
        .nest("/auth", auth_routes())
        // Order history
        .nest("/orders", order_routes())
        // Account overview
        .route("/account", get(account::index))
        // Styled 404 for unknown paths
        .fallback(not_found)
}
