//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use fashion_store_core::{Price, ProductId};

use crate::api::ApiError;
use crate::api::types::Product;
use crate::error::AppError;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::{MessageQuery, NotFoundTemplate, PageContext};
use crate::state::AppState;

// =============================================================================
// Product Detail View
// =============================================================================

/// Product display data for the detail page.
pub struct ProductDetailView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Bare decimal amount for the add-to-cart form's hidden field.
    pub price_amount: String,
    pub category: String,
    pub brand: String,
    pub gender: &'static str,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub image_url: String,
    pub stock: u32,
    pub in_stock: bool,
    pub rating: f64,
    pub reviews_count: u32,
    /// Five-character star row, e.g. `★★★★☆`.
    pub stars: String,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            price_amount: product.price.amount().to_string(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            gender: product.gender.label(),
            sizes: product.sizes.clone(),
            colors: product.colors.clone(),
            image_url: product.image_url.clone(),
            stock: product.stock,
            in_stock: product.stock > 0,
            rating: product.rating,
            reviews_count: product.reviews_count,
            stars: star_rating(product.rating),
        }
    }
}

/// Render a rating as a five-character star row, rounding to the nearest
/// whole star.
fn star_rating(rating: f64) -> String {
    (1..=5)
        .map(|i| if rating >= f64::from(i) - 0.5 { '★' } else { '☆' })
        .collect()
}

// =============================================================================
// Template
// =============================================================================

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductTemplate {
    pub ctx: PageContext,
    pub product: ProductDetailView,
}

// =============================================================================
// Handler
// =============================================================================

/// Display a product detail page.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<ProductId>,
    Query(flash): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let ctx = PageContext::build(&session, user, flash).await;

    let product = match state.api().product(&id).await {
        Ok(product) => product,
        Err(ApiError::NotFound(_)) => {
            return Ok((StatusCode::NOT_FOUND, NotFoundTemplate { ctx }).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    Ok(ProductTemplate {
        ctx,
        product: ProductDetailView::from(&product),
    }
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::star_rating;

    #[test]
    fn test_star_rating_rounds_to_nearest() {
        assert_eq!(star_rating(4.3), "★★★★☆");
        assert_eq!(star_rating(4.5), "★★★★★");
        assert_eq!(star_rating(0.0), "☆☆☆☆☆");
        assert_eq!(star_rating(2.4), "★★☆☆☆");
    }
}
