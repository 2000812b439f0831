//! Home page route handler.
//!
//! The home page is the catalog: a product grid with category, gender,
//! price range, and search filters.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use fashion_store_core::{Gender, Price, ProductId};

use crate::api::types::{Product, ProductFilter};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::{MessageQuery, PageContext};
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Raw catalog filter parameters, as submitted by the filter form.
///
/// Kept as strings so a malformed value degrades to "no filter" instead of
/// rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub gender: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub search: Option<String>,
}

impl CatalogQuery {
    /// Convert the raw values into a typed backend filter, dropping values
    /// that are blank or do not parse.
    fn to_filter(&self) -> ProductFilter {
        ProductFilter {
            category: normalize(self.category.as_deref()),
            gender: normalize(self.gender.as_deref()).and_then(|g| g.parse::<Gender>().ok()),
            min_price: normalize(self.min_price.as_deref()).and_then(|p| Price::parse(&p).ok()),
            max_price: normalize(self.max_price.as_deref()).and_then(|p| Price::parse(&p).ok()),
            search: normalize(self.search.as_deref()),
        }
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// =============================================================================
// Product View
// =============================================================================

/// Product display data for the catalog grid.
#[derive(Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: String,
    pub category: String,
    pub brand: String,
    pub gender: &'static str,
    pub rating: f64,
    pub reviews_count: u32,
    pub in_stock: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            gender: product.gender.label(),
            rating: product.rating,
            reviews_count: product.reviews_count,
            in_stock: product.stock > 0,
        }
    }
}

// =============================================================================
// Template
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Shared page chrome.
    pub ctx: PageContext,
    /// Products matching the current filter.
    pub products: Vec<ProductView>,
    /// Total match count reported by the backend.
    pub total: u32,
    /// Category names for the filter dropdown.
    pub categories: Vec<String>,
    /// Gender options for the filter dropdown.
    pub genders: [Gender; 3],
    /// Current filter values, echoed back into the form.
    pub selected_category: String,
    pub selected_gender: String,
    pub min_price: String,
    pub max_price: String,
    pub search: String,
}

// =============================================================================
// Handler
// =============================================================================

/// Display the home page with the filtered catalog.
#[instrument(skip(state, session, user))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<CatalogQuery>,
    Query(flash): Query<MessageQuery>,
) -> HomeTemplate {
    let mut ctx = PageContext::build(&session, user, flash).await;

    let filter = query.to_filter();

    // Categories populate the filter dropdown; an empty list just hides it
    let categories = state.api().categories().await.unwrap_or_else(|e| {
        tracing::error!("Failed to fetch categories: {e}");
        Vec::new()
    });

    let (products, total) = match state.api().products(&filter).await {
        Ok(page) => (
            page.products.iter().map(ProductView::from).collect(),
            page.total,
        ),
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            if ctx.error.is_none() {
                ctx.error = Some(e.user_message());
            }
            (Vec::new(), 0)
        }
    };

    HomeTemplate {
        ctx,
        products,
        total,
        categories,
        genders: Gender::all(),
        selected_category: query.category.unwrap_or_default(),
        selected_gender: query.gender.unwrap_or_default(),
        min_price: query.min_price.unwrap_or_default(),
        max_price: query.max_price.unwrap_or_default(),
        search: query.search.unwrap_or_default(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_to_filter_drops_blank_and_malformed_values() {
        let query = CatalogQuery {
            category: Some("  ".to_string()),
            gender: Some("unknown".to_string()),
            min_price: Some("abc".to_string()),
            max_price: Some("199.90".to_string()),
            search: Some(" tennis ".to_string()),
        };

        let filter = query.to_filter();
        assert!(filter.category.is_none());
        assert!(filter.gender.is_none());
        assert!(filter.min_price.is_none());
        assert_eq!(filter.max_price, Some("199.90".parse().unwrap()));
        assert_eq!(filter.search.as_deref(), Some("tennis"));
    }

    #[test]
    fn test_to_filter_parses_gender() {
        let query = CatalogQuery {
            gender: Some("feminino".to_string()),
            ..CatalogQuery::default()
        };

        assert_eq!(query.to_filter().gender, Some(Gender::Feminino));
    }
}
