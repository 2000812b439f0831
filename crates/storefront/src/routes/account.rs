//! Account route handlers.
//!
//! These routes require authentication.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::Query;
use tower_sessions::Session;

use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::{MessageQuery, PageContext};

/// Profile fields shown on the account page.
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub ctx: PageContext,
    pub profile: ProfileView,
}

/// Display the account page.
///
/// The profile is read from the session copy written at login; the backend
/// has no profile endpoint beyond what login returns.
pub async fn index(
    session: Session,
    RequireAuth(user): RequireAuth,
    Query(flash): Query<MessageQuery>,
) -> AccountTemplate {
    let profile = ProfileView {
        name: user.name.clone(),
        email: user.email.to_string(),
        address: user.address.clone(),
        phone: user.phone.clone(),
    };

    let ctx = PageContext::build(&session, Some(user), flash).await;

    AccountTemplate { ctx, profile }
}
