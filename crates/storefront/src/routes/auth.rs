//! Authentication route handlers.
//!
//! Handles login, registration, and logout against the backend's user
//! endpoints. The backend owns credential verification; these handlers only
//! run the pre-network form checks and mirror the returned user record into
//! the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use fashion_store_core::Email;

use crate::api::types::{LoginRequest, RegisterRequest};
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::routes::{MessageQuery, PageContext, redirect_with_error, redirect_with_success};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Where to land after login; only `checkout` is honored.
    pub redirect: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Carried through the form so login can land on the checkout page.
    pub redirect: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
    pub redirect: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub ctx: PageContext,
}

// =============================================================================
// Login Routes
// =============================================================================

/// The login page path, with the redirect target carried along when present.
fn login_path(redirect: Option<&str>) -> String {
    match redirect {
        Some(target) => format!("/auth/login?redirect={}", urlencoding::encode(target)),
        None => "/auth/login".to_string(),
    }
}

/// Display the login page.
pub async fn login_page(
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<LoginQuery>,
    Query(flash): Query<MessageQuery>,
) -> LoginTemplate {
    let ctx = PageContext::build(&session, user, flash).await;

    LoginTemplate {
        ctx,
        redirect: query.redirect,
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let back = login_path(form.redirect.as_deref());

    if form.email.trim().is_empty() || form.password.is_empty() {
        return Ok(redirect_with_error(&back, "Please fill in all fields.").into_response());
    }
    if Email::parse(form.email.trim()).is_err() {
        return Ok(
            redirect_with_error(&back, "Please enter a valid email address.").into_response(),
        );
    }

    let request = LoginRequest {
        email: form.email.trim().to_string(),
        password: form.password,
    };

    let auth = match state.api().login(&request).await {
        Ok(auth) => auth,
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            return Ok(redirect_with_error(&back, &e.user_message()).into_response());
        }
    };

    let user = CurrentUser::from(&auth.user);
    set_current_user(&session, &user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    // Only the checkout page is a valid post-login target
    let target = if form.redirect.as_deref() == Some("checkout") {
        "/checkout"
    } else {
        "/account"
    };

    Ok(redirect_with_success(target, "Logged in successfully.").into_response())
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Query(flash): Query<MessageQuery>,
) -> RegisterTemplate {
    let ctx = PageContext::build(&session, user, flash).await;

    RegisterTemplate { ctx }
}

/// Handle registration form submission.
///
/// On success the new user is logged in immediately.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    const BACK: &str = "/auth/register";

    if form.name.trim().is_empty()
        || form.email.trim().is_empty()
        || form.password.is_empty()
        || form.confirm_password.is_empty()
    {
        return Ok(redirect_with_error(BACK, "Please fill in all fields.").into_response());
    }
    if form.password != form.confirm_password {
        return Ok(redirect_with_error(BACK, "Passwords do not match.").into_response());
    }
    if form.password.chars().count() < 3 {
        return Ok(
            redirect_with_error(BACK, "Password must be at least 3 characters.").into_response(),
        );
    }
    if Email::parse(form.email.trim()).is_err() {
        return Ok(
            redirect_with_error(BACK, "Please enter a valid email address.").into_response(),
        );
    }

    let request = RegisterRequest {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password,
        address: form.address.filter(|a| !a.trim().is_empty()),
        phone: form.phone.filter(|p| !p.trim().is_empty()),
    };

    let auth = match state.api().register(&request).await {
        Ok(auth) => auth,
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            return Ok(redirect_with_error(BACK, &e.user_message()).into_response());
        }
    };

    let user = CurrentUser::from(&auth.user);
    set_current_user(&session, &user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(redirect_with_success("/", "Account created successfully.").into_response())
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Clears the login state and returns to the landing page. The cart is left
/// in the session untouched.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    clear_sentry_user();

    Redirect::to("/")
}
