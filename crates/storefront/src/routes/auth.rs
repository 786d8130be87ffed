//! Authentication route handlers.
//!
//! Handles registration, login and logout with local username/password
//! accounts.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::NavView;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::auth::is_safe_next;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: NavView,
    pub error: Option<String>,
    pub username: String,
    pub next: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub nav: NavView,
    pub error: Option<String>,
    pub username: String,
}

/// Where to go after logging in.
fn redirect_target(next: Option<&str>) -> &str {
    next.filter(|n| is_safe_next(n)).unwrap_or("/")
}

/// Turn an authentication failure into a form error message, or propagate it.
fn form_error(err: AuthError) -> Result<String> {
    if err.is_user_facing() {
        Ok(match err {
            AuthError::InvalidCredentials => {
                "Please enter a correct username and password.".to_owned()
            }
            other => capitalize(&other.to_string()),
        })
    } else {
        Err(err.into())
    }
}

/// Uppercase the first character of an error message.
pub(super) fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<NextQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        nav: NavView::load(&session, user.as_ref()).await,
        error: None,
        username: String::new(),
        next: redirect_target(query.next.as_deref()).to_owned(),
    }
}

/// Handle login form submission.
///
/// # Errors
///
/// Returns an error if the account store or session fails.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => {
            set_current_user(&session, &CurrentUser::from(&user)).await?;
            set_sentry_user(&user.id, user.username.as_str());
            tracing::info!(user_id = %user.id, "user logged in");

            Ok(Redirect::to(redirect_target(form.next.as_deref())).into_response())
        }
        Err(err) => {
            let error = form_error(err)?;
            tracing::info!("login rejected");

            Ok((
                StatusCode::UNAUTHORIZED,
                LoginTemplate {
                    nav: NavView::load(&session, None).await,
                    error: Some(error),
                    username: form.username.trim().to_owned(),
                    next: redirect_target(form.next.as_deref()).to_owned(),
                },
            )
                .into_response())
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(session: Session, OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    RegisterTemplate {
        nav: NavView::load(&session, user.as_ref()).await,
        error: None,
        username: String::new(),
    }
}

/// Handle registration form submission.
///
/// Creates the user and their customer profile, logs them in and redirects
/// to the home page.
///
/// # Errors
///
/// Returns an error if the account store or session fails.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    match AuthService::new(state.pool())
        .register(&form.username, &form.password1, &form.password2)
        .await
    {
        Ok(user) => {
            set_current_user(&session, &CurrentUser::from(&user)).await?;
            set_sentry_user(&user.id, user.username.as_str());

            Ok(Redirect::to("/").into_response())
        }
        Err(err) => {
            let status = match err {
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                _ => StatusCode::BAD_REQUEST,
            };
            let error = form_error(err)?;

            Ok((
                status,
                RegisterTemplate {
                    nav: NavView::load(&session, None).await,
                    error: Some(error),
                    username: form.username.trim().to_owned(),
                },
            )
                .into_response())
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Log out: drop the whole session, cart included.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();

    Ok(Redirect::to("/"))
}
