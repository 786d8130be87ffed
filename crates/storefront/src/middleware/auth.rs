//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a logged-in user in route handlers.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Login page path.
pub const LOGIN_PATH: &str = "/auth/login";

/// Extractor that requires an authenticated user.
///
/// If the user is not logged in, returns a redirect to the login page with
/// the requested path in `next`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but the user is not logged in.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to the login page, returning to `next` afterwards.
    RedirectToLogin { next: String },
    /// Session layer missing.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { next } => Redirect::to(&login_url(&next)).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| AuthRejection::RedirectToLogin {
                next: requested_path(parts),
            })?;

        Ok(Self(user))
    }
}

/// Path and query of the request as the client sent it.
///
/// Nested routers strip their prefix from `parts.uri`, so prefer the
/// `OriginalUri` recorded by the outer router.
fn requested_path(parts: &Parts) -> String {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map_or(&parts.uri, |original| &original.0);

    uri.path_and_query()
        .map_or_else(|| uri.path().to_owned(), ToString::to_string)
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if the user is not logged in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Helper to log a user in.
///
/// Rotates the session ID before storing the user.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to log out: deletes the whole session, cart included.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// Login URL that returns to `next` afterwards.
#[must_use]
pub fn login_url(next: &str) -> String {
    if is_safe_next(next) {
        format!("{LOGIN_PATH}?next={}", urlencoding::encode(next))
    } else {
        LOGIN_PATH.to_owned()
    }
}

/// Whether `next` is a same-site relative path that is safe to redirect to.
#[must_use]
pub fn is_safe_next(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_encodes_next() {
        assert_eq!(login_url("/cart"), "/auth/login?next=%2Fcart");
        assert_eq!(
            login_url("/products?page=2"),
            "/auth/login?next=%2Fproducts%3Fpage%3D2"
        );
    }

    #[test]
    fn test_login_url_drops_unsafe_next() {
        assert_eq!(login_url("https://evil.example"), "/auth/login");
        assert_eq!(login_url("//evil.example"), "/auth/login");
    }

    #[test]
    fn test_is_safe_next() {
        assert!(is_safe_next("/checkout"));
        assert!(!is_safe_next(""));
        assert!(!is_safe_next("checkout"));
        assert!(!is_safe_next("//evil.example/x"));
        assert!(!is_safe_next("/\\evil.example"));
    }

    #[test]
    fn test_requested_path_prefers_original_uri() {
        let (mut parts, ()) = axum::http::Request::builder()
            .uri("/update/3?x=1")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(requested_path(&parts), "/update/3?x=1");

        parts
            .extensions
            .insert(OriginalUri("/cart/update/3?x=1".parse().unwrap()));
        assert_eq!(requested_path(&parts), "/cart/update/3?x=1");
    }

    #[test]
    fn test_rejection_redirects_with_next() {
        let response = AuthRejection::RedirectToLogin {
            next: "/about-us".to_owned(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/auth/login?next=%2Fabout-us"
        );
    }
}
