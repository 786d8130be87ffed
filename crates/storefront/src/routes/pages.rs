//! Static content page route handlers.
//!
//! Serves markdown-based content pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use chrono::NaiveDate;
use tower_sessions::Session;
use tracing::instrument;

use super::NavView;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub nav: NavView,
    pub title: String,
    pub description: String,
    pub updated_at: Option<NaiveDate>,
    pub content_html: String,
}

/// Build the template for a content page by slug.
fn content_page(state: &AppState, nav: NavView, slug: &str) -> Result<ContentPageTemplate> {
    let page = state
        .content()
        .get_page(slug)
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))?;

    Ok(ContentPageTemplate {
        nav,
        title: page.meta.title.clone(),
        description: page.meta.description.clone().unwrap_or_default(),
        updated_at: page.meta.updated_at,
        content_html: page.content_html.clone(),
    })
}

/// Display the About Us page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state, session, user))]
pub async fn about_us(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let nav = NavView::load(&session, Some(&user)).await;
    content_page(&state, nav, "about-us")
}
