//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions, and the helpers
//! that read and write the cart stored in them.

use sqlx::PgPool;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use nepal_clothing_core::Cart;

use crate::config::StorefrontConfig;
use crate::models::session_keys;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "nc_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the `PostgreSQL` session store.
///
/// The `tower_sessions` table is created by `nc-cli migrate`.
#[must_use]
pub fn create_session_store(pool: &PgPool) -> PostgresStore {
    PostgresStore::new(pool.clone())
}

/// Create the session layer.
///
/// # Arguments
///
/// * `store` - `PostgreSQL` session store
/// * `config` - Storefront configuration (cookies are `Secure` behind HTTPS)
#[must_use]
pub fn create_session_layer(
    store: PostgresStore,
    config: &StorefrontConfig,
) -> SessionManagerLayer<PostgresStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Read the cart from the session, or an empty one.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use nepal_clothing_core::ProductId;
    use rust_decimal::Decimal;
    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_cart_roundtrips_through_session() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        assert!(load_cart(&session).await.unwrap().is_empty());

        let mut cart = Cart::new();
        cart.add(ProductId::new(7), "Pashmina Shawl", Decimal::new(4500, 0));
        save_cart(&session, &cart).await.unwrap();

        let loaded = load_cart(&session).await.unwrap();
        assert_eq!(loaded, cart);
        assert_eq!(loaded.item_count(), 1);
    }
}
