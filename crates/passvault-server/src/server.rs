//! Axum router setup.

use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use passvault_core::application::{DraftValidator, Vault};
use passvault_core::domain::records::{Card, Credential, Note};
use serde::de::DeserializeOwned;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::auth::auth_middleware;
use crate::handlers::records::{self, VaultResource};
use crate::handlers::users;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn build_router(vault: Vault) -> Router {
    // Authenticated routes
    let authenticated = Router::new().route("/users/erase", delete(users::erase));
    let authenticated = record_routes::<Credential>(authenticated);
    let authenticated = record_routes::<Card>(authenticated);
    let authenticated = record_routes::<Note>(authenticated)
        .layer(middleware::from_fn_with_state(vault.clone(), auth_middleware));

    // Unauthenticated routes
    let public = Router::new()
        .route("/users/sign-up", post(users::sign_up))
        .route("/users/sign-in", post(users::sign_in))
        .route("/health", get(health));

    Router::new()
        .merge(authenticated)
        .merge(public)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(vault)
}

/// `/{kind}` and `/{kind}/{id}` for one record kind
fn record_routes<R>(router: Router<Vault>) -> Router<Vault>
where
    R: VaultResource,
    R::Draft: DeserializeOwned + DraftValidator,
{
    let collection = format!("/{}", R::KIND.plural());
    let item = format!("/{}/{{id}}", R::KIND.plural());

    router
        .route(&collection, post(records::create::<R>).get(records::find_all::<R>))
        .route(&item, get(records::find_one::<R>).delete(records::remove::<R>))
}

async fn health() -> &'static str {
    "ok"
}
