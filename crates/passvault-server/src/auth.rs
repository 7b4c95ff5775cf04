//! Bearer auth middleware.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;
use passvault_core::application::Vault;

use crate::error::ApiError;

/// Resolve the caller through the access guard and attach the identity to
/// the request extensions. Runs before any handler of a protected route.
pub async fn auth_middleware(
    State(vault): State<Vault>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let identity = vault.guard.authorize(header)?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
