use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, middleware::Next, response::Response};
use chrono::Utc;

use fleetdesk_auth::{validate_claims, UserStore};

use crate::authz;
use crate::context::PrincipalContext;
use crate::token::TokenCodec;

#[derive(Clone)]
pub struct AuthState {
    pub codec: TokenCodec,
    pub users: Arc<dyn UserStore>,
}

/// Resolve the bearer credential to a principal.
///
/// Any failure here (missing/malformed token, bad signature, stale window,
/// unknown or deactivated user) is a uniform 401; the request never reaches a
/// handler without a resolved, active principal.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers()).ok_or_else(unauthenticated)?;

    let claims = state.codec.decode(token).map_err(|_| unauthenticated())?;
    validate_claims(&claims, Utc::now()).map_err(|_| unauthenticated())?;

    let user = state
        .users
        .find_by_id(&claims.sub)
        .ok_or_else(unauthenticated)?;
    if !user.is_active {
        return Err(unauthenticated());
    }

    req.extensions_mut()
        .insert(PrincipalContext::new(user.to_principal()));

    Ok(next.run(req).await)
}

fn unauthenticated() -> Response {
    authz::deny_response(fleetdesk_auth::AuthzError::Unauthenticated)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        return None;
    }
    Some(token)
}
