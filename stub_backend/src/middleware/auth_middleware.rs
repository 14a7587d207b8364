use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::errors::ErrorKind;

use crate::handlers::error;
use crate::handlers::jwt::{verify_token, Claims};
use crate::state::StubState;

/// Rejects the request with 401 `{ message }` unless it carries a valid bearer token.
pub async fn auth_middleware(State(state): State<StubState>, mut req: Request, next: Next) -> Response {
    let token = match req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => return error(StatusCode::UNAUTHORIZED, "Token not found").into_response(),
    };

    let data = match verify_token(&state.jwt_secret, &token) {
        Ok(d) => d,
        Err(e) => {
            let msg = match *e.kind() {
                ErrorKind::ExpiredSignature => "Token expired",
                _ => "Invalid token",
            };
            tracing::debug!("rejected bearer token: {}", msg);
            return error(StatusCode::UNAUTHORIZED, msg).into_response();
        }
    };

    req.extensions_mut().insert::<Claims>(data.claims);
    next.run(req).await
}
