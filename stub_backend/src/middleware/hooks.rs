use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::handlers::error;
use crate::state::StubState;

/// Counts every request per path, then applies any delay or queued failure
/// a test registered for that path.
pub async fn test_hooks(State(state): State<StubState>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    state.record_hit(&path);

    if let Some(delay) = state.delay_for(&path) {
        tokio::time::sleep(delay).await;
    }
    if let Some(failure) = state.take_failure(&path) {
        let status = StatusCode::from_u16(failure.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return error(status, &failure.message).into_response();
    }
    next.run(req).await
}
