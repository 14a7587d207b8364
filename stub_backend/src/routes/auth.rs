use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::handlers::auth_handlers::{approve_license, login, pending_verifications, reject_license};
use crate::state::StubState;

pub fn login_routes() -> Router<StubState> {
    Router::new().route("/AdminAuth/login", post(login))
}

pub fn verification_routes() -> Router<StubState> {
    Router::new()
        .route("/AdminAuth/all-dr-verify-pending", get(pending_verifications))
        .route("/AdminAuth/dr-license-approve", patch(approve_license))
        .route("/AdminAuth/dr-license-reject", patch(reject_license))
}
