//! In-memory stand-in for the clinic's auth and business services, serving
//! both from one origin. Used by the console's integration tests and for
//! local runs of `admin_console`.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use axum::{middleware::from_fn_with_state, Router};
use tokio::net::TcpListener;

use middleware::{auth_middleware::auth_middleware, hooks::test_hooks};
use routes::{auth::login_routes, auth::verification_routes, view::view_routes};
pub use state::{StubState, ADMIN_EMAIL, ADMIN_PASSWORD};

pub fn app(state: StubState) -> Router {
    let protected = Router::new()
        .merge(verification_routes())
        .merge(view_routes())
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(login_routes())
        .merge(protected)
        .layer(from_fn_with_state(state.clone(), test_hooks))
        .with_state(state)
}

/// Serves `state` on an ephemeral localhost port in the background.
pub async fn spawn(state: StubState) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = app(state);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("stub backend stopped: {}", e);
        }
    });
    Ok(addr)
}
