use std::env;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stub_backend::state::DEFAULT_JWT_SECRET;
use stub_backend::{app, StubState, ADMIN_EMAIL, ADMIN_PASSWORD};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "stub_backend=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = env::var("STUB_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let email = env::var("STUB_ADMIN_EMAIL").unwrap_or_else(|_| ADMIN_EMAIL.to_string());
    let password = env::var("STUB_ADMIN_PASSWORD").unwrap_or_else(|_| ADMIN_PASSWORD.to_string());
    let secret = env::var("STUB_JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string());
    let state = StubState::with_admin(&email, &password, &secret)?.with_fixtures()?;

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("stub backend listening on http://{}", listener.local_addr()?);
    tracing::info!("admin login: {}", email);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
