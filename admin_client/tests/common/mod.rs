#![allow(dead_code)]

use std::sync::Arc;

use admin_client::config::ClientConfig;
use admin_client::notify::Notification;
use admin_client::session::{MemorySessionStore, Session, SessionStore};
use admin_client::AppContext;
use stub_backend::{StubState, ADMIN_EMAIL};
use tokio::sync::broadcast::Receiver;

pub struct Harness {
    pub backend: StubState,
    pub ctx: AppContext,
    pub store: Arc<MemorySessionStore>,
}

/// A seeded backend and a console context with nobody signed in.
pub async fn start() -> Harness {
    let backend = StubState::seeded().unwrap();
    let addr = stub_backend::spawn(backend.clone()).await.unwrap();
    let config = ClientConfig::single_origin(&format!("http://{}", addr), "unused-session.json").unwrap();
    let store = Arc::new(MemorySessionStore::new());
    let ctx = AppContext::new(config, store.clone() as Arc<dyn SessionStore>).unwrap();
    Harness { backend, ctx, store }
}

/// Same as [`start`], with a session whose token expires `ttl_secs` from now.
pub async fn signed_in_for(ttl_secs: i64) -> Harness {
    let harness = start().await;
    let token = harness.backend.issue_token(ttl_secs).unwrap();
    harness
        .ctx
        .session
        .set(Session {
            access_token: token,
            refresh_token: uuid::Uuid::new_v4().to_string(),
            email: ADMIN_EMAIL.to_string(),
            id: "admin-1".to_string(),
        })
        .unwrap();
    harness
}

pub async fn signed_in() -> Harness {
    signed_in_for(3600).await
}

pub fn drain(inbox: &mut Receiver<Notification>) -> Vec<Notification> {
    let mut seen = Vec::new();
    while let Ok(note) = inbox.try_recv() {
        seen.push(note);
    }
    seen
}
