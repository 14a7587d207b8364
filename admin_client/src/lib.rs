pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod keys;
pub mod models;
pub mod mutation;
pub mod notify;
pub mod session;
pub mod shell;
pub mod utils;
pub mod views;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use api::AdminApi;
use cache::QueryCache;
use config::ClientConfig;
use error::AdminResult;
use notify::Notifier;
use session::{FileSessionStore, SessionHandle, SessionStore};

/// One page of a server-side paginated list.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 0,
        }
    }
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Free-text confirmation a mutation endpoint answers with.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ServerMessage(pub String);

impl ServerMessage {
    pub fn text_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.0.trim().is_empty() {
            fallback
        } else {
            &self.0
        }
    }
}

/// Everything a view needs, built once at start-up and passed down explicitly.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ClientConfig>,
    pub session: SessionHandle,
    pub cache: QueryCache,
    pub notifier: Notifier,
    pub api: AdminApi,
}

impl AppContext {
    /// Restores any stored session before returning.
    pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> AdminResult<Self> {
        let session = SessionHandle::new(store);
        session.init()?;
        let api = AdminApi::new(&config, session.clone())?;
        Ok(Self {
            cache: QueryCache::new(config.stale_time),
            config: Arc::new(config),
            session,
            notifier: Notifier::new(),
            api,
        })
    }

    pub fn with_file_session(config: ClientConfig) -> AdminResult<Self> {
        let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
        Self::new(config, store)
    }
}
