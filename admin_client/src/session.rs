//! Persisted admin session.
//!
//! The session is four flat string entries in a key-value store. [`SessionHandle`]
//! is the only thing that reads or writes them: `init` once at start-up, then
//! `set` after login and `clear` on logout.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use dashmap::DashMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::error::AdminResult;
use crate::models::LoginGrant;
use crate::utils;

pub const TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const EMAIL_KEY: &str = "email";
pub const ID_KEY: &str = "id";

pub trait SessionStore: Send + Sync {
    fn load(&self) -> AdminResult<BTreeMap<String, String>>;
    fn save(&self, entries: &BTreeMap<String, String>) -> AdminResult<()>;
    /// Removes every entry, not only the four session keys.
    fn clear(&self) -> AdminResult<()>;
}

/// JSON file on disk; the terminal counterpart of browser local storage.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> AdminResult<BTreeMap<String, String>> {
        utils::load_json_map(&self.path)
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> AdminResult<()> {
        let mut merged = utils::load_json_map(&self.path)?;
        merged.extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        utils::save_json_map(&self.path, &merged)
    }

    fn clear(&self) -> AdminResult<()> {
        utils::remove_file_if_exists(&self.path)
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    entries: DashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> AdminResult<BTreeMap<String, String>> {
        Ok(self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect())
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> AdminResult<()> {
        for (k, v) in entries {
            self.entries.insert(k.clone(), v.clone());
        }
        Ok(())
    }

    fn clear(&self) -> AdminResult<()> {
        self.entries.clear();
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub email: String,
    pub id: String,
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

impl Session {
    /// `None` unless an access token is present.
    pub fn from_entries(entries: &BTreeMap<String, String>) -> Option<Self> {
        let token = entries.get(TOKEN_KEY).filter(|t| !t.is_empty())?;
        let field = |key: &str| entries.get(key).cloned().unwrap_or_default();
        Some(Self {
            access_token: token.clone(),
            refresh_token: field(REFRESH_TOKEN_KEY),
            email: field(EMAIL_KEY),
            id: field(ID_KEY),
        })
    }

    pub fn to_entries(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (TOKEN_KEY.to_string(), self.access_token.clone()),
            (REFRESH_TOKEN_KEY.to_string(), self.refresh_token.clone()),
            (EMAIL_KEY.to_string(), self.email.clone()),
            (ID_KEY.to_string(), self.id.clone()),
        ])
    }

    /// Reads `exp` from the access token without checking its signature; the
    /// backend stays the authority. Opaque tokens never count as expired.
    pub fn expires_at(&self) -> Option<i64> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<ExpiryClaim>(&self.access_token, &DecodingKey::from_secret(&[]), &validation)
            .ok()
            .and_then(|data| data.claims.exp)
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }
}

impl From<LoginGrant> for Session {
    fn from(grant: LoginGrant) -> Self {
        Self {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            email: grant.email,
            id: grant.id,
        }
    }
}

/// Shared, cheaply cloneable view of the current session.
#[derive(Clone)]
pub struct SessionHandle {
    store: Arc<dyn SessionStore>,
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionHandle {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            current: Arc::new(RwLock::new(None)),
        }
    }

    pub fn init(&self) -> AdminResult<Option<Session>> {
        let session = Session::from_entries(&self.store.load()?);
        match &session {
            Some(s) => tracing::debug!("restored session for {}", s.email),
            None => tracing::debug!("no stored session"),
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = session.clone();
        Ok(session)
    }

    pub fn set(&self, session: Session) -> AdminResult<()> {
        self.store.save(&session.to_entries())?;
        tracing::info!("signed in as {}", session.email);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        Ok(())
    }

    pub fn clear(&self) -> AdminResult<()> {
        // Drop the in-memory copy first so a storage failure still signs us out.
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.store.clear()?;
        tracing::info!("session cleared");
        Ok(())
    }

    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some_and(|s| !s.is_expired())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: i64,
    }

    fn jwt_expiring_at(exp: i64) -> String {
        encode(
            &Header::default(),
            &Claims { sub: "admin".into(), exp },
            &EncodingKey::from_secret(b"whatever-the-backend-uses"),
        )
        .unwrap()
    }

    fn session_with(token: String) -> Session {
        Session {
            access_token: token,
            refresh_token: "r1".into(),
            email: "admin@clinic.test".into(),
            id: "a1".into(),
        }
    }

    #[test]
    fn entries_without_token_are_not_a_session() {
        let mut entries = BTreeMap::new();
        entries.insert(EMAIL_KEY.to_string(), "admin@clinic.test".to_string());
        assert!(Session::from_entries(&entries).is_none());

        entries.insert(TOKEN_KEY.to_string(), String::new());
        assert!(Session::from_entries(&entries).is_none());
    }

    #[test]
    fn expiry_comes_from_the_token_claim() {
        let session = session_with(jwt_expiring_at(1_000));
        assert_eq!(session.expires_at(), Some(1_000));
        assert!(session.is_expired_at(1_000));
        assert!(!session.is_expired_at(999));
    }

    #[test]
    fn opaque_tokens_never_expire_locally() {
        let session = session_with("not-a-jwt".into());
        assert_eq!(session.expires_at(), None);
        assert!(!session.is_expired_at(i64::MAX));
    }

    #[test]
    fn handle_lifecycle_goes_through_the_store() {
        let store = Arc::new(MemorySessionStore::new());
        store
            .save(&BTreeMap::from([("theme".to_string(), "dark".to_string())]))
            .unwrap();
        let handle = SessionHandle::new(store.clone());
        assert_eq!(handle.init().unwrap(), None);

        handle.set(session_with("opaque".into())).unwrap();
        assert_eq!(store.len(), 5);
        assert_eq!(handle.access_token().as_deref(), Some("opaque"));

        let reopened = SessionHandle::new(store.clone());
        assert_eq!(reopened.init().unwrap().map(|s| s.id), Some("a1".to_string()));

        handle.clear().unwrap();
        assert!(store.is_empty());
        assert!(handle.current().is_none());
    }

    #[test]
    fn expired_session_is_not_authenticated() {
        let handle = SessionHandle::new(Arc::new(MemorySessionStore::new()));
        handle.set(session_with(jwt_expiring_at(1))).unwrap();
        assert!(handle.current().is_some());
        assert!(!handle.is_authenticated());
    }

    #[test]
    fn file_store_round_trips_and_clears() {
        let path = std::env::temp_dir().join(format!("admin-session-{}.json", std::process::id()));
        let store = FileSessionStore::new(&path);
        let session = session_with("opaque".into());

        store.save(&session.to_entries()).unwrap();
        assert_eq!(Session::from_entries(&store.load().unwrap()), Some(session));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
        store.clear().unwrap();
    }
}
