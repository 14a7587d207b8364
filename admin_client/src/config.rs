use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{AdminError, AdminResult};

pub const PATIENTS_PAGE_SIZE: u32 = 6;
pub const DOCTORS_PAGE_SIZE: u32 = 6;
pub const DASHBOARD_PAGE_SIZE: u32 = 6;
pub const REQUESTS_PAGE_SIZE: u32 = 5;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);
pub const LOGIN_REDIRECT_DELAY: Duration = Duration::from_millis(3000);

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Identity and doctor-verification service
    pub auth_base_url: Url,
    /// Operational data: patients, doctors, dashboard
    pub business_base_url: Url,
    pub session_file: PathBuf,
    /// `None` keeps cached entries fresh until a mutation invalidates them.
    pub stale_time: Option<Duration>,
}

impl ClientConfig {
    pub fn from_env() -> AdminResult<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let stale_time = match env::var("ADMIN_CACHE_STALE_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AdminError::Config(format!("ADMIN_CACHE_STALE_SECS is not a number: {}", raw))
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Self {
            auth_base_url: parse_base_url(&get_env_or_default("ADMIN_AUTH_BASE_URL", DEFAULT_BASE_URL))?,
            business_base_url: parse_base_url(&get_env_or_default(
                "ADMIN_BUSINESS_BASE_URL",
                DEFAULT_BASE_URL,
            ))?,
            session_file: PathBuf::from(get_env_or_default("ADMIN_SESSION_FILE", ".admin_session.json")),
            stale_time,
        })
    }

    /// Both services on one origin, as `stub_backend` serves them.
    pub fn single_origin(base_url: &str, session_file: impl Into<PathBuf>) -> AdminResult<Self> {
        let url = parse_base_url(base_url)?;
        Ok(Self {
            auth_base_url: url.clone(),
            business_base_url: url,
            session_file: session_file.into(),
            stale_time: None,
        })
    }
}

fn parse_base_url(raw: &str) -> AdminResult<Url> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(AdminError::Config(format!("not an http(s) base url: {}", raw)));
    }
    Ok(url)
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
