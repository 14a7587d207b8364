//! Routes, side navigation and the session gate in front of them.

use std::fmt;

use crate::cache::QueryCache;
use crate::error::{AdminError, AdminResult};
use crate::session::SessionHandle;
use crate::AppContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Patients,
    Patient(String),
    Doctors,
    Doctor(String),
    Requests,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/auth/login".to_string(),
            Route::Dashboard => "/".to_string(),
            Route::Patients => "/patients".to_string(),
            Route::Patient(id) => format!("/patients/{}", id),
            Route::Doctors => "/doctors".to_string(),
            Route::Doctor(id) => format!("/doctors/{}", id),
            Route::Requests => "/requests".to_string(),
        }
    }

    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();
        match segments.as_slice() {
            [] => Some(Route::Dashboard),
            ["auth", "login"] => Some(Route::Login),
            ["patients"] => Some(Route::Patients),
            ["patients", id] if !id.is_empty() => Some(Route::Patient(id.to_string())),
            ["doctors"] => Some(Route::Doctors),
            ["doctors", id] if !id.is_empty() => Some(Route::Doctor(id.to_string())),
            ["requests"] => Some(Route::Requests),
            _ => None,
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
}

pub fn side_nav() -> Vec<NavItem> {
    vec![
        NavItem { label: "Dashboard", route: Route::Dashboard },
        NavItem { label: "Patients", route: Route::Patients },
        NavItem { label: "Doctors", route: Route::Doctors },
        NavItem { label: "Requests", route: Route::Requests },
    ]
}

/// Decides whether a protected view may render for the current session.
#[derive(Clone)]
pub struct AuthGate {
    session: SessionHandle,
    cache: QueryCache,
}

impl AuthGate {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            session: ctx.session.clone(),
            cache: ctx.cache.clone(),
        }
    }

    /// `route` itself when allowed, otherwise the login route. An expired token
    /// is cleared on the way.
    pub fn resolve(&self, route: Route) -> Route {
        if !route.is_protected() {
            return route;
        }
        match self.session.current() {
            Some(session) if !session.is_expired() => route,
            Some(_) => {
                tracing::info!("access token expired, signing out");
                if let Err(e) = self.sign_out() {
                    tracing::error!("failed to clear expired session: {}", e);
                }
                Route::Login
            }
            None => Route::Login,
        }
    }

    /// Wipes persisted session storage and every cached response.
    pub fn logout(&self) -> AdminResult<Route> {
        self.sign_out()?;
        Ok(Route::Login)
    }

    /// A 401 from any protected call ends the session.
    pub fn handle_error(&self, err: &AdminError) -> Option<Route> {
        if !err.is_unauthorized() {
            return None;
        }
        if let Err(e) = self.sign_out() {
            tracing::error!("failed to clear rejected session: {}", e);
        }
        Some(Route::Login)
    }

    /// Same as [`AuthGate::handle_error`] for failures a view swallowed into
    /// its render state.
    pub fn handle_failed_queries(&self) -> Option<Route> {
        let rejected = self.cache.failed_keys(AdminError::is_unauthorized);
        if rejected.is_empty() {
            return None;
        }
        tracing::info!("{} queries rejected as unauthorized, signing out", rejected.len());
        if let Err(e) = self.sign_out() {
            tracing::error!("failed to clear rejected session: {}", e);
        }
        Some(Route::Login)
    }

    fn sign_out(&self) -> AdminResult<()> {
        self.cache.clear();
        self.session.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip() {
        for route in [
            Route::Login,
            Route::Dashboard,
            Route::Patients,
            Route::Patient("p1".into()),
            Route::Doctors,
            Route::Doctor("d1".into()),
            Route::Requests,
        ] {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
        assert_eq!(Route::parse("/patients/"), Some(Route::Patients));
        assert_eq!(Route::parse("/billing"), None);
    }

    #[test]
    fn nav_lists_only_protected_routes() {
        assert!(side_nav().iter().all(|item| item.route.is_protected()));
    }
}
