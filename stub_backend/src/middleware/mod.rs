pub mod auth_middleware;
pub mod hooks;
