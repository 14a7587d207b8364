pub mod auth;
pub mod view;
