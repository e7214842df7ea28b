pub mod auth_service;
pub mod password;

pub use auth_service::{AuthService, MAX_SESSION_TTL_HOURS};
