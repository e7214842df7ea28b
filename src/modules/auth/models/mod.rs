pub mod user;

pub use user::{
    LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, Session, User, UserRole,
};
