use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::traits::Repository;
use crate::core::{AppError, Operation, Result, SimulatedLatency};
use crate::modules::auth::models::{
    LoginRequest, LoginResponse, RegisterRequest, Session, User, UserRole,
};
use crate::modules::auth::repositories::UserRepository;
use crate::modules::auth::services::password::{hash_password, verify_password};

const INVALID_CREDENTIALS: &str = "Credenciales inválidas";

/// Mock authentication: opaque tokens kept in memory, no signatures
pub struct AuthService {
    repo: Arc<UserRepository>,
    latency: SimulatedLatency,
    session_ttl: Duration,
}

/// Longest session lifetime, one year
pub const MAX_SESSION_TTL_HOURS: i64 = 8760;

impl AuthService {
    pub fn new(repo: Arc<UserRepository>, latency: SimulatedLatency, session_ttl_hours: i64) -> Self {
        Self {
            repo,
            latency,
            session_ttl: Duration::hours(session_ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS)),
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        self.latency.wait(Operation::Login).await;

        let user = self
            .repo
            .find_by_email(&request.email)
            .await
            .filter(|u| u.is_active)
            .ok_or_else(|| {
                warn!(email = %request.email, "Login with unknown email");
                AppError::unauthorized(INVALID_CREDENTIALS)
            })?;

        if !verify_password(&request.password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        self.repo.purge_expired(Utc::now()).await;
        info!(user_id = %user.id, name = %user.full_name(), "User logged in");
        Ok(self.open_session(user).await)
    }

    /// Creates a `user` account and logs it in
    pub async fn register(&self, request: RegisterRequest) -> Result<LoginResponse> {
        request.validate()?;
        self.latency.wait(Operation::Login).await;

        let password_hash = hash_password(&request.password)?;
        let now = Utc::now();
        let email = request.email.trim().to_lowercase();

        let user = self
            .repo
            .users
            .write(|users| {
                if users.iter().any(|u| u.email.eq_ignore_ascii_case(&email)) {
                    return Err(AppError::conflict("El usuario ya existe"));
                }
                Ok(users.insert(User {
                    id: String::new(),
                    email,
                    first_name: request.first_name.trim().to_string(),
                    last_name: request.last_name.trim().to_string(),
                    role: UserRole::User,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                    password_hash,
                }))
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(self.open_session(user).await)
    }

    pub async fn logout(&self, token: &str) -> Result<()> {
        self.latency.wait(Operation::Session).await;

        if let Some(session) = self.repo.remove_session(token).await {
            info!(user_id = %session.user_id, "User logged out");
        }
        Ok(())
    }

    /// Rotates both tokens of the session owning `refresh_token`
    pub async fn refresh(&self, refresh_token: &str) -> Result<LoginResponse> {
        self.latency.wait(Operation::Session).await;

        let session = self
            .repo
            .take_by_refresh(refresh_token)
            .await
            .ok_or_else(|| AppError::unauthorized("Token de actualización inválido"))?;

        let user = self
            .repo
            .users
            .find_by_id(&session.user_id)
            .await
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::unauthorized("Usuario no disponible"))?;

        Ok(self.open_session(user).await)
    }

    /// Resolves an access token to its user. Used by the auth middleware,
    /// so it does not simulate latency.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let session = self
            .repo
            .find_session(token)
            .await
            .ok_or_else(|| AppError::unauthorized("Token inválido"))?;

        if session.is_expired(Utc::now()) {
            return Err(AppError::unauthorized("Sesión expirada"));
        }

        self.repo
            .users
            .find_by_id(&session.user_id)
            .await
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::unauthorized("Usuario no disponible"))
    }

    async fn open_session(&self, user: User) -> LoginResponse {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            refresh_token: Uuid::new_v4().simple().to_string(),
            user_id: user.id.clone(),
            created_at: now,
            expires_at: now + self.session_ttl,
        };

        let response = LoginResponse {
            user,
            token: session.token.clone(),
            refresh_token: session.refresh_token.clone(),
            expires_at: session.expires_at,
        };
        self.repo.save_session(session).await;
        response
    }
}
