use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::core::timezone::utc_date;
use crate::core::{InMemoryStore, Result};
use crate::modules::auth::models::{Session, User, UserRole};
use crate::modules::auth::services::password::hash_password;

/// Password shared by the seeded demo accounts
pub const DEMO_PASSWORD: &str = "password123";

/// Users plus the session table, keyed by access token
pub struct UserRepository {
    pub users: InMemoryStore<User>,
    sessions: RwLock<HashMap<String, Session>>,
}

impl UserRepository {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: InMemoryStore::new(users),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Admin and regular demo accounts
    pub fn seeded() -> Result<Self> {
        let created = utc_date(2024, 1, 1);
        let hash = hash_password(DEMO_PASSWORD)?;

        let user = |id: &str, email: &str, first: &str, last: &str, role: UserRole| User {
            id: id.to_string(),
            email: email.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            role,
            is_active: true,
            created_at: created,
            updated_at: created,
            password_hash: hash.clone(),
        };

        Ok(Self::new(vec![
            user("1", "admin@empresa.com", "Juan", "Pérez", UserRole::Admin),
            user("2", "usuario@empresa.com", "María", "García", UserRole::User),
        ]))
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim();
        self.users
            .read(|users| {
                users
                    .iter()
                    .find(|u| u.email.eq_ignore_ascii_case(email))
                    .cloned()
            })
            .await
    }

    pub async fn save_session(&self, session: Session) {
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session);
    }

    pub async fn find_session(&self, token: &str) -> Option<Session> {
        self.sessions.read().await.get(token).cloned()
    }

    pub async fn remove_session(&self, token: &str) -> Option<Session> {
        self.sessions.write().await.remove(token)
    }

    /// Removes and returns the session owning `refresh_token`
    pub async fn take_by_refresh(&self, refresh_token: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let token = sessions
            .values()
            .find(|s| s.refresh_token == refresh_token)
            .map(|s| s.token.clone())?;
        sessions.remove(&token)
    }

    /// Drops every session that expired before `now`
    pub async fn purge_expired(&self, now: chrono::DateTime<chrono::Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        before - sessions.len()
    }
}
