// Test application builders

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, App};

use negocio::config::MockConfig;
use negocio::middleware::{BearerAuth, RequestId};
use negocio::modules::auth::models::LoginRequest;
use negocio::modules::auth::{AuthService, UserRepository};
use negocio::AppServices;

use super::test_data::{ADMIN_EMAIL, DEMO_PASSWORD};

/// Seeded services with no artificial delay and a SUNAT that always accepts
pub fn seeded_services() -> AppServices {
    AppServices::seeded(&MockConfig::instant()).expect("seed data stores")
}

/// Same as `seeded_services`, with SUNAT rejecting every submission
pub fn rejecting_services() -> AppServices {
    let config = MockConfig {
        sunat_acceptance_rate: 0.0,
        ..MockConfig::instant()
    };
    AppServices::seeded(&config).expect("seed data stores")
}

/// Full middleware stack over the given services, as `main` assembles it
pub async fn init_app(
    services: AppServices,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl actix_web::body::MessageBody>, Error = actix_web::Error>
{
    let auth = services.auth.clone();
    test::init_service(
        App::new()
            .wrap(BearerAuth::new(auth))
            .wrap(RequestId)
            .configure(move |cfg| services.configure(cfg)),
    )
    .await
}

/// Logs in as the seeded admin and returns the bearer token
pub async fn admin_token(auth: &Arc<AuthService>) -> String {
    auth.login(LoginRequest {
        email: ADMIN_EMAIL.to_string(),
        password: DEMO_PASSWORD.to_string(),
    })
    .await
    .expect("admin login")
    .token
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Fresh user store, for auth tests that register accounts
pub fn seeded_users() -> Arc<UserRepository> {
    Arc::new(UserRepository::seeded().expect("seed users"))
}
