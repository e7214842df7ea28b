use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::CurrentUser;
use crate::modules::auth::models::{LoginRequest, RefreshRequest, RegisterRequest};
use crate::modules::auth::services::AuthService;

/// POST /api/auth/login
pub async fn login(
    service: web::Data<Arc<AuthService>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = service.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/auth/register
pub async fn register(
    service: web::Data<Arc<AuthService>>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let response = service.register(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// POST /api/auth/refresh
pub async fn refresh(
    service: web::Data<Arc<AuthService>>,
    request: web::Json<RefreshRequest>,
) -> Result<HttpResponse, AppError> {
    let response = service.refresh(&request.refresh_token).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/auth/logout
pub async fn logout(
    service: web::Data<Arc<AuthService>>,
    current: CurrentUser,
) -> Result<HttpResponse, AppError> {
    service.logout(&current.token).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/auth/me
pub async fn me(current: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(current.user)
}

/// Configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/register", web::post().to(register))
            .route("/refresh", web::post().to(refresh))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me)),
    );
}
