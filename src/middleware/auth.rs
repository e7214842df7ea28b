use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;

use crate::core::AppError;
use crate::modules::auth::models::{User, UserRole};
use crate::modules::auth::services::AuthService;

/// Routes reachable without a bearer token
const PUBLIC_PATHS: [&str; 3] = ["/api/auth/login", "/api/auth/register", "/api/auth/refresh"];

/// Bearer token authentication for everything under `/api`
pub struct BearerAuth {
    auth: Arc<AuthService>,
}

impl BearerAuth {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service: Rc::new(service),
            auth: self.auth.clone(),
        }))
    }
}

pub struct BearerAuthMiddleware<S> {
    service: Rc<S>,
    auth: Arc<AuthService>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let auth = self.auth.clone();

        Box::pin(async move {
            if !requires_token(req.path()) {
                return svc.call(req).await.map(ServiceResponse::map_into_left_body);
            }

            match authorize(&auth, &req).await {
                Ok(current) => {
                    req.extensions_mut().insert(current);
                    svc.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                Err(err) => {
                    tracing::debug!(path = %req.path(), error = %err, "Unauthorized request");
                    Ok(req.error_response(err).map_into_right_body())
                }
            }
        })
    }
}

async fn authorize(auth: &AuthService, req: &ServiceRequest) -> Result<CurrentUser, AppError> {
    let token =
        bearer_token(req).ok_or_else(|| AppError::unauthorized("Token de acceso requerido"))?;
    let user = auth.authenticate(&token).await?;

    Ok(CurrentUser {
        id: user.id.clone(),
        email: user.email.clone(),
        role: user.role,
        token,
        user,
    })
}

fn requires_token(path: &str) -> bool {
    path.starts_with("/api/") && !PUBLIC_PATHS.contains(&path.trim_end_matches('/'))
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// The authenticated caller, placed in request extensions by `BearerAuth`
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub token: String,
    pub user: User,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CurrentUser>()
                .cloned()
                .ok_or_else(|| AppError::unauthorized("Token de acceso requerido")),
        )
    }
}
