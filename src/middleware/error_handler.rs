use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, Error, HttpMessage, HttpRequest,
};

use crate::core::AppError;
use crate::middleware::request_id::RequestIdValue;

/// Maps body deserialization failures onto the standard error envelope
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    log_error(req, &err);
    AppError::validation(format!("Cuerpo JSON inválido: {}", err)).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    log_error(req, &err);
    AppError::validation(format!("Parámetros de consulta inválidos: {}", err)).into()
}

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> Error {
    log_error(req, &err);
    AppError::validation(format!("Ruta inválida: {}", err)).into()
}

pub fn log_error(req: &HttpRequest, err: &dyn std::fmt::Display) {
    let request_id = req
        .extensions()
        .get::<RequestIdValue>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    tracing::warn!(
        request_id = %request_id,
        method = %req.method(),
        path = %req.path(),
        error = %err,
        "Rejected request payload"
    );
}

/// Extractor configuration shared by the app and the HTTP tests
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}
