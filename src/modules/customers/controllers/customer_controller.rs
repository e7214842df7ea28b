use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::customers::models::{
    CustomerFilter, CustomerInput, ValidateDocumentRequest, ValidateDocumentResponse,
};
use crate::modules::customers::services::CustomerService;

/// GET /api/customers
pub async fn list_customers(
    service: web::Data<Arc<CustomerService>>,
    query: web::Query<CustomerFilter>,
) -> Result<HttpResponse, AppError> {
    let page = service.list_customers(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/customers/{id}
pub async fn get_customer(
    service: web::Data<Arc<CustomerService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let customer = service.get_customer(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(customer))
}

/// GET /api/customers/active
pub async fn active_customers(
    service: web::Data<Arc<CustomerService>>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.active_customers().await?))
}

/// GET /api/customers/by-document/{number}
pub async fn find_by_document(
    service: web::Data<Arc<CustomerService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let customer = service.find_by_document(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(customer))
}

/// POST /api/customers/validate-document
pub async fn validate_document(
    service: web::Data<Arc<CustomerService>>,
    request: web::Json<ValidateDocumentRequest>,
) -> HttpResponse {
    let valid = service
        .validate_document(request.document_type, &request.document_number)
        .await;
    HttpResponse::Ok().json(ValidateDocumentResponse { valid })
}

/// POST /api/customers
pub async fn create_customer(
    service: web::Data<Arc<CustomerService>>,
    request: web::Json<CustomerInput>,
) -> Result<HttpResponse, AppError> {
    let customer = service.create_customer(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(customer))
}

/// PUT /api/customers/{id}
pub async fn update_customer(
    service: web::Data<Arc<CustomerService>>,
    path: web::Path<String>,
    request: web::Json<CustomerInput>,
) -> Result<HttpResponse, AppError> {
    let customer = service
        .update_customer(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(customer))
}

/// DELETE /api/customers/{id} (soft delete)
pub async fn delete_customer(
    service: web::Data<Arc<CustomerService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_customer(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure customer routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::get().to(list_customers))
            .route("", web::post().to(create_customer))
            .route("/active", web::get().to(active_customers))
            .route("/by-document/{number}", web::get().to(find_by_document))
            .route("/validate-document", web::post().to(validate_document))
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}", web::put().to(update_customer))
            .route("/{id}", web::delete().to(delete_customer)),
    );
}
