use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::CurrentUser;
use crate::modules::invoices::models::{
    CancelInvoiceRequest, CreateInvoiceRequest, InvoiceFilter, UpdateInvoiceRequest,
};
use crate::modules::invoices::services::InvoiceService;

/// List invoices, newest first
/// GET /api/invoices
pub async fn list_invoices(
    service: web::Data<Arc<InvoiceService>>,
    query: web::Query<InvoiceFilter>,
) -> Result<HttpResponse, AppError> {
    let page = service.list_invoices(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/invoices/{id}
pub async fn get_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.get_invoice(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(invoice))
}

/// Create and number a new invoice
/// POST /api/invoices
pub async fn create_invoice(
    service: web::Data<Arc<InvoiceService>>,
    current: CurrentUser,
    request: web::Json<CreateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice = service
        .create_invoice(request.into_inner(), &current.id)
        .await?;
    Ok(HttpResponse::Created().json(invoice))
}

/// PUT /api/invoices/{id}
pub async fn update_invoice(
    service: web::Data<Arc<InvoiceService>>,
    current: CurrentUser,
    path: web::Path<String>,
    request: web::Json<UpdateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice = service
        .update_invoice(&path.into_inner(), request.into_inner(), &current.id)
        .await?;
    Ok(HttpResponse::Ok().json(invoice))
}

/// POST /api/invoices/{id}/cancel
pub async fn cancel_invoice(
    service: web::Data<Arc<InvoiceService>>,
    current: CurrentUser,
    path: web::Path<String>,
    request: web::Json<CancelInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice = service
        .cancel_invoice(&path.into_inner(), &request.reason, &current.id)
        .await?;
    Ok(HttpResponse::Ok().json(invoice))
}

/// Submit to SUNAT; a rejection is still a 200 with sunatStatus set
/// POST /api/invoices/{id}/sunat
pub async fn send_to_sunat(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.send_to_sunat(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(invoice))
}

/// POST /api/invoices/{id}/pdf
pub async fn generate_pdf(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let pdf = service.generate_pdf(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(pdf))
}

/// GET /api/invoices/series/{series}
pub async fn by_series(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoices = service.by_series(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(invoices))
}

/// GET /api/invoices/stats
pub async fn dashboard_stats(
    service: web::Data<Arc<InvoiceService>>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.dashboard_stats().await?))
}

/// Configure invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invoices")
            .route("", web::get().to(list_invoices))
            .route("", web::post().to(create_invoice))
            .route("/stats", web::get().to(dashboard_stats))
            .route("/series/{series}", web::get().to(by_series))
            .route("/{id}", web::get().to(get_invoice))
            .route("/{id}", web::put().to(update_invoice))
            .route("/{id}/cancel", web::post().to(cancel_invoice))
            .route("/{id}/sunat", web::post().to(send_to_sunat))
            .route("/{id}/pdf", web::post().to(generate_pdf)),
    );
}
