use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::reports::models::SalesReportQuery;
use crate::modules::reports::services::ReportService;

/// Sales report for an optional date range
/// GET /api/reports/sales?startDate=2024-01-01&endDate=2024-01-31
pub async fn sales_report(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<SalesReportQuery>,
) -> Result<HttpResponse, AppError> {
    let report = service.sales_report(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /api/reports/inventory
pub async fn inventory_report(
    service: web::Data<Arc<ReportService>>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.inventory_report().await?))
}

/// GET /api/reports/customers
pub async fn customer_report(
    service: web::Data<Arc<ReportService>>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.customer_report().await?))
}

/// GET /api/reports/dashboard
pub async fn dashboard(service: web::Data<Arc<ReportService>>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.dashboard().await?))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/sales", web::get().to(sales_report))
            .route("/inventory", web::get().to(inventory_report))
            .route("/customers", web::get().to(customer_report))
            .route("/dashboard", web::get().to(dashboard)),
    );
}
