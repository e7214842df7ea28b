use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::CurrentUser;
use crate::modules::products::models::{
    CreateProductRequest, ProductFilter, RegisterMovementRequest, UpdateProductRequest,
};
use crate::modules::products::services::ProductService;

/// GET /api/products
pub async fn list_products(
    service: web::Data<Arc<ProductService>>,
    query: web::Query<ProductFilter>,
) -> Result<HttpResponse, AppError> {
    let page = service.list_products(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/products/{id}
pub async fn get_product(
    service: web::Data<Arc<ProductService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let product = service.get_product(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// POST /api/products
pub async fn create_product(
    service: web::Data<Arc<ProductService>>,
    current: CurrentUser,
    request: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let product = service
        .create_product(request.into_inner(), &current.id)
        .await?;
    Ok(HttpResponse::Created().json(product))
}

/// PUT /api/products/{id}
pub async fn update_product(
    service: web::Data<Arc<ProductService>>,
    current: CurrentUser,
    path: web::Path<String>,
    request: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let product = service
        .update_product(&path.into_inner(), request.into_inner(), &current.id)
        .await?;
    Ok(HttpResponse::Ok().json(product))
}

/// DELETE /api/products/{id}
pub async fn delete_product(
    service: web::Data<Arc<ProductService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_product(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/products/low-stock
pub async fn low_stock(service: web::Data<Arc<ProductService>>) -> Result<HttpResponse, AppError> {
    let products = service.low_stock_products().await?;
    Ok(HttpResponse::Ok().json(products))
}

/// GET /api/products/{id}/kardex
pub async fn kardex(
    service: web::Data<Arc<ProductService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let entries = service.kardex(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// POST /api/products/{id}/movements
pub async fn register_movement(
    service: web::Data<Arc<ProductService>>,
    current: CurrentUser,
    path: web::Path<String>,
    request: web::Json<RegisterMovementRequest>,
) -> Result<HttpResponse, AppError> {
    let entry = service
        .register_movement(&path.into_inner(), request.into_inner(), &current.id)
        .await?;
    Ok(HttpResponse::Created().json(entry))
}

/// Configure product routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(list_products))
            .route("", web::post().to(create_product))
            .route("/low-stock", web::get().to(low_stock))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(update_product))
            .route("/{id}", web::delete().to(delete_product))
            .route("/{id}/kardex", web::get().to(kardex))
            .route("/{id}/movements", web::post().to(register_movement)),
    );
}
