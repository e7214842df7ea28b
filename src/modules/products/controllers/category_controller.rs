use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::products::models::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::modules::products::services::ProductService;

pub async fn list_categories(
    service: web::Data<Arc<ProductService>>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.list_categories().await?))
}

pub async fn category_tree(
    service: web::Data<Arc<ProductService>>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.category_tree().await?))
}

pub async fn get_category(
    service: web::Data<Arc<ProductService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.get_category(&path.into_inner()).await?))
}

pub async fn create_category(
    service: web::Data<Arc<ProductService>>,
    request: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let category = service.create_category(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(category))
}

pub async fn update_category(
    service: web::Data<Arc<ProductService>>,
    path: web::Path<String>,
    request: web::Json<UpdateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let category = service
        .update_category(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(category))
}

pub async fn delete_category(
    service: web::Data<Arc<ProductService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_category(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure category routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categories")
            .route("", web::get().to(list_categories))
            .route("", web::post().to(create_category))
            .route("/tree", web::get().to(category_tree))
            .route("/{id}", web::get().to(get_category))
            .route("/{id}", web::put().to(update_category))
            .route("/{id}", web::delete().to(delete_category)),
    );
}
