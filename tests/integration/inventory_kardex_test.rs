//! Integration tests for stock control
//!
//! Every stock change goes through the kardex: the running balance of each
//! product must chain entry to entry and end at the product's stock.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::http::StatusCode;
use actix_web::test;
use helpers::*;
use negocio::core::AppError;
use negocio::products::models::{
    CreateProductRequest, MovementDocument, MovementType, RegisterMovementRequest,
    UpdateProductRequest,
};
use negocio::products::StockLine;
use rust_decimal_macros::dec;

fn movement(movement_type: MovementType, quantity: u32) -> RegisterMovementRequest {
    RegisterMovementRequest {
        movement_type,
        quantity,
        unit_cost: None,
        reference: "Prueba".to_string(),
        document_type: MovementDocument::Purchase,
        document_number: "GR-0001".to_string(),
    }
}

#[tokio::test]
async fn test_weighted_average_cost_chain() {
    let services = seeded_services();
    let products = &services.products;

    let purchase = products
        .register_movement(
            LAPTOP_ID,
            RegisterMovementRequest {
                unit_cost: Some(dec!(2300)),
                ..movement(MovementType::Input, 5)
            },
            "1",
        )
        .await
        .unwrap();
    assert_eq!(purchase.balance_quantity, 20);
    assert_eq!(purchase.balance_cost, dec!(41500));

    let sale = products
        .register_movement(
            LAPTOP_ID,
            RegisterMovementRequest {
                document_type: MovementDocument::Sale,
                ..movement(MovementType::Output, 4)
            },
            "1",
        )
        .await
        .unwrap();
    assert_eq!(sale.unit_cost, dec!(2075));
    assert_eq!(sale.total_cost, dec!(8300));
    assert_eq!(sale.balance_cost, dec!(33200));

    let laptop = products.find_product(LAPTOP_ID).await.unwrap();
    assert_eq!(laptop.stock, 16);
    assert_kardex_chain(&products.kardex(LAPTOP_ID).await.unwrap(), laptop.stock);
}

#[tokio::test]
async fn test_output_beyond_stock_is_rejected() {
    let services = seeded_services();
    let products = &services.products;

    let err = products
        .register_movement(MOUSE_ID, movement(MovementType::Output, 4), "1")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(err.to_string().contains("Stock insuficiente"));
    assert_eq!(products.kardex(MOUSE_ID).await.unwrap().len(), 1);
    assert_eq!(products.find_product(MOUSE_ID).await.unwrap().stock, 3);
}

#[tokio::test]
async fn test_zero_quantity_movement_is_rejected() {
    let services = seeded_services();

    let result = services
        .products
        .register_movement(NOTEBOOK_ID, movement(MovementType::Input, 0), "1")
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_stock_edit_becomes_adjustment() {
    let services = seeded_services();
    let products = &services.products;

    let updated = products
        .update_product(
            NOTEBOOK_ID,
            UpdateProductRequest {
                stock: Some(42),
                ..Default::default()
            },
            "1",
        )
        .await
        .unwrap();
    assert_eq!(updated.stock, 42);

    let ledger = products.kardex(NOTEBOOK_ID).await.unwrap();
    assert_eq!(ledger[0].movement_type, MovementType::Adjustment);
    assert_eq!(ledger[0].quantity, 42);
    assert_eq!(ledger[0].total_cost, dec!(40));
    assert_eq!(ledger[0].balance_cost, dec!(210));
    assert_kardex_chain(&ledger, updated.stock);

    // Editing other fields leaves the ledger alone
    products
        .update_product(
            NOTEBOOK_ID,
            UpdateProductRequest {
                price: Some(dec!(9.00)),
                ..Default::default()
            },
            "1",
        )
        .await
        .unwrap();
    assert_eq!(products.kardex(NOTEBOOK_ID).await.unwrap().len(), ledger.len());
}

#[tokio::test]
async fn test_new_product_opens_ledger() {
    let services = seeded_services();
    let products = &services.products;

    let created = products
        .create_product(
            CreateProductRequest {
                code: "PROD004".to_string(),
                name: "Teclado Mecánico".to_string(),
                description: String::new(),
                category_id: "1".to_string(),
                price: dec!(180),
                cost: dec!(120),
                stock: 12,
                min_stock: 4,
                max_stock: 40,
                unit: None,
                barcode: None,
                is_active: None,
            },
            "1",
        )
        .await
        .unwrap();

    assert_eq!(created.id, "4");
    assert_eq!(created.stock, 12);
    assert_eq!(created.unit, "UND");

    let ledger = products.kardex(&created.id).await.unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].document_number, "SI-PROD004");
    assert_eq!(ledger[0].balance_cost, dec!(1440));

    let duplicate = products
        .create_product(
            CreateProductRequest {
                code: "prod004".to_string(),
                name: "Otro".to_string(),
                description: String::new(),
                category_id: "1".to_string(),
                price: dec!(1),
                cost: dec!(1),
                stock: 0,
                min_stock: 0,
                max_stock: 0,
                unit: None,
                barcode: None,
                is_active: None,
            },
            "1",
        )
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_sale_batch_is_all_or_nothing() {
    let services = seeded_services();
    let products = &services.products;

    let lines = vec![
        StockLine {
            product_id: NOTEBOOK_ID.to_string(),
            quantity: 10,
        },
        StockLine {
            product_id: MOUSE_ID.to_string(),
            quantity: 5,
        },
    ];
    let result = products.register_sale(&lines, "B001-00000099", "1").await;
    assert!(result.is_err());
    assert_eq!(products.find_product(NOTEBOOK_ID).await.unwrap().stock, 50);

    let lines = &lines[..1];
    let posted = products.register_sale(lines, "B001-00000099", "1").await.unwrap();
    assert_eq!(posted[0].balance_quantity, 40);

    let returned = products.register_return(lines, "B001-00000099", "1").await.unwrap();
    assert_eq!(returned[0].balance_quantity, 50);
    assert_eq!(returned[0].reference, "Anulación B001-00000099");

    assert_kardex_chain(&products.kardex(NOTEBOOK_ID).await.unwrap(), 50);
}

#[tokio::test]
async fn test_low_stock_lists_only_active_products() {
    let services = seeded_services();
    let products = &services.products;

    let low = products.low_stock_products().await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].id, MOUSE_ID);

    products
        .update_product(
            MOUSE_ID,
            UpdateProductRequest {
                is_active: Some(false),
                ..Default::default()
            },
            "1",
        )
        .await
        .unwrap();
    assert!(products.low_stock_products().await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_movement_and_kardex_over_http() {
    let services = seeded_services();
    let token = admin_token(&services.auth).await;
    let app = init_app(services).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/products/{}/movements", MOUSE_ID))
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({
            "type": "input",
            "quantity": 20,
            "unitCost": "28.50",
            "reference": "Reposición",
            "documentType": "purchase",
            "documentNumber": "COMP-014"
        }))
        .to_request();
    let entry = assert_json(test::call_service(&app, req).await, StatusCode::CREATED).await;
    assert_eq!(entry["type"], "input");
    assert_eq!(entry["balanceQuantity"], 23);

    let req = test::TestRequest::get()
        .uri(&format!("/api/products/{}/kardex", MOUSE_ID))
        .insert_header(bearer(&token))
        .to_request();
    let ledger = assert_json(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(ledger.as_array().unwrap().len(), 2);
    assert_eq!(ledger[0]["documentNumber"], "COMP-014");

    let req = test::TestRequest::get()
        .uri("/api/products/low-stock")
        .insert_header(bearer(&token))
        .to_request();
    let low = assert_json(test::call_service(&app, req).await, StatusCode::OK).await;
    assert!(low.as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri("/api/products/99/kardex")
        .insert_header(bearer(&token))
        .to_request();
    let message = assert_error(test::call_service(&app, req).await, StatusCode::NOT_FOUND).await;
    assert_eq!(message, "Producto no encontrado");
}
