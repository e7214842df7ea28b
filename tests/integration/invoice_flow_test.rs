//! Integration tests for the invoicing flow
//!
//! Covers numbering per series, totals, stock posting through the kardex,
//! cancellation, SUNAT submission and the HTTP surface of `/api/invoices`.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{Duration, Utc};
use helpers::*;
use negocio::core::AppError;
use negocio::modules::invoices::models::{
    CreateInvoiceItemRequest, CreateInvoiceRequest, InvoiceFilter, InvoiceStatus, InvoiceType,
    SunatStatus, UpdateInvoiceRequest,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn request(invoice_type: InvoiceType, customer_id: &str, lines: &[(&str, u32)]) -> CreateInvoiceRequest {
    CreateInvoiceRequest {
        invoice_type,
        customer_id: customer_id.to_string(),
        currency: Default::default(),
        exchange_rate: None,
        items: lines
            .iter()
            .map(|(product_id, quantity)| CreateInvoiceItemRequest {
                product_id: product_id.to_string(),
                description: None,
                quantity: *quantity,
                unit_price: None,
                discount_amount: None,
            })
            .collect(),
        notes: Some("Venta de mostrador".to_string()),
        status: None,
    }
}

#[tokio::test]
async fn test_factura_is_numbered_priced_and_posted() {
    let services = seeded_services();

    let invoice = services
        .invoices
        .create_invoice(
            request(InvoiceType::Factura, RUC_CUSTOMER_ID, &[(LAPTOP_ID, 2), (MOUSE_ID, 1)]),
            "1",
        )
        .await
        .unwrap();

    assert_eq!(invoice.document_number(), "F001-00000002");
    assert_eq!(invoice.status, InvoiceStatus::Issued);
    assert_eq!(invoice.sunat_status, Some(SunatStatus::Pending));
    assert_eq!(invoice.subtotal, dec!(5045.00));
    assert_eq!(invoice.tax_amount, dec!(908.10));
    assert_eq!(invoice.total_amount, dec!(5953.10));
    assert!(invoice.totals_balance());

    let due = invoice.due_date.unwrap() - invoice.issue_date;
    assert_eq!(due, Duration::days(30));

    let laptop = services.products.find_product(LAPTOP_ID).await.unwrap();
    assert_eq!(laptop.stock, 13);
    let ledger = services.products.kardex(LAPTOP_ID).await.unwrap();
    assert_eq!(ledger[0].document_number, "F001-00000002");
    assert_kardex_chain(&ledger, laptop.stock);
}

#[tokio::test]
async fn test_boleta_has_no_due_date_and_its_own_series() {
    let services = seeded_services();

    let invoice = services
        .invoices
        .create_invoice(request(InvoiceType::Boleta, DNI_CUSTOMER_ID, &[(NOTEBOOK_ID, 3)]), "1")
        .await
        .unwrap();

    assert_eq!(invoice.document_number(), "B001-00000002");
    assert!(invoice.due_date.is_none());
    assert_eq!(invoice.items[0].unit_price, dec!(8.50));
}

#[tokio::test]
async fn test_notes_do_not_move_stock() {
    let services = seeded_services();

    let note = services
        .invoices
        .create_invoice(request(InvoiceType::NotaCredito, RUC_CUSTOMER_ID, &[(MOUSE_ID, 2)]), "1")
        .await
        .unwrap();

    assert_eq!(note.document_number(), "NC01-00000001");
    assert_eq!(services.products.find_product(MOUSE_ID).await.unwrap().stock, 3);
}

#[tokio::test]
async fn test_insufficient_stock_rejects_whole_invoice() {
    let services = seeded_services();

    let err = services
        .invoices
        .create_invoice(
            request(InvoiceType::Boleta, DNI_CUSTOMER_ID, &[(NOTEBOOK_ID, 5), (MOUSE_ID, 4)]),
            "1",
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(err.to_string().starts_with("Mouse Inalámbrico"));
    assert_eq!(services.products.find_product(NOTEBOOK_ID).await.unwrap().stock, 50);
    assert_eq!(services.invoices.all_invoices().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_inactive_customer_rejected() {
    let services = seeded_services();
    services.customers.delete_customer(DNI_CUSTOMER_ID).await.unwrap();

    let err = services
        .invoices
        .create_invoice(request(InvoiceType::Boleta, DNI_CUSTOMER_ID, &[(NOTEBOOK_ID, 1)]), "1")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Cliente no encontrado");
}

#[tokio::test]
async fn test_cancel_returns_stock_and_keeps_chain() {
    let services = seeded_services();
    let invoice = services
        .invoices
        .create_invoice(request(InvoiceType::Boleta, DNI_CUSTOMER_ID, &[(MOUSE_ID, 2)]), "1")
        .await
        .unwrap();
    assert_eq!(services.products.find_product(MOUSE_ID).await.unwrap().stock, 1);

    let cancelled = services
        .invoices
        .cancel_invoice(&invoice.id, "Cliente desistió", "1")
        .await
        .unwrap();

    assert_eq!(cancelled.status, InvoiceStatus::Cancelled);
    assert_eq!(
        cancelled.notes.as_deref(),
        Some("Venta de mostrador\n\nANULADO: Cliente desistió")
    );

    let mouse = services.products.find_product(MOUSE_ID).await.unwrap();
    assert_eq!(mouse.stock, 3);
    assert_kardex_chain(&services.products.kardex(MOUSE_ID).await.unwrap(), mouse.stock);

    let again = services.invoices.cancel_invoice(&invoice.id, "Otra vez", "1").await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_paid_invoice_cannot_be_cancelled() {
    let services = seeded_services();

    let invoice = services
        .invoices
        .create_invoice(request(InvoiceType::Boleta, DNI_CUSTOMER_ID, &[(NOTEBOOK_ID, 1)]), "1")
        .await
        .unwrap();
    services
        .invoices
        .update_invoice(
            &invoice.id,
            UpdateInvoiceRequest {
                status: Some(InvoiceStatus::Paid),
                ..Default::default()
            },
            "1",
        )
        .await
        .unwrap();

    let err = services
        .invoices
        .cancel_invoice(&invoice.id, "Error", "1")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "No se puede anular un comprobante pagado");

    let via_update = services
        .invoices
        .update_invoice(
            &invoice.id,
            UpdateInvoiceRequest {
                status: Some(InvoiceStatus::Cancelled),
                ..Default::default()
            },
            "1",
        )
        .await
        .unwrap_err();
    assert!(matches!(via_update, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_sunat_rejection_is_recorded() {
    let services = rejecting_services();

    let invoice = services.invoices.send_to_sunat("2").await.unwrap();
    assert_eq!(invoice.sunat_status, Some(SunatStatus::Rejected));
    assert!(invoice.xml_path.is_none());

    // A rejected invoice may be resubmitted
    assert!(services.invoices.send_to_sunat("2").await.is_ok());
}

#[tokio::test]
async fn test_cancelled_invoice_cannot_be_submitted() {
    let services = seeded_services();
    services.invoices.cancel_invoice("2", "Duplicado", "1").await.unwrap();

    let err = services.invoices.send_to_sunat("2").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_by_series_and_filters() {
    let services = seeded_services();
    for quantity in 1..=3 {
        services
            .invoices
            .create_invoice(request(InvoiceType::Boleta, DNI_CUSTOMER_ID, &[(NOTEBOOK_ID, quantity)]), "1")
            .await
            .unwrap();
    }

    let boletas = services.invoices.by_series("B001").await.unwrap();
    let numbers: Vec<&str> = boletas.iter().map(|i| i.number.as_str()).collect();
    assert_eq!(numbers, vec!["00000004", "00000003", "00000002", "00000001"]);

    let facturas = services
        .invoices
        .list_invoices(InvoiceFilter {
            invoice_type: Some(InvoiceType::Factura),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(facturas.total, 1);

    let today = services
        .invoices
        .list_invoices(InvoiceFilter {
            date_from: Some((Utc::now() - Duration::days(1)).date_naive()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(today.total, 3);
    assert!(today.data.windows(2).all(|w| w[0].issue_date >= w[1].issue_date));

    let by_customer = services
        .invoices
        .list_invoices(InvoiceFilter {
            customer_id: Some(RUC_CUSTOMER_ID.to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_customer.total, 1);

    let searched = services
        .invoices
        .list_invoices(InvoiceFilter {
            search: Some("frecuente".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(searched.data[0].id, "2");
}

#[tokio::test]
async fn test_concurrent_creation_keeps_numbers_unique() {
    let services = seeded_services();
    let invoices = services.invoices.clone();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let invoices = Arc::clone(&invoices);
        handles.push(tokio::spawn(async move {
            invoices
                .create_invoice(request(InvoiceType::Boleta, DNI_CUSTOMER_ID, &[(NOTEBOOK_ID, 1)]), "1")
                .await
                .unwrap()
                .number
        }));
    }

    let mut numbers = Vec::new();
    for handle in handles {
        numbers.push(handle.await.unwrap());
    }
    numbers.sort();
    numbers.dedup();
    assert_eq!(numbers.len(), 10);

    let notebook = services.products.find_product(NOTEBOOK_ID).await.unwrap();
    assert_eq!(notebook.stock, 40);
    assert_kardex_chain(&services.products.kardex(NOTEBOOK_ID).await.unwrap(), notebook.stock);
}

#[actix_web::test]
async fn test_invoice_http_flow() {
    let services = seeded_services();
    let token = admin_token(&services.auth).await;
    let app = init_app(services).await;

    let req = test::TestRequest::post()
        .uri("/api/invoices")
        .insert_header(bearer(&token))
        .set_json(TestDataFactory::factura_payload(NOTEBOOK_ID, 1, "100"))
        .to_request();
    let created = assert_json(test::call_service(&app, req).await, StatusCode::CREATED).await;

    assert_eq!(created["series"], "F001");
    assert_eq!(created["number"], "00000002");
    assert_eq!(created["type"], "factura");
    assert_eq!(created["status"], "issued");
    let id = created["id"].as_str().unwrap().to_string();

    let total: Decimal = serde_json::from_value(created["totalAmount"].clone()).unwrap();
    assert_eq!(total, dec!(118));

    let req = test::TestRequest::post()
        .uri(&format!("/api/invoices/{}/pdf", id))
        .insert_header(bearer(&token))
        .to_request();
    let pdf = assert_json(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(pdf["pdfPath"], "/pdf/F001-00000002.pdf");

    let req = test::TestRequest::post()
        .uri(&format!("/api/invoices/{}/cancel", id))
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({ "reason": "Prueba" }))
        .to_request();
    let cancelled = assert_json(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(cancelled["status"], "cancelled");

    let req = test::TestRequest::get()
        .uri("/api/invoices/stats")
        .insert_header(bearer(&token))
        .to_request();
    let stats = assert_json(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(stats["totalInvoices"], 3);
    assert_eq!(stats["pendingInvoices"], 1);
}

#[actix_web::test]
async fn test_factura_for_dni_customer_is_rejected_over_http() {
    let services = seeded_services();
    let token = admin_token(&services.auth).await;
    let app = init_app(services).await;

    let mut payload = TestDataFactory::factura_payload(NOTEBOOK_ID, 1, "10");
    payload["customerId"] = serde_json::json!(DNI_CUSTOMER_ID);

    let req = test::TestRequest::post()
        .uri("/api/invoices")
        .insert_header(bearer(&token))
        .set_json(payload)
        .to_request();
    assert_error(test::call_service(&app, req).await, StatusCode::BAD_REQUEST).await;
}
