// Test Data Factory
//
// JSON payloads for the HTTP suites. Values refer to the seeded catalog and
// customer registry.

use serde_json::{json, Value};
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@empresa.com";
pub const DEMO_PASSWORD: &str = "password123";

/// Seeded business customer holding a RUC
pub const RUC_CUSTOMER_ID: &str = "1";
/// Seeded individual customer holding a DNI
pub const DNI_CUSTOMER_ID: &str = "2";

pub const LAPTOP_ID: &str = "1";
pub const MOUSE_ID: &str = "2";
pub const NOTEBOOK_ID: &str = "3";

pub struct TestDataFactory;

impl TestDataFactory {
    /// Random 11-digit RUC starting with 20
    pub fn random_ruc() -> String {
        let digits: String = Uuid::new_v4()
            .as_u128()
            .to_string()
            .chars()
            .take(9)
            .collect();
        format!("20{:0>9}", digits)
    }

    /// Factura for the RUC customer with a single line
    pub fn factura_payload(product_id: &str, quantity: u32, unit_price: &str) -> Value {
        json!({
            "type": "factura",
            "customerId": RUC_CUSTOMER_ID,
            "currency": "PEN",
            "items": [
                {
                    "productId": product_id,
                    "quantity": quantity,
                    "unitPrice": unit_price
                }
            ]
        })
    }

    /// Boleta for the DNI customer priced from the catalog
    pub fn boleta_payload(product_id: &str, quantity: u32) -> Value {
        json!({
            "type": "boleta",
            "customerId": DNI_CUSTOMER_ID,
            "items": [
                { "productId": product_id, "quantity": quantity }
            ]
        })
    }

    pub fn business_customer_payload(ruc: &str) -> Value {
        json!({
            "type": "BUSINESS",
            "documentType": "RUC",
            "documentNumber": ruc,
            "businessName": "Distribuidora Andina S.A.C.",
            "email": "ventas@andina.pe",
            "city": "Trujillo"
        })
    }

    pub fn individual_customer_payload(dni: &str) -> Value {
        json!({
            "type": "INDIVIDUAL",
            "documentType": "DNI",
            "documentNumber": dni,
            "firstName": "Lucía",
            "lastName": "Quispe",
            "city": "Lima"
        })
    }
}
