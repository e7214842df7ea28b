// Assertion helpers for actix test responses

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

/// Asserts the status and returns the JSON body
pub async fn assert_json<B: MessageBody>(response: ServiceResponse<B>, expected: StatusCode) -> Value {
    let status = response.status();
    let body: Value = test::read_body_json(response).await;
    assert_eq!(status, expected, "unexpected status, body: {}", body);
    body
}

/// Asserts the error envelope `{"error": {"message", "code"}}`
pub async fn assert_error<B: MessageBody>(
    response: ServiceResponse<B>,
    expected: StatusCode,
) -> String {
    let body = assert_json(response, expected).await;
    assert_eq!(body["error"]["code"], expected.as_u16());
    body["error"]["message"]
        .as_str()
        .expect("error message")
        .to_string()
}

/// Checks the running balance of a product ledger given newest first, and
/// that the last balance equals the product's stock
pub fn assert_kardex_chain(entries: &[negocio::modules::products::models::KardexEntry], stock: u32) {
    use negocio::modules::products::models::MovementType;

    let mut previous = 0u32;
    for entry in entries.iter().rev() {
        let expected = match entry.movement_type {
            MovementType::Input => previous + entry.quantity,
            MovementType::Output => previous - entry.quantity,
            MovementType::Adjustment => entry.quantity,
        };
        assert_eq!(
            entry.balance_quantity, expected,
            "broken balance chain at kardex entry {}",
            entry.id
        );
        previous = entry.balance_quantity;
    }
    assert_eq!(previous, stock, "last kardex balance differs from stock");
}
