// One product line of a sales document. Amounts are fixed at creation and
// never recomputed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Currency, Result, MAX_QUANTITY};
use crate::modules::taxes::LineAmounts;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

impl InvoiceItem {
    pub fn from_amounts(
        product_id: String,
        description: String,
        quantity: u32,
        unit_price: Decimal,
        amounts: &LineAmounts,
    ) -> Self {
        Self {
            id: String::new(),
            invoice_id: String::new(),
            product_id,
            description,
            quantity,
            unit_price,
            discount_amount: amounts.discount,
            tax_amount: amounts.tax,
            total_amount: amounts.total,
        }
    }

    /// quantity × unit price, before discount
    pub fn gross_amount(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }

    /// Revenue net of discount and tax
    pub fn net_amount(&self) -> Decimal {
        self.gross_amount() - self.discount_amount
    }
}

/// Requested line; price defaults to the product's list price
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceItemRequest {
    pub product_id: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub unit_price: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
}

impl CreateInvoiceItemRequest {
    /// Scale and sign checks for the amounts supplied by the caller
    pub fn validate_amounts(&self, currency: Currency) -> Result<()> {
        if self.quantity == 0 {
            return Err(AppError::validation("La cantidad debe ser mayor a 0"));
        }
        if self.quantity > MAX_QUANTITY {
            return Err(AppError::validation(format!(
                "La cantidad no puede superar {}",
                MAX_QUANTITY
            )));
        }
        for amount in [self.unit_price, self.discount_amount].into_iter().flatten() {
            currency.validate_amount(amount).map_err(AppError::Validation)?;
        }
        Ok(())
    }
}
