use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::error::AppError;

/// Peruvian general sales tax (IGV), 18%
pub const IGV_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Amounts derived for one invoice line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineAmounts {
    /// quantity × unit price
    pub gross: Decimal,
    pub discount: Decimal,
    /// gross − discount
    pub taxable: Decimal,
    pub tax: Decimal,
    /// taxable + tax
    pub total: Decimal,
}

/// Invoice-level sums of its lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl InvoiceTotals {
    /// Adds one line; the sums are left untouched if any of them overflows
    pub fn add(&mut self, line: &LineAmounts) -> Result<(), AppError> {
        let sum = |a: Decimal, b: Decimal| {
            a.checked_add(b)
                .ok_or_else(|| AppError::validation("Importe fuera de rango"))
        };
        *self = Self {
            subtotal: sum(self.subtotal, line.gross)?,
            discount: sum(self.discount, line.discount)?,
            tax: sum(self.tax, line.tax)?,
            total: sum(self.total, line.total)?,
        };
        Ok(())
    }
}
