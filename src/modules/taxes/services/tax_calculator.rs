use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::error::AppError;
use crate::modules::taxes::models::{InvoiceTotals, LineAmounts, IGV_RATE};

/// TaxCalculator handles per-line IGV calculations
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator {
    rate: Decimal,
}

impl TaxCalculator {
    pub fn new() -> Self {
        Self { rate: IGV_RATE }
    }

    pub fn with_rate(rate: Decimal) -> Result<Self, AppError> {
        Self::validate_tax_rate(rate)?;
        Ok(Self { rate })
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Tax on a taxable base, rounded half away from zero to cents
    pub fn calculate_tax(&self, taxable: Decimal) -> Result<Decimal, AppError> {
        taxable
            .checked_mul(self.rate)
            .map(round2)
            .ok_or_else(out_of_range)
    }

    /// Validate tax rate is within acceptable range (0-1.0) with max 4 decimal places
    pub fn validate_tax_rate(tax_rate: Decimal) -> Result<(), AppError> {
        if tax_rate < Decimal::ZERO {
            return Err(AppError::validation("La tasa de impuesto no puede ser negativa"));
        }

        if tax_rate > Decimal::ONE {
            return Err(AppError::validation("La tasa de impuesto no puede exceder 1.0"));
        }

        if tax_rate.normalize().scale() > 4 {
            return Err(AppError::validation(
                "La tasa de impuesto admite como máximo 4 decimales",
            ));
        }

        Ok(())
    }

    /// taxable = quantity × unit price − discount; tax = round2(taxable × rate)
    pub fn line_amounts(
        &self,
        quantity: u32,
        unit_price: Decimal,
        discount: Decimal,
    ) -> Result<LineAmounts, AppError> {
        if quantity == 0 {
            return Err(AppError::validation("La cantidad debe ser mayor a 0"));
        }
        if unit_price < Decimal::ZERO {
            return Err(AppError::validation("El precio unitario no puede ser negativo"));
        }

        let gross = checked_value(quantity, unit_price)?;
        if discount < Decimal::ZERO || discount > gross {
            return Err(AppError::validation(
                "El descuento debe estar entre 0 y el importe de la línea",
            ));
        }

        let taxable = gross - discount;
        let tax = self.calculate_tax(taxable)?;
        let total = taxable.checked_add(tax).ok_or_else(out_of_range)?;

        Ok(LineAmounts {
            gross,
            discount,
            taxable,
            tax,
            total,
        })
    }

    pub fn totals<'a>(
        &self,
        lines: impl IntoIterator<Item = &'a LineAmounts>,
    ) -> Result<InvoiceTotals, AppError> {
        lines
            .into_iter()
            .try_fold(InvoiceTotals::default(), |mut acc, line| {
                acc.add(line)?;
                Ok(acc)
            })
    }
}

impl Default for TaxCalculator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// quantity × unit amount, or a validation error when the product does not fit
pub fn checked_value(quantity: u32, unit: Decimal) -> Result<Decimal, AppError> {
    Decimal::from(quantity)
        .checked_mul(unit)
        .ok_or_else(out_of_range)
}

fn out_of_range() -> AppError {
    AppError::validation("Importe fuera de rango")
}
