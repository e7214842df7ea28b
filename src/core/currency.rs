use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest price, cost or discount accepted on input (1,000,000,000,000)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Largest quantity a line, a movement or a stock level may carry
pub const MAX_QUANTITY: u32 = 1_000_000;

/// Invoicing currencies accepted by SUNAT for this business
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Peruvian Sol (base currency)
    #[default]
    PEN,
    /// US Dollar
    USD,
}

impl Currency {
    /// Returns the decimal scale for this currency (both use cents)
    pub fn scale(&self) -> u32 {
        2
    }

    /// Rounds a decimal value to the appropriate scale for this currency
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp(self.scale())
    }

    /// Display symbol used on printed documents
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::PEN => "S/",
            Currency::USD => "$",
        }
    }

    /// Whether amounts in this currency are already in the base currency
    pub fn is_base(&self) -> bool {
        matches!(self, Currency::PEN)
    }

    /// Validates that a decimal value has the correct scale for this currency
    pub fn validate_amount(&self, amount: Decimal) -> Result<(), String> {
        if amount.scale() > self.scale() {
            return Err(format!(
                "Los montos en {} admiten como máximo {} decimales",
                self,
                self.scale()
            ));
        }

        if amount < Decimal::ZERO {
            return Err(format!("El monto en {} no puede ser negativo", self));
        }

        if amount > MAX_AMOUNT {
            return Err(format!("El monto en {} excede el máximo permitido", self));
        }

        Ok(())
    }

    /// Formats an amount for display with the correct decimal places
    pub fn format_amount(&self, amount: Decimal) -> String {
        format!(
            "{} {:.width$}",
            self.symbol(),
            self.round(amount),
            width = self.scale() as usize
        )
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::PEN => write!(f, "PEN"),
            Currency::USD => write!(f, "USD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PEN" => Ok(Currency::PEN),
            "USD" => Ok(Currency::USD),
            _ => Err(format!("Moneda inválida: {}", s)),
        }
    }
}
