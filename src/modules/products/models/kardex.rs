//! Stock ledger rows. Entries are append-only; each one carries the running
//! balance left by the movement it records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Entity, Result, MAX_AMOUNT, MAX_QUANTITY};
use crate::modules::taxes::services::{checked_value, round2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Input,
    Output,
    /// Physical count: the quantity is the new absolute stock level
    Adjustment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDocument {
    Purchase,
    Sale,
    Adjustment,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KardexEntry {
    pub id: String,
    pub product_id: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: u32,
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
    pub balance_quantity: u32,
    pub balance_cost: Decimal,
    pub reference: String,
    pub document_type: MovementDocument,
    pub document_number: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for KardexEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Running position of one product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Balance {
    pub quantity: u32,
    pub cost: Decimal,
}

impl Balance {
    pub fn of(entry: &KardexEntry) -> Self {
        Self {
            quantity: entry.balance_quantity,
            cost: entry.balance_cost,
        }
    }

    /// Weighted average unit cost, or `fallback` when nothing is on hand
    pub fn average_cost(&self, fallback: Decimal) -> Decimal {
        if self.quantity == 0 {
            return fallback;
        }
        round2(self.cost / Decimal::from(self.quantity))
    }
}

/// A movement before it is priced against the running balance
#[derive(Debug, Clone)]
pub struct Movement {
    pub movement_type: MovementType,
    pub quantity: u32,
    /// Purchase cost for inputs; outputs and adjustments use the average cost
    pub unit_cost: Option<Decimal>,
    pub reference: String,
    pub document_type: MovementDocument,
    pub document_number: String,
}

/// Prices a movement against `previous` and returns the unsaved entry.
/// `fallback_cost` is the product cost used when the balance is empty.
pub fn next_entry(
    product_id: &str,
    previous: Balance,
    movement: &Movement,
    fallback_cost: Decimal,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<KardexEntry> {
    let average = previous.average_cost(fallback_cost);
    if movement.quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "La cantidad no puede superar {}",
            MAX_QUANTITY
        )));
    }

    let (unit_cost, moved, balance) = match movement.movement_type {
        MovementType::Input => {
            if movement.quantity == 0 {
                return Err(AppError::validation("La cantidad debe ser mayor a 0"));
            }
            let unit_cost = movement.unit_cost.unwrap_or(average);
            if unit_cost < Decimal::ZERO {
                return Err(AppError::validation("El costo unitario no puede ser negativo"));
            }
            if unit_cost > MAX_AMOUNT {
                return Err(AppError::validation("El costo unitario excede el máximo permitido"));
            }
            let quantity = previous.quantity.saturating_add(movement.quantity);
            if quantity > MAX_QUANTITY {
                return Err(AppError::validation(format!(
                    "El stock resultante no puede superar {}",
                    MAX_QUANTITY
                )));
            }
            let moved = round2(checked_value(movement.quantity, unit_cost)?);
            let cost = previous
                .cost
                .checked_add(moved)
                .ok_or_else(|| AppError::validation("Importe fuera de rango"))?;
            let balance = Balance { quantity, cost };
            (unit_cost, moved, balance)
        }
        MovementType::Output => {
            if movement.quantity == 0 {
                return Err(AppError::validation("La cantidad debe ser mayor a 0"));
            }
            if movement.quantity > previous.quantity {
                return Err(AppError::validation(format!(
                    "Stock insuficiente: disponible {}, solicitado {}",
                    previous.quantity, movement.quantity
                )));
            }
            let moved = round2(checked_value(movement.quantity, average)?);
            let quantity = previous.quantity - movement.quantity;
            let cost = if quantity == 0 {
                Decimal::ZERO
            } else {
                (previous.cost - moved).max(Decimal::ZERO)
            };
            (average, moved, Balance { quantity, cost })
        }
        MovementType::Adjustment => {
            let difference = previous.quantity.abs_diff(movement.quantity);
            let moved = round2(checked_value(difference, average)?);
            let balance = Balance {
                quantity: movement.quantity,
                cost: round2(checked_value(movement.quantity, average)?),
            };
            (average, moved, balance)
        }
    };

    Ok(KardexEntry {
        id: String::new(),
        product_id: product_id.to_string(),
        movement_type: movement.movement_type,
        quantity: movement.quantity,
        unit_cost,
        total_cost: moved,
        balance_quantity: balance.quantity,
        balance_cost: balance.cost,
        reference: movement.reference.clone(),
        document_type: movement.document_type,
        document_number: movement.document_number.clone(),
        user_id: user_id.to_string(),
        created_at: now,
    })
}

/// Body of `POST /api/products/{id}/movements`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMovementRequest {
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: u32,
    pub unit_cost: Option<Decimal>,
    #[serde(default)]
    pub reference: String,
    pub document_type: MovementDocument,
    #[serde(default)]
    pub document_number: String,
}

impl From<RegisterMovementRequest> for Movement {
    fn from(request: RegisterMovementRequest) -> Self {
        Movement {
            movement_type: request.movement_type,
            quantity: request.quantity,
            unit_cost: request.unit_cost,
            reference: request.reference,
            document_type: request.document_type,
            document_number: request.document_number,
        }
    }
}
