use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::Category;
use crate::core::{AppError, Entity, Result, SortOrder, MAX_AMOUNT, MAX_QUANTITY};

pub const DEFAULT_UNIT: &str = "UND";

/// Catalog item with its current stock level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: String,
    pub category_id: String,
    pub price: Decimal,
    pub cost: Decimal,
    pub stock: u32,
    pub min_stock: u32,
    pub max_stock: u32,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Low stock means at or below the configured minimum
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Inventory value at cost
    pub fn stock_value(&self) -> Decimal {
        Decimal::from(self.stock).saturating_mul(self.cost)
    }

    /// Fill ratio against `maxStock`; `None` when no maximum is configured
    pub fn fill_ratio(&self) -> Option<Decimal> {
        if self.max_stock == 0 {
            return None;
        }
        Some(Decimal::from(self.stock) / Decimal::from(self.max_stock))
    }

    /// Overstocked: more than 80% of the configured maximum
    pub fn is_slow_moving(&self) -> bool {
        self.fill_ratio()
            .is_some_and(|ratio| ratio > Decimal::new(8, 1))
    }
}

impl Entity for Product {
    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Product as returned by the API, with its category embedded
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category_id: String,
    pub price: Decimal,
    pub cost: Decimal,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub min_stock: u32,
    #[serde(default)]
    pub max_stock: u32,
    pub unit: Option<String>,
    pub barcode: Option<String>,
    pub is_active: Option<bool>,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(AppError::validation("El código del producto es obligatorio"));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::validation("El nombre del producto es obligatorio"));
        }
        validate_prices(self.price, self.cost)?;
        validate_stock_bounds(self.stock, self.min_stock, self.max_stock)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub price: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub stock: Option<u32>,
    pub min_stock: Option<u32>,
    pub max_stock: Option<u32>,
    pub unit: Option<String>,
    pub barcode: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateProductRequest {
    /// Merges the present fields over `current`, returning a new record
    pub fn apply(&self, current: &Product, now: DateTime<Utc>) -> Result<Product> {
        let merged = Product {
            id: current.id.clone(),
            code: self.code.clone().unwrap_or_else(|| current.code.clone()),
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            category_id: self
                .category_id
                .clone()
                .unwrap_or_else(|| current.category_id.clone()),
            price: self.price.unwrap_or(current.price),
            cost: self.cost.unwrap_or(current.cost),
            stock: self.stock.unwrap_or(current.stock),
            min_stock: self.min_stock.unwrap_or(current.min_stock),
            max_stock: self.max_stock.unwrap_or(current.max_stock),
            unit: self.unit.clone().unwrap_or_else(|| current.unit.clone()),
            barcode: self.barcode.clone().or_else(|| current.barcode.clone()),
            is_active: self.is_active.unwrap_or(current.is_active),
            created_at: current.created_at,
            updated_at: now,
        };

        if merged.code.trim().is_empty() || merged.name.trim().is_empty() {
            return Err(AppError::validation(
                "El código y el nombre del producto son obligatorios",
            ));
        }
        validate_prices(merged.price, merged.cost)?;
        validate_stock_bounds(merged.stock, merged.min_stock, merged.max_stock)?;

        Ok(merged)
    }
}

fn validate_prices(price: Decimal, cost: Decimal) -> Result<()> {
    if price < Decimal::ZERO || cost < Decimal::ZERO {
        return Err(AppError::validation(
            "El precio y el costo no pueden ser negativos",
        ));
    }
    if price > MAX_AMOUNT || cost > MAX_AMOUNT {
        return Err(AppError::validation(
            "El precio y el costo exceden el máximo permitido",
        ));
    }
    Ok(())
}

fn validate_stock_bounds(stock: u32, min_stock: u32, max_stock: u32) -> Result<()> {
    if [stock, min_stock, max_stock].iter().any(|q| *q > MAX_QUANTITY) {
        return Err(AppError::validation(format!(
            "Las cantidades de stock no pueden superar {}",
            MAX_QUANTITY
        )));
    }
    if max_stock > 0 && min_stock > max_stock {
        return Err(AppError::validation(
            "El stock mínimo no puede superar al stock máximo",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductSortField {
    Code,
    #[default]
    Name,
    CreatedAt,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub is_active: Option<bool>,
    pub low_stock: Option<bool>,
    pub sort_by: Option<ProductSortField>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let hit = product.name.to_lowercase().contains(&term)
                || product.code.to_lowercase().contains(&term)
                || product.description.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }

        if let Some(category_id) = self.category_id.as_deref().filter(|c| !c.is_empty()) {
            if product.category_id != category_id {
                return false;
            }
        }

        if let Some(is_active) = self.is_active {
            if product.is_active != is_active {
                return false;
            }
        }

        if self.low_stock == Some(true) && !product.is_low_stock() {
            return false;
        }

        true
    }

    /// Sorts in place when a sort key was requested; otherwise keeps insertion order
    pub fn sort(&self, products: &mut [Product]) {
        let Some(field) = self.sort_by else {
            return;
        };
        let order = self.sort_order.unwrap_or_default();

        products.sort_by(|a, b| {
            let ordering = match field {
                ProductSortField::Code => a.code.cmp(&b.code),
                ProductSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                ProductSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            order.apply(ordering)
        });
    }
}
