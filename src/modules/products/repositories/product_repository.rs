// In-memory catalog: products, categories and the kardex ledger.
//
// Stock levels and kardex rows must move together, so multi-row updates go
// through `InventoryTx`, which holds both write guards for its lifetime and
// performs every mutation synchronously.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::core::timezone::utc_date;
use crate::core::{AppError, InMemoryStore, Result, StoreGuard};
use crate::modules::products::models::{
    next_entry, Balance, Category, KardexEntry, Movement, MovementDocument, MovementType,
    Product, DEFAULT_UNIT,
};

/// Repository for the catalog collections
pub struct ProductRepository {
    pub products: InMemoryStore<Product>,
    pub categories: InMemoryStore<Category>,
    pub kardex: InMemoryStore<KardexEntry>,
}

impl ProductRepository {
    pub fn new(products: Vec<Product>, categories: Vec<Category>, kardex: Vec<KardexEntry>) -> Self {
        Self {
            products: InMemoryStore::new(products),
            categories: InMemoryStore::new(categories),
            kardex: InMemoryStore::new(kardex),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }

    /// Demo catalog: three categories, three products and their opening ledger
    pub fn seeded() -> Self {
        Self::new(seed_products(), seed_categories(), seed_kardex())
    }

    /// Locks products then kardex. Every caller takes them in this order;
    /// callers that also need categories lock them first.
    pub async fn begin(&self) -> InventoryTx<'_> {
        let products = self.products.lock().await;
        let kardex = self.kardex.lock().await;
        InventoryTx { products, kardex }
    }
}

/// Exclusive access to stock levels and the ledger
pub struct InventoryTx<'a> {
    pub products: StoreGuard<'a, Product>,
    pub kardex: StoreGuard<'a, KardexEntry>,
}

impl InventoryTx<'_> {
    /// Last recorded balance of a product
    pub fn balance_of(&self, product_id: &str) -> Balance {
        self.kardex
            .iter()
            .rev()
            .find(|entry| entry.product_id == product_id)
            .map(Balance::of)
            .unwrap_or_default()
    }

    pub fn apply(
        &mut self,
        product_id: &str,
        movement: &Movement,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<KardexEntry> {
        let mut entries = self.apply_batch(&[(product_id.to_string(), movement.clone())], user_id, now)?;
        entries
            .pop()
            .ok_or_else(|| AppError::internal("Movimiento de kardex no registrado"))
    }

    /// Applies every movement or none. All entries are priced first against
    /// provisional balances; nothing is written if any of them fails.
    pub fn apply_batch(
        &mut self,
        movements: &[(String, Movement)],
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<KardexEntry>> {
        let mut balances: HashMap<&str, Balance> = HashMap::new();
        let mut priced = Vec::with_capacity(movements.len());

        for (product_id, movement) in movements {
            let product = self
                .products
                .find(product_id)
                .ok_or_else(|| AppError::not_found("Producto no encontrado"))?;

            let previous = match balances.get(product_id.as_str()) {
                Some(balance) => *balance,
                None => self.balance_of(product_id),
            };

            let entry = next_entry(product_id, previous, movement, product.cost, user_id, now)
                .map_err(|err| match err {
                    AppError::Validation(msg) => {
                        AppError::Validation(format!("{}: {}", product.name, msg))
                    }
                    other => other,
                })?;

            balances.insert(product_id.as_str(), Balance::of(&entry));
            priced.push(entry);
        }

        let mut recorded = Vec::with_capacity(priced.len());
        for entry in priced {
            if let Some(product) = self.products.find_mut(&entry.product_id) {
                product.stock = entry.balance_quantity;
                product.updated_at = now;
            }
            recorded.push(self.kardex.insert(entry));
        }

        Ok(recorded)
    }
}

fn seed_categories() -> Vec<Category> {
    let created = utc_date(2024, 1, 1);
    [
        ("1", "Electrónicos", "Productos electrónicos y tecnológicos"),
        ("2", "Oficina", "Artículos de oficina y papelería"),
        ("3", "Hogar", "Productos para el hogar"),
    ]
    .into_iter()
    .map(|(id, name, description)| Category {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        parent_id: None,
        is_active: true,
        created_at: created,
        updated_at: created,
    })
    .collect()
}

fn seed_products() -> Vec<Product> {
    let created = utc_date(2024, 1, 1);
    let product = |id: &str,
                   code: &str,
                   name: &str,
                   description: &str,
                   category_id: &str,
                   price: Decimal,
                   cost: Decimal,
                   stock: (u32, u32, u32),
                   barcode: &str| Product {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category_id: category_id.to_string(),
        price,
        cost,
        stock: stock.0,
        min_stock: stock.1,
        max_stock: stock.2,
        unit: DEFAULT_UNIT.to_string(),
        barcode: Some(barcode.to_string()),
        is_active: true,
        created_at: created,
        updated_at: created,
    };

    vec![
        product(
            "1",
            "PROD001",
            "Laptop Dell Inspiron",
            "Laptop Dell Inspiron 15 3000, Intel Core i5, 8GB RAM, 256GB SSD",
            "1",
            Decimal::new(250000, 2),
            Decimal::new(200000, 2),
            (15, 5, 50),
            "7890123456789",
        ),
        product(
            "2",
            "PROD002",
            "Mouse Inalámbrico",
            "Mouse inalámbrico Logitech M220",
            "1",
            Decimal::new(4500, 2),
            Decimal::new(3000, 2),
            (3, 10, 100),
            "7890123456790",
        ),
        product(
            "3",
            "PROD003",
            "Cuaderno A4",
            "Cuaderno A4 rayado 100 hojas",
            "2",
            Decimal::new(850, 2),
            Decimal::new(500, 2),
            (50, 20, 200),
            "7890123456791",
        ),
    ]
}

fn seed_kardex() -> Vec<KardexEntry> {
    let entry = |id: &str,
                 product_id: &str,
                 movement_type: MovementType,
                 quantity: u32,
                 unit_cost: Decimal,
                 balance: (u32, Decimal),
                 reference: &str,
                 document: (MovementDocument, &str),
                 created_at: DateTime<Utc>| KardexEntry {
        id: id.to_string(),
        product_id: product_id.to_string(),
        movement_type,
        quantity,
        unit_cost,
        total_cost: Decimal::from(quantity) * unit_cost,
        balance_quantity: balance.0,
        balance_cost: balance.1,
        reference: reference.to_string(),
        document_type: document.0,
        document_number: document.1.to_string(),
        user_id: "1".to_string(),
        created_at,
    };

    let laptop_cost = Decimal::new(200000, 2);
    vec![
        entry(
            "1",
            "1",
            MovementType::Input,
            20,
            laptop_cost,
            (20, Decimal::new(4000000, 2)),
            "Compra inicial",
            (MovementDocument::Purchase, "COMP-001"),
            utc_date(2024, 1, 1),
        ),
        entry(
            "2",
            "1",
            MovementType::Output,
            5,
            laptop_cost,
            (15, Decimal::new(3000000, 2)),
            "Venta",
            (MovementDocument::Sale, "FAC-001"),
            utc_date(2024, 1, 2),
        ),
        entry(
            "3",
            "2",
            MovementType::Input,
            3,
            Decimal::new(3000, 2),
            (3, Decimal::new(9000, 2)),
            "Saldo inicial",
            (MovementDocument::Purchase, "SI-PROD002"),
            utc_date(2024, 1, 1),
        ),
        entry(
            "4",
            "3",
            MovementType::Input,
            50,
            Decimal::new(500, 2),
            (50, Decimal::new(25000, 2)),
            "Saldo inicial",
            (MovementDocument::Purchase, "SI-PROD003"),
            utc_date(2024, 1, 1),
        ),
    ]
}
