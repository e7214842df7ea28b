use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::core::traits::Repository;
use crate::core::{
    paginate, AppError, Operation, PageRequest, Paginated, Result, SimulatedLatency, StoreGuard,
};
use crate::modules::products::models::{
    build_tree, creates_cycle, next_entry, Balance, Category, CategoryNode, CreateCategoryRequest,
    CreateProductRequest, KardexEntry, Movement, MovementDocument, MovementType, Product,
    ProductFilter, ProductWithCategory, RegisterMovementRequest, UpdateCategoryRequest,
    UpdateProductRequest, DEFAULT_UNIT,
};
use crate::modules::products::repositories::ProductRepository;

/// One line of a sale or return, as posted by invoicing
#[derive(Debug, Clone)]
pub struct StockLine {
    pub product_id: String,
    pub quantity: u32,
}

/// Service for catalog, category and stock operations
pub struct ProductService {
    repo: Arc<ProductRepository>,
    latency: SimulatedLatency,
}

impl ProductService {
    pub fn new(repo: Arc<ProductRepository>, latency: SimulatedLatency) -> Self {
        Self { repo, latency }
    }

    pub fn repository(&self) -> &Arc<ProductRepository> {
        &self.repo
    }

    /// Filtered, sorted and paginated product list with categories embedded
    pub async fn list_products(&self, filter: ProductFilter) -> Result<Paginated<ProductWithCategory>> {
        let page = PageRequest::from_parts(filter.page, filter.limit)?;
        self.latency.wait(Operation::List).await;

        let mut products: Vec<Product> = self
            .repo
            .products
            .read(|items| items.iter().filter(|p| filter.matches(p)).cloned().collect())
            .await;
        filter.sort(&mut products);

        let categories = self.repo.categories.all().await;
        Ok(paginate(products, page).map(|product| with_category(product, &categories)))
    }

    pub async fn get_product(&self, id: &str) -> Result<ProductWithCategory> {
        self.latency.wait(Operation::Get).await;

        let product = self
            .repo
            .products
            .find_by_id(id)
            .await
            .ok_or_else(|| AppError::not_found("Producto no encontrado"))?;
        let categories = self.repo.categories.all().await;

        Ok(with_category(product, &categories))
    }

    /// Lookup without latency, for other services joining on productId
    pub async fn find_product(&self, id: &str) -> Option<Product> {
        self.repo.products.find_by_id(id).await
    }

    pub async fn all_products(&self) -> Result<Vec<Product>> {
        self.latency.wait(Operation::List).await;
        Ok(self.repo.products.all().await)
    }

    /// Creates the product; an initial stock is recorded as an opening input
    pub async fn create_product(&self, request: CreateProductRequest, user_id: &str) -> Result<Product> {
        request.validate()?;
        self.latency.wait(Operation::Create).await;

        let now = Utc::now();
        let code = request.code.trim().to_string();
        let opening = (request.stock > 0).then(|| Movement {
            movement_type: MovementType::Input,
            quantity: request.stock,
            unit_cost: Some(request.cost),
            reference: "Saldo inicial".to_string(),
            document_type: MovementDocument::Purchase,
            document_number: format!("SI-{}", code),
        });
        // Price the opening input before anything is written
        if let Some(opening) = &opening {
            next_entry("", Balance::default(), opening, request.cost, user_id, now)?;
        }

        let categories = self.repo.categories.lock().await;
        let mut tx = self.repo.begin().await;
        ensure_category(&categories, &request.category_id)?;

        if tx.products.iter().any(|p| p.code.eq_ignore_ascii_case(&code)) {
            return Err(AppError::conflict("Ya existe un producto con este código"));
        }

        let product = tx.products.insert(Product {
            id: String::new(),
            code,
            name: request.name.trim().to_string(),
            description: request.description,
            category_id: request.category_id,
            price: request.price,
            cost: request.cost,
            stock: 0,
            min_stock: request.min_stock,
            max_stock: request.max_stock,
            unit: request
                .unit
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            barcode: request.barcode,
            is_active: request.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        });

        if let Some(opening) = &opening {
            if let Err(err) = tx.apply(&product.id, opening, user_id, now) {
                tx.products.remove_by_id(&product.id);
                return Err(err);
            }
        }

        let created = tx
            .products
            .find(&product.id)
            .cloned()
            .ok_or_else(|| AppError::internal("Producto no registrado"))?;

        info!(product_id = %created.id, code = %created.code, stock = created.stock, "Product created");
        Ok(created)
    }

    /// Merges the update; a stock change is recorded as an adjustment
    pub async fn update_product(
        &self,
        id: &str,
        request: UpdateProductRequest,
        user_id: &str,
    ) -> Result<Product> {
        self.latency.wait(Operation::Update).await;

        let now = Utc::now();
        let categories = self.repo.categories.lock().await;
        let mut tx = self.repo.begin().await;
        if let Some(category_id) = &request.category_id {
            ensure_category(&categories, category_id)?;
        }

        let current = tx
            .products
            .find(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Producto no encontrado"))?;
        let merged = request.apply(&current, now)?;

        if merged.code != current.code
            && tx
                .products
                .iter()
                .any(|p| p.id != id && p.code.eq_ignore_ascii_case(&merged.code))
        {
            return Err(AppError::conflict("Ya existe un producto con este código"));
        }

        // Stock is owned by the ledger; the adjustment below sets it
        let target_stock = merged.stock;
        tx.products.replace(Product {
            stock: current.stock,
            ..merged
        });

        if target_stock != current.stock {
            let adjustment = Movement {
                movement_type: MovementType::Adjustment,
                quantity: target_stock,
                unit_cost: None,
                reference: "Ajuste de inventario".to_string(),
                document_type: MovementDocument::Adjustment,
                document_number: format!("AJ-{}", current.code),
            };
            if let Err(err) = tx.apply(id, &adjustment, user_id, now) {
                tx.products.replace(current);
                return Err(err);
            }
        }

        let updated = tx
            .products
            .find(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Producto no encontrado"))?;

        info!(product_id = %id, "Product updated");
        Ok(updated)
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.latency.wait(Operation::Delete).await;

        self.repo
            .products
            .remove(id)
            .await
            .ok_or_else(|| AppError::not_found("Producto no encontrado"))?;

        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Active products at or below their minimum stock
    pub async fn low_stock_products(&self) -> Result<Vec<Product>> {
        self.latency.wait(Operation::List).await;

        Ok(self
            .repo
            .products
            .read(|items| {
                items
                    .iter()
                    .filter(|p| p.is_active && p.is_low_stock())
                    .cloned()
                    .collect()
            })
            .await)
    }

    /// Ledger of a product, newest first
    pub async fn kardex(&self, product_id: &str) -> Result<Vec<KardexEntry>> {
        self.latency.wait(Operation::Get).await;

        if self.repo.products.find_by_id(product_id).await.is_none() {
            return Err(AppError::not_found("Producto no encontrado"));
        }

        Ok(self
            .repo
            .kardex
            .read(|entries| {
                entries
                    .iter()
                    .rev()
                    .filter(|e| e.product_id == product_id)
                    .cloned()
                    .collect()
            })
            .await)
    }

    pub async fn register_movement(
        &self,
        product_id: &str,
        request: RegisterMovementRequest,
        user_id: &str,
    ) -> Result<KardexEntry> {
        self.latency.wait(Operation::Create).await;

        let movement = Movement::from(request);
        let mut tx = self.repo.begin().await;
        let entry = tx.apply(product_id, &movement, user_id, Utc::now())?;

        info!(
            product_id = %product_id,
            movement = ?entry.movement_type,
            quantity = entry.quantity,
            balance = entry.balance_quantity,
            "Kardex movement registered"
        );
        Ok(entry)
    }

    /// Posts the outputs of a sale; either every line moves or none does
    pub async fn register_sale(
        &self,
        lines: &[StockLine],
        document_number: &str,
        user_id: &str,
    ) -> Result<Vec<KardexEntry>> {
        self.post_batch(lines, MovementType::Output, "Venta", document_number, user_id)
            .await
    }

    /// Returns the stock of a cancelled sale
    pub async fn register_return(
        &self,
        lines: &[StockLine],
        document_number: &str,
        user_id: &str,
    ) -> Result<Vec<KardexEntry>> {
        self.post_batch(lines, MovementType::Input, "Anulación", document_number, user_id)
            .await
    }

    async fn post_batch(
        &self,
        lines: &[StockLine],
        movement_type: MovementType,
        reference: &str,
        document_number: &str,
        user_id: &str,
    ) -> Result<Vec<KardexEntry>> {
        let mut tx = self.repo.begin().await;
        let batch = stock_batch(lines, movement_type, reference, document_number);

        let entries = tx.apply_batch(&batch, user_id, Utc::now()).inspect_err(|err| {
            warn!(document = %document_number, error = %err, "Stock batch rejected");
        })?;

        info!(document = %document_number, lines = entries.len(), "Stock batch posted");
        Ok(entries)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.latency.wait(Operation::Get).await;
        Ok(self.repo.categories.all().await)
    }

    pub async fn get_category(&self, id: &str) -> Result<Category> {
        self.latency.wait(Operation::Get).await;
        self.repo
            .categories
            .find_by_id(id)
            .await
            .ok_or_else(|| AppError::not_found("Categoría no encontrada"))
    }

    pub async fn category_tree(&self) -> Result<Vec<CategoryNode>> {
        self.latency.wait(Operation::Get).await;
        Ok(self.repo.categories.read(build_tree).await)
    }

    pub async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category> {
        request.validate()?;
        self.latency.wait(Operation::CategoryWrite).await;

        let now = Utc::now();
        let parent_id = request.parent_id.filter(|p| !p.is_empty());

        self.repo
            .categories
            .write(|categories| {
                if let Some(parent) = &parent_id {
                    if categories.find(parent).is_none() {
                        return Err(AppError::validation("La categoría padre no existe"));
                    }
                }

                Ok(categories.insert(Category {
                    id: String::new(),
                    name: request.name.trim().to_string(),
                    description: request.description,
                    parent_id,
                    is_active: request.is_active.unwrap_or(true),
                    created_at: now,
                    updated_at: now,
                }))
            })
            .await
    }

    pub async fn update_category(&self, id: &str, request: UpdateCategoryRequest) -> Result<Category> {
        self.latency.wait(Operation::CategoryWrite).await;
        let now = Utc::now();

        self.repo
            .categories
            .write(|categories| {
                let current = categories
                    .find(id)
                    .cloned()
                    .ok_or_else(|| AppError::not_found("Categoría no encontrada"))?;

                let parent_id = match request.parent_id {
                    Some(parent) if parent.is_empty() => None,
                    Some(parent) => {
                        if categories.find(&parent).is_none() {
                            return Err(AppError::validation("La categoría padre no existe"));
                        }
                        if creates_cycle(categories, id, &parent) {
                            return Err(AppError::validation(
                                "Una categoría no puede ser subcategoría de sí misma",
                            ));
                        }
                        Some(parent)
                    }
                    None => current.parent_id.clone(),
                };

                let name = request.name.unwrap_or(current.name);
                if name.trim().is_empty() {
                    return Err(AppError::validation("El nombre de la categoría es obligatorio"));
                }

                let updated = Category {
                    id: current.id,
                    name,
                    description: request.description.unwrap_or(current.description),
                    parent_id,
                    is_active: request.is_active.unwrap_or(current.is_active),
                    created_at: current.created_at,
                    updated_at: now,
                };
                categories
                    .replace(updated)
                    .ok_or_else(|| AppError::not_found("Categoría no encontrada"))
            })
            .await
    }

    /// Hard delete, refused while products or subcategories reference it
    pub async fn delete_category(&self, id: &str) -> Result<()> {
        self.latency.wait(Operation::Delete).await;

        let mut categories = self.repo.categories.lock().await;
        let products = self.repo.products.lock().await;

        if categories.find(id).is_none() {
            return Err(AppError::not_found("Categoría no encontrada"));
        }
        if products.iter().any(|p| p.category_id == id) {
            return Err(AppError::conflict(
                "No se puede eliminar una categoría que tiene productos asociados",
            ));
        }
        if categories.iter().any(|c| c.parent_id.as_deref() == Some(id)) {
            return Err(AppError::conflict(
                "No se puede eliminar una categoría que tiene subcategorías",
            ));
        }
        categories.remove_by_id(id);

        info!(category_id = %id, "Category deleted");
        Ok(())
    }
}

fn ensure_category(categories: &StoreGuard<'_, Category>, category_id: &str) -> Result<()> {
    match categories.find(category_id) {
        Some(_) => Ok(()),
        None => Err(AppError::validation("Categoría no encontrada")),
    }
}

fn with_category(product: Product, categories: &[Category]) -> ProductWithCategory {
    let category = categories
        .iter()
        .find(|c| c.id == product.category_id)
        .cloned();
    ProductWithCategory { product, category }
}

pub fn stock_batch(
    lines: &[StockLine],
    movement_type: MovementType,
    reference: &str,
    document_number: &str,
) -> Vec<(String, Movement)> {
    lines
        .iter()
        .map(|line| {
            (
                line.product_id.clone(),
                Movement {
                    movement_type,
                    quantity: line.quantity,
                    unit_cost: None,
                    reference: format!("{} {}", reference, document_number),
                    document_type: MovementDocument::Sale,
                    document_number: document_number.to_string(),
                },
            )
        })
        .collect()
}
