pub mod category;
pub mod kardex;
pub mod product;

pub use category::{
    build_tree, creates_cycle, Category, CategoryNode, CreateCategoryRequest,
    UpdateCategoryRequest,
};
pub use kardex::{
    next_entry, Balance, KardexEntry, Movement, MovementDocument, MovementType,
    RegisterMovementRequest,
};
pub use product::{
    CreateProductRequest, Product, ProductFilter, ProductSortField, ProductWithCategory,
    UpdateProductRequest, DEFAULT_UNIT,
};
