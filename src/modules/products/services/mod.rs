pub mod product_service;

pub use product_service::{stock_batch, ProductService, StockLine};
