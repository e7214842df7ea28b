// Products module: catalog, categories and the kardex stock ledger

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Category, KardexEntry, Product};
pub use repositories::ProductRepository;
pub use services::{ProductService, StockLine};
