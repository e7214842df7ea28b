// Reports module: sales, inventory, customer and dashboard aggregates

pub mod controllers;
pub mod models;
pub mod services;

pub use services::ReportService;
