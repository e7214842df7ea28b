//! Negocio back office library
//!
//! In-memory catalog, customer registry, invoicing and reporting for a small
//! Peruvian business, exposed over a JSON HTTP API.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;
pub mod startup;

// Re-export commonly used types
pub use modules::customers;
pub use modules::invoices;
pub use modules::products;
pub use modules::reports;
pub use modules::taxes;
pub use startup::AppServices;
