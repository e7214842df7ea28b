// Customers module: registry of individuals and businesses

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Customer, CustomerType, DocumentType};
pub use repositories::CustomerRepository;
pub use services::CustomerService;
