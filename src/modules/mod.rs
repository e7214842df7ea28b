pub mod auth;
pub mod customers;
pub mod health;
pub mod invoices;
pub mod products;
pub mod reports;
pub mod taxes;
