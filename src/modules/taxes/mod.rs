pub mod models;
pub mod services;

pub use models::{InvoiceTotals, LineAmounts, IGV_RATE};
pub use services::TaxCalculator;
