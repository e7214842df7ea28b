pub mod tax;

pub use tax::{InvoiceTotals, LineAmounts, IGV_RATE};
