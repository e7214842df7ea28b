pub mod tax_calculator;

pub use tax_calculator::{checked_value, round2, TaxCalculator};
