pub mod invoice_repository;

pub use invoice_repository::{next_number, InvoiceRepository};
