pub mod invoice_service;
pub mod sunat_gateway;

pub use invoice_service::{InvoiceService, MAX_DUE_DAYS};
pub use sunat_gateway::{SimulatedSunat, SunatGateway, SunatOutcome};
