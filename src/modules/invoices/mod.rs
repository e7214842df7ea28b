// Invoices module: sales documents, numbering and SUNAT submission

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Invoice, InvoiceItem, InvoiceStatus, InvoiceType};
pub use repositories::InvoiceRepository;
pub use services::{InvoiceService, SimulatedSunat, SunatGateway};
