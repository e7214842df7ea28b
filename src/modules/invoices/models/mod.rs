pub mod invoice;
pub mod line_item;

pub use invoice::{
    format_number, CancelInvoiceRequest, CreateInvoiceRequest, Invoice, InvoiceFilter,
    InvoiceStats, InvoiceStatus, InvoiceType, PdfResponse, SunatStatus, UpdateInvoiceRequest,
};
pub use line_item::{CreateInvoiceItemRequest, InvoiceItem};
