pub mod customer;

pub use customer::{
    validate_document, Customer, CustomerFilter, CustomerInput, CustomerSortField, CustomerType,
    DocumentType, ValidateDocumentRequest, ValidateDocumentResponse, DEFAULT_COUNTRY,
};
