use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Entity, Result, SortOrder};

pub const DEFAULT_COUNTRY: &str = "Perú";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerType {
    Individual,
    Business,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Ruc,
    Dni,
    Passport,
    ForeignerId,
}

impl DocumentType {
    /// Peruvian identity document formats
    pub fn is_valid_number(&self, number: &str) -> bool {
        let len = number.chars().count();
        match self {
            DocumentType::Ruc => len == 11 && number.chars().all(|c| c.is_ascii_digit()),
            DocumentType::Dni => len == 8 && number.chars().all(|c| c.is_ascii_digit()),
            DocumentType::Passport => {
                (6..=12).contains(&len)
                    && number
                        .chars()
                        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            }
            DocumentType::ForeignerId => (5..=20).contains(&len),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Ruc => "RUC",
            DocumentType::Dni => "DNI",
            DocumentType::Passport => "Pasaporte",
            DocumentType::ForeignerId => "Carné de extranjería",
        }
    }
}

/// `validate_document(type, number) -> bool`
pub fn validate_document(document_type: DocumentType, number: &str) -> bool {
    document_type.is_valid_number(number)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub document_type: DocumentType,
    pub document_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Business name for companies, "first last" for individuals
    pub fn display_name(&self) -> String {
        match self.customer_type {
            CustomerType::Business => self.business_name.clone().unwrap_or_default(),
            CustomerType::Individual => format!(
                "{} {}",
                self.first_name.as_deref().unwrap_or_default(),
                self.last_name.as_deref().unwrap_or_default()
            )
            .trim()
            .to_string(),
        }
    }

    /// Checks document format and the fields required by the customer type
    pub fn validate(&self) -> Result<()> {
        if !self.document_type.is_valid_number(&self.document_number) {
            return Err(AppError::validation(format!(
                "Número de documento inválido para {}",
                self.document_type.label()
            )));
        }

        match self.customer_type {
            CustomerType::Business => {
                if is_blank(&self.business_name) {
                    return Err(AppError::validation(
                        "La razón social es obligatoria para empresas",
                    ));
                }
            }
            CustomerType::Individual => {
                if is_blank(&self.first_name) || is_blank(&self.last_name) {
                    return Err(AppError::validation(
                        "Nombres y apellidos son obligatorios para personas",
                    ));
                }
            }
        }

        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            if !email.contains('@') {
                return Err(AppError::validation("Correo electrónico inválido"));
            }
        }

        Ok(())
    }
}

/// Absent keeps the current value; an empty string clears it
fn merge_optional(update: Option<String>, current: &Option<String>) -> Option<String> {
    match update {
        Some(value) if value.trim().is_empty() => None,
        Some(value) => Some(value),
        None => current.clone(),
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or_default().is_empty()
}

impl Entity for Customer {
    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Create and update payload; on update only present fields are merged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    #[serde(rename = "type")]
    pub customer_type: Option<CustomerType>,
    pub document_type: Option<DocumentType>,
    pub document_number: Option<String>,
    pub business_name: Option<String>,
    pub trade_name: Option<String>,
    pub contact_person: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub is_active: Option<bool>,
}

impl CustomerInput {
    /// New customer with defaults: INDIVIDUAL, DNI, country "Perú", active
    pub fn into_customer(self, now: DateTime<Utc>) -> Result<Customer> {
        let customer = Customer {
            id: String::new(),
            customer_type: self.customer_type.unwrap_or(CustomerType::Individual),
            document_type: self.document_type.unwrap_or(DocumentType::Dni),
            document_number: self.document_number.unwrap_or_default().trim().to_string(),
            business_name: self.business_name,
            trade_name: self.trade_name,
            contact_person: self.contact_person,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            city: self.city,
            state: self.state,
            country: self
                .country
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            postal_code: self.postal_code,
            is_active: self.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        customer.validate()?;
        Ok(customer)
    }

    /// Merged copy of `current`; the stored record is replaced as a whole
    pub fn merge(self, current: &Customer, now: DateTime<Utc>) -> Result<Customer> {
        let merged = Customer {
            id: current.id.clone(),
            customer_type: self.customer_type.unwrap_or(current.customer_type),
            document_type: self.document_type.unwrap_or(current.document_type),
            document_number: self
                .document_number
                .map(|n| n.trim().to_string())
                .unwrap_or_else(|| current.document_number.clone()),
            business_name: merge_optional(self.business_name, &current.business_name),
            trade_name: merge_optional(self.trade_name, &current.trade_name),
            contact_person: merge_optional(self.contact_person, &current.contact_person),
            first_name: merge_optional(self.first_name, &current.first_name),
            last_name: merge_optional(self.last_name, &current.last_name),
            email: merge_optional(self.email, &current.email),
            phone: merge_optional(self.phone, &current.phone),
            address: merge_optional(self.address, &current.address),
            city: merge_optional(self.city, &current.city),
            state: merge_optional(self.state, &current.state),
            country: self.country.unwrap_or_else(|| current.country.clone()),
            postal_code: merge_optional(self.postal_code, &current.postal_code),
            is_active: self.is_active.unwrap_or(current.is_active),
            created_at: current.created_at,
            updated_at: now,
        };
        merged.validate()?;
        Ok(merged)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CustomerSortField {
    Name,
    DocumentNumber,
    Email,
    Phone,
    City,
    CreatedAt,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFilter {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub customer_type: Option<CustomerType>,
    pub document_type: Option<DocumentType>,
    pub is_active: Option<bool>,
    pub city: Option<String>,
    pub sort_by: Option<CustomerSortField>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl CustomerFilter {
    pub fn matches(&self, customer: &Customer) -> bool {
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let fields = [
                customer.first_name.as_deref(),
                customer.last_name.as_deref(),
                customer.business_name.as_deref(),
                Some(customer.document_number.as_str()),
                customer.email.as_deref(),
                customer.phone.as_deref(),
            ];
            let hit = fields
                .iter()
                .flatten()
                .any(|value| value.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }

        if self.customer_type.is_some_and(|t| t != customer.customer_type) {
            return false;
        }

        if self.document_type.is_some_and(|t| t != customer.document_type) {
            return false;
        }

        if self.is_active.is_some_and(|active| active != customer.is_active) {
            return false;
        }

        if let Some(city) = self.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            let city = city.to_lowercase();
            let matches_city = customer
                .city
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&city));
            if !matches_city {
                return false;
            }
        }

        true
    }

    /// Single-key string comparison, as the list screens sort
    pub fn sort(&self, customers: &mut [Customer]) {
        let Some(field) = self.sort_by else {
            return;
        };
        let order = self.sort_order.unwrap_or_default();

        customers.sort_by_cached_key(|c| sort_key(c, field));
        if order == SortOrder::Desc {
            customers.reverse();
        }
    }
}

fn sort_key(customer: &Customer, field: CustomerSortField) -> String {
    match field {
        CustomerSortField::Name => customer.display_name().to_lowercase(),
        CustomerSortField::DocumentNumber => customer.document_number.clone(),
        CustomerSortField::Email => customer.email.clone().unwrap_or_default().to_lowercase(),
        CustomerSortField::Phone => customer.phone.clone().unwrap_or_default(),
        CustomerSortField::City => customer.city.clone().unwrap_or_default().to_lowercase(),
        CustomerSortField::CreatedAt => customer.created_at.to_rfc3339(),
    }
}

/// Body of `POST /api/customers/validate-document`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateDocumentRequest {
    pub document_type: DocumentType,
    pub document_number: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateDocumentResponse {
    pub valid: bool,
}
