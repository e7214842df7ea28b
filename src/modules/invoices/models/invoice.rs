// Sales documents (factura, boleta, credit and debit notes).
//
// An invoice is identified to humans by series + number ("F001-00000001").
// Numbers are 8-digit zero-padded and increase per series. Totals always
// satisfy total = subtotal - discount + tax.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line_item::{CreateInvoiceItemRequest, InvoiceItem};
use crate::core::timezone::start_of_day;
use crate::core::{AppError, Currency, Entity, Result};
use chrono::Datelike;

pub const NUMBER_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    Boleta,
    Factura,
    NotaCredito,
    NotaDebito,
}

impl InvoiceType {
    /// Series each document type is numbered in
    pub fn series(&self) -> &'static str {
        match self {
            InvoiceType::Factura => "F001",
            InvoiceType::Boleta => "B001",
            InvoiceType::NotaCredito => "NC01",
            InvoiceType::NotaDebito => "ND01",
        }
    }

    /// Sales documents take goods out of stock; notes do not
    pub fn moves_stock(&self) -> bool {
        matches!(self, InvoiceType::Factura | InvoiceType::Boleta)
    }

    pub fn label(&self) -> &'static str {
        match self {
            InvoiceType::Boleta => "Boleta de venta",
            InvoiceType::Factura => "Factura",
            InvoiceType::NotaCredito => "Nota de crédito",
            InvoiceType::NotaDebito => "Nota de débito",
        }
    }
}

/// Invoice status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    #[default]
    Issued,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    /// draft → issued | cancelled, issued → paid | cancelled
    pub fn can_transition_to(&self, next: InvoiceStatus) -> bool {
        matches!(
            (self, next),
            (InvoiceStatus::Draft, InvoiceStatus::Issued)
                | (InvoiceStatus::Draft, InvoiceStatus::Cancelled)
                | (InvoiceStatus::Issued, InvoiceStatus::Paid)
                | (InvoiceStatus::Issued, InvoiceStatus::Cancelled)
        )
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Draft => write!(f, "draft"),
            InvoiceStatus::Issued => write!(f, "issued"),
            InvoiceStatus::Paid => write!(f, "paid"),
            InvoiceStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SunatStatus {
    Pending,
    Accepted,
    Rejected,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub series: String,
    pub number: String,
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,
    pub customer_id: String,
    pub user_id: String,
    pub issue_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub currency: Currency,
    pub exchange_rate: Decimal,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub status: InvoiceStatus,
    pub items: Vec<InvoiceItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunat_status: Option<SunatStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunat_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Whether the sale was posted to the kardex
    #[serde(skip)]
    pub stock_posted: bool,
}

impl Invoice {
    /// "F001-00000001"
    pub fn document_number(&self) -> String {
        format!("{}-{}", self.series, self.number)
    }

    pub fn number_value(&self) -> u64 {
        self.number.parse().unwrap_or(0)
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == InvoiceStatus::Cancelled
    }

    /// Checks total = subtotal - discount + tax
    pub fn totals_balance(&self) -> bool {
        self.total_amount == self.subtotal - self.discount_amount + self.tax_amount
    }

    /// Appends the cancellation reason to the notes
    pub fn annotate_cancellation(&mut self, reason: &str) {
        let previous = self.notes.take().unwrap_or_default();
        self.notes = Some(format!("{}\n\nANULADO: {}", previous, reason.trim()));
    }
}

impl Entity for Invoice {
    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

pub fn format_number(value: u64) -> String {
    format!("{:0width$}", value, width = NUMBER_WIDTH)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,
    pub customer_id: String,
    #[serde(default)]
    pub currency: Currency,
    pub exchange_rate: Option<Decimal>,
    pub items: Vec<CreateInvoiceItemRequest>,
    pub notes: Option<String>,
    /// `draft` or `issued` (default)
    pub status: Option<InvoiceStatus>,
}

impl CreateInvoiceRequest {
    pub fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(AppError::validation(
                "El comprobante debe tener al menos un ítem",
            ));
        }

        if let Some(status) = self.status {
            if !matches!(status, InvoiceStatus::Draft | InvoiceStatus::Issued) {
                return Err(AppError::validation(
                    "Un comprobante nuevo solo puede registrarse como borrador o emitido",
                ));
            }
        }

        if let Some(rate) = self.exchange_rate {
            if rate <= Decimal::ZERO {
                return Err(AppError::validation("El tipo de cambio debe ser mayor a 0"));
            }
        }

        if !self.currency.is_base() && self.exchange_rate.is_none() {
            return Err(AppError::validation(format!(
                "El tipo de cambio es obligatorio para comprobantes en {}",
                self.currency
            )));
        }

        for item in &self.items {
            item.validate_amounts(self.currency)?;
        }

        Ok(())
    }

    pub fn exchange_rate(&self) -> Decimal {
        match self.currency {
            Currency::PEN => Decimal::ONE,
            _ => self.exchange_rate.unwrap_or(Decimal::ONE),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceRequest {
    pub notes: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<InvoiceStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancelInvoiceRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilter {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub invoice_type: Option<InvoiceType>,
    pub status: Option<InvoiceStatus>,
    pub customer_id: Option<String>,
    /// Inclusive Lima calendar dates on issueDate
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl InvoiceFilter {
    pub fn matches(&self, invoice: &Invoice) -> bool {
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let hit = invoice.number.contains(&term)
                || invoice.series.to_lowercase().contains(&term)
                || invoice
                    .notes
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }

        if self.invoice_type.is_some_and(|t| t != invoice.invoice_type) {
            return false;
        }

        if self.status.is_some_and(|s| s != invoice.status) {
            return false;
        }

        if let Some(customer_id) = self.customer_id.as_deref().filter(|c| !c.is_empty()) {
            if invoice.customer_id != customer_id {
                return false;
            }
        }

        if let Some(from) = self.date_from {
            if invoice.issue_date < start_of_day(from.year(), from.month(), from.day()) {
                return false;
            }
        }

        if let Some(to) = self.date_to.and_then(|d| d.succ_opt()) {
            if invoice.issue_date >= start_of_day(to.year(), to.month(), to.day()) {
                return false;
            }
        }

        true
    }
}

/// Figures for the invoicing dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceStats {
    pub total_invoices: usize,
    pub total_amount: Decimal,
    pub pending_invoices: usize,
    pub paid_invoices: usize,
}

impl InvoiceStats {
    /// Counts every invoice; the amount excludes cancelled ones
    pub fn from_invoices(invoices: &[Invoice]) -> Self {
        Self {
            total_invoices: invoices.len(),
            total_amount: invoices
                .iter()
                .filter(|i| !i.is_cancelled())
                .map(|i| i.total_amount)
                .fold(Decimal::ZERO, Decimal::saturating_add),
            pending_invoices: invoices
                .iter()
                .filter(|i| i.status == InvoiceStatus::Issued)
                .count(),
            paid_invoices: invoices
                .iter()
                .filter(|i| i.status == InvoiceStatus::Paid)
                .count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfResponse {
    pub pdf_path: String,
}
