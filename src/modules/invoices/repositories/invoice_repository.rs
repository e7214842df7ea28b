// In-memory invoice book.
//
// Numbers are allocated from the invoices already in the book while the
// caller holds the write guard, so two concurrent creations can never take
// the same number in one series.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::core::sequence::IdSequence;
use crate::core::timezone::utc_date;
use crate::core::{Currency, InMemoryStore};
use crate::modules::invoices::models::{
    format_number, Invoice, InvoiceItem, InvoiceStatus, InvoiceType, SunatStatus,
};

pub struct InvoiceRepository {
    pub invoices: InMemoryStore<Invoice>,
    item_ids: IdSequence,
}

impl InvoiceRepository {
    pub fn new(invoices: Vec<Invoice>) -> Self {
        let item_ids = IdSequence::after(
            invoices
                .iter()
                .flat_map(|invoice| invoice.items.iter().map(|item| item.id.as_str())),
        );
        Self {
            invoices: InMemoryStore::new(invoices),
            item_ids,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// One paid factura and one issued boleta
    pub fn seeded() -> Self {
        Self::new(seed_invoices())
    }

    pub fn next_item_id(&self) -> String {
        self.item_ids.next_id()
    }
}

/// Next 8-digit number in `series`, one past the highest in use
pub fn next_number(invoices: &[Invoice], series: &str) -> String {
    let last = invoices
        .iter()
        .filter(|invoice| invoice.series == series)
        .map(Invoice::number_value)
        .max()
        .unwrap_or(0);
    format_number(last + 1)
}

fn seed_item(
    id: &str,
    invoice_id: &str,
    product_id: &str,
    description: &str,
    unit_price: Decimal,
    discount: Decimal,
    tax: Decimal,
) -> InvoiceItem {
    InvoiceItem {
        id: id.to_string(),
        invoice_id: invoice_id.to_string(),
        product_id: product_id.to_string(),
        description: description.to_string(),
        quantity: 1,
        unit_price,
        discount_amount: discount,
        tax_amount: tax,
        total_amount: unit_price - discount + tax,
    }
}

#[allow(clippy::too_many_arguments)]
fn seed_invoice(
    id: &str,
    invoice_type: InvoiceType,
    customer_id: &str,
    issued: DateTime<Utc>,
    due: Option<DateTime<Utc>>,
    status: InvoiceStatus,
    sunat_status: SunatStatus,
    items: Vec<InvoiceItem>,
    notes: &str,
    stock_posted: bool,
) -> Invoice {
    let subtotal: Decimal = items.iter().map(InvoiceItem::gross_amount).sum();
    let discount: Decimal = items.iter().map(|i| i.discount_amount).sum();
    let tax: Decimal = items.iter().map(|i| i.tax_amount).sum();

    Invoice {
        id: id.to_string(),
        series: invoice_type.series().to_string(),
        number: format_number(1),
        invoice_type,
        customer_id: customer_id.to_string(),
        user_id: "1".to_string(),
        issue_date: issued,
        due_date: due,
        currency: Currency::PEN,
        exchange_rate: Decimal::ONE,
        subtotal,
        tax_amount: tax,
        discount_amount: discount,
        total_amount: subtotal - discount + tax,
        status,
        items,
        notes: Some(notes.to_string()),
        sunat_status: Some(sunat_status),
        sunat_response: None,
        xml_path: None,
        pdf_path: None,
        created_at: issued,
        updated_at: issued,
        stock_posted,
    }
}

fn seed_invoices() -> Vec<Invoice> {
    let mut factura = seed_invoice(
        "1",
        InvoiceType::Factura,
        "1",
        utc_date(2024, 1, 15),
        Some(utc_date(2024, 2, 15)),
        InvoiceStatus::Paid,
        SunatStatus::Accepted,
        vec![seed_item(
            "1",
            "1",
            "1",
            "Laptop Dell Inspiron",
            Decimal::new(250000, 2),
            Decimal::ZERO,
            Decimal::new(45000, 2),
        )],
        "Venta realizada con descuento especial",
        true,
    );
    factura.sunat_response = Some("Comprobante aceptado por SUNAT".to_string());
    factura.xml_path = Some("/xml/F001-00000001.xml".to_string());

    // Predates the opening ledger, so cancelling it returns no stock
    let boleta = seed_invoice(
        "2",
        InvoiceType::Boleta,
        "2",
        utc_date(2024, 1, 16),
        None,
        InvoiceStatus::Issued,
        SunatStatus::Pending,
        vec![
            seed_item(
                "2",
                "2",
                "2",
                "Mouse Inalámbrico",
                Decimal::new(4500, 2),
                Decimal::ZERO,
                Decimal::new(810, 2),
            ),
            seed_item(
                "3",
                "2",
                "3",
                "Cuaderno A4",
                Decimal::new(850, 2),
                Decimal::new(500, 2),
                Decimal::new(63, 2),
            ),
        ],
        "Cliente frecuente - descuento aplicado",
        false,
    );

    vec![factura, boleta]
}
