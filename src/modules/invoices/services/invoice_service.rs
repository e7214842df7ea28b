use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::traits::Repository;
use crate::core::{paginate, AppError, Operation, PageRequest, Paginated, Result, SimulatedLatency};
use crate::modules::customers::{CustomerService, DocumentType};
use crate::modules::invoices::models::{
    CreateInvoiceRequest, Invoice, InvoiceFilter, InvoiceItem, InvoiceStats, InvoiceStatus,
    InvoiceType, PdfResponse, SunatStatus, UpdateInvoiceRequest,
};
use crate::modules::invoices::repositories::{next_number, InvoiceRepository};
use crate::modules::invoices::services::sunat_gateway::SunatGateway;
use crate::modules::products::models::MovementType;
use crate::modules::products::repositories::InventoryTx;
use crate::modules::products::services::{stock_batch, ProductService, StockLine};
use crate::modules::taxes::services::TaxCalculator;

/// Longest accepted payment term for facturas
pub const MAX_DUE_DAYS: i64 = 3650;

/// Service for invoicing: numbering, totals, lifecycle and SUNAT submission
pub struct InvoiceService {
    repo: Arc<InvoiceRepository>,
    customers: Arc<CustomerService>,
    products: Arc<ProductService>,
    sunat: Arc<dyn SunatGateway>,
    tax: TaxCalculator,
    latency: SimulatedLatency,
    due_days: i64,
}

impl InvoiceService {
    pub fn new(
        repo: Arc<InvoiceRepository>,
        customers: Arc<CustomerService>,
        products: Arc<ProductService>,
        sunat: Arc<dyn SunatGateway>,
        latency: SimulatedLatency,
        due_days: i64,
    ) -> Self {
        Self {
            repo,
            customers,
            products,
            sunat,
            tax: TaxCalculator::new(),
            latency,
            due_days: due_days.clamp(0, MAX_DUE_DAYS),
        }
    }

    /// Filtered invoices, newest issue date first
    pub async fn list_invoices(&self, filter: InvoiceFilter) -> Result<Paginated<Invoice>> {
        let page = PageRequest::from_parts(filter.page, filter.limit)?;
        self.latency.wait(Operation::List).await;

        let mut invoices: Vec<Invoice> = self
            .repo
            .invoices
            .read(|items| items.iter().filter(|i| filter.matches(i)).cloned().collect())
            .await;
        invoices.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));

        Ok(paginate(invoices, page))
    }

    pub async fn get_invoice(&self, id: &str) -> Result<Invoice> {
        self.latency.wait(Operation::Get).await;
        self.find_invoice(id)
            .await
            .ok_or_else(|| AppError::not_found("Comprobante no encontrado"))
    }

    /// Lookup without latency
    pub async fn find_invoice(&self, id: &str) -> Option<Invoice> {
        self.repo.invoices.find_by_id(id).await
    }

    pub async fn all_invoices(&self) -> Result<Vec<Invoice>> {
        self.latency.wait(Operation::List).await;
        Ok(self.repo.invoices.all().await)
    }

    /// Invoices of one series, highest number first
    pub async fn by_series(&self, series: &str) -> Result<Vec<Invoice>> {
        self.latency.wait(Operation::Get).await;

        let mut invoices: Vec<Invoice> = self
            .repo
            .invoices
            .read(|items| items.iter().filter(|i| i.series == series).cloned().collect())
            .await;
        invoices.sort_by_key(|i| std::cmp::Reverse(i.number_value()));
        Ok(invoices)
    }

    pub async fn dashboard_stats(&self) -> Result<InvoiceStats> {
        self.latency.wait(Operation::Get).await;
        Ok(self.repo.invoices.read(InvoiceStats::from_invoices).await)
    }

    /// Prices the lines, allocates the next number of the series and, for
    /// issued sales documents, posts the stock outputs. The invoice and its
    /// kardex rows are written together or not at all.
    pub async fn create_invoice(&self, request: CreateInvoiceRequest, user_id: &str) -> Result<Invoice> {
        request.validate()?;
        self.latency.wait(Operation::InvoiceCreate).await;

        let customer = self
            .customers
            .find_customer(&request.customer_id)
            .await
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::not_found("Cliente no encontrado"))?;

        if request.invoice_type == InvoiceType::Factura
            && customer.document_type != DocumentType::Ruc
        {
            return Err(AppError::validation(
                "Las facturas solo pueden emitirse a clientes con RUC",
            ));
        }

        let mut items = Vec::with_capacity(request.items.len());
        let mut lines = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let product = self
                .products
                .find_product(&line.product_id)
                .await
                .ok_or_else(|| AppError::not_found("Producto no encontrado"))?;
            if !product.is_active {
                return Err(AppError::validation(format!(
                    "El producto {} no está activo",
                    product.name
                )));
            }

            let unit_price = line.unit_price.unwrap_or(product.price);
            let discount = line.discount_amount.unwrap_or(Decimal::ZERO);
            let amounts = self.tax.line_amounts(line.quantity, unit_price, discount)?;

            let description = line
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| product.name.clone());

            let mut item =
                InvoiceItem::from_amounts(product.id, description, line.quantity, unit_price, &amounts);
            item.id = self.repo.next_item_id();
            items.push(item);
            lines.push(amounts);
        }
        let totals = self.tax.totals(&lines)?;

        let now = Utc::now();
        let status = request.status.unwrap_or(InvoiceStatus::Issued);
        let series = request.invoice_type.series();
        let due_date = (request.invoice_type == InvoiceType::Factura)
            .then(|| now + Duration::days(self.due_days));

        let mut invoices = self.repo.invoices.lock().await;
        let mut inventory = self.products.repository().begin().await;

        let mut invoice = Invoice {
            id: String::new(),
            series: series.to_string(),
            number: next_number(&invoices, series),
            invoice_type: request.invoice_type,
            customer_id: customer.id,
            user_id: user_id.to_string(),
            issue_date: now,
            due_date,
            currency: request.currency,
            exchange_rate: request.exchange_rate(),
            subtotal: totals.subtotal,
            tax_amount: totals.tax,
            discount_amount: totals.discount,
            total_amount: totals.total,
            status: InvoiceStatus::Draft,
            items,
            notes: request.notes.filter(|n| !n.trim().is_empty()),
            sunat_status: Some(SunatStatus::Pending),
            sunat_response: None,
            xml_path: None,
            pdf_path: None,
            created_at: now,
            updated_at: now,
            stock_posted: false,
        };

        if status == InvoiceStatus::Issued {
            transition(&mut invoice, InvoiceStatus::Issued, &mut inventory, user_id, now)?;
        }

        let mut created = invoices.insert(invoice);
        for item in created.items.iter_mut() {
            item.invoice_id = created.id.clone();
        }
        invoices.replace(created.clone());

        info!(
            invoice_id = %created.id,
            document = %created.document_number(),
            total = %created.total_amount,
            status = %created.status,
            "Invoice created"
        );
        Ok(created)
    }

    /// Updates notes, due date and status. Status changes follow the
    /// lifecycle and move stock the same way create and cancel do.
    pub async fn update_invoice(
        &self,
        id: &str,
        request: UpdateInvoiceRequest,
        user_id: &str,
    ) -> Result<Invoice> {
        self.latency.wait(Operation::Update).await;

        let mut invoices = self.repo.invoices.lock().await;
        let mut inventory = self.products.repository().begin().await;

        let mut invoice = invoices
            .find(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Comprobante no encontrado"))?;
        if invoice.is_cancelled() {
            return Err(AppError::conflict("No se puede modificar un comprobante anulado"));
        }

        let now = Utc::now();
        if let Some(next) = request.status.filter(|s| *s != invoice.status) {
            transition(&mut invoice, next, &mut inventory, user_id, now)?;
        }
        if let Some(notes) = request.notes {
            invoice.notes = Some(notes).filter(|n| !n.trim().is_empty());
        }
        if let Some(due_date) = request.due_date {
            invoice.due_date = Some(due_date);
        }
        invoice.updated_at = now;

        invoices.replace(invoice.clone());
        info!(invoice_id = %id, status = %invoice.status, "Invoice updated");
        Ok(invoice)
    }

    /// Soft delete: marks the invoice cancelled, records the reason and
    /// returns any stock the sale took
    pub async fn cancel_invoice(&self, id: &str, reason: &str, user_id: &str) -> Result<Invoice> {
        if reason.trim().is_empty() {
            return Err(AppError::validation("Debe indicar el motivo de la anulación"));
        }
        self.latency.wait(Operation::Delete).await;

        let mut invoices = self.repo.invoices.lock().await;
        let mut inventory = self.products.repository().begin().await;

        let mut invoice = invoices
            .find(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Comprobante no encontrado"))?;
        if invoice.is_cancelled() {
            return Err(AppError::conflict("El comprobante ya está anulado"));
        }

        let now = Utc::now();
        transition(&mut invoice, InvoiceStatus::Cancelled, &mut inventory, user_id, now)?;
        invoice.annotate_cancellation(reason);
        invoice.updated_at = now;

        invoices.replace(invoice.clone());
        info!(invoice_id = %id, document = %invoice.document_number(), "Invoice cancelled");
        Ok(invoice)
    }

    /// Submits the invoice to SUNAT and records the verdict
    pub async fn send_to_sunat(&self, id: &str) -> Result<Invoice> {
        let invoice = self
            .find_invoice(id)
            .await
            .ok_or_else(|| AppError::not_found("Comprobante no encontrado"))?;

        ensure_submittable(&invoice)?;

        let outcome = self.sunat.submit(&invoice).await;
        if !outcome.is_accepted() {
            warn!(
                document = %invoice.document_number(),
                gateway = self.sunat.name(),
                "SUNAT rejected invoice"
            );
        }

        self.repo
            .invoices
            .write(|invoices| {
                let stored = invoices
                    .find_mut(id)
                    .ok_or_else(|| AppError::not_found("Comprobante no encontrado"))?;
                // The invoice may have been cancelled or accepted while the
                // gateway call was in flight.
                ensure_submittable(stored)?;
                if outcome.is_accepted() {
                    stored.xml_path = Some(format!("/xml/{}.xml", stored.document_number()));
                }
                stored.sunat_status = Some(outcome.status);
                stored.sunat_response = Some(outcome.message.clone());
                stored.updated_at = Utc::now();
                Ok::<_, AppError>(stored.clone())
            })
            .await
    }

    /// Renders the printable document and stores its path on the invoice
    pub async fn generate_pdf(&self, id: &str) -> Result<PdfResponse> {
        self.latency.wait(Operation::PdfRender).await;

        let pdf_path = self
            .repo
            .invoices
            .write(|invoices| {
                let stored = invoices
                    .find_mut(id)
                    .ok_or_else(|| AppError::not_found("Comprobante no encontrado"))?;
                let path = format!("/pdf/{}.pdf", stored.document_number());
                stored.pdf_path = Some(path.clone());
                stored.updated_at = Utc::now();
                Ok::<_, AppError>(path)
            })
            .await?;

        Ok(PdfResponse { pdf_path })
    }
}

fn ensure_submittable(invoice: &Invoice) -> Result<()> {
    match invoice.status {
        InvoiceStatus::Cancelled => {
            return Err(AppError::validation(
                "No se puede enviar a SUNAT un comprobante anulado",
            ))
        }
        InvoiceStatus::Draft => {
            return Err(AppError::validation(
                "El comprobante debe estar emitido para enviarse a SUNAT",
            ))
        }
        _ => {}
    }
    if invoice.sunat_status == Some(SunatStatus::Accepted) {
        return Err(AppError::conflict("El comprobante ya fue aceptado por SUNAT"));
    }
    Ok(())
}

/// Moves `invoice` to `next`, posting or returning stock as needed.
/// Runs under the invoice and inventory guards, so it never awaits.
fn transition(
    invoice: &mut Invoice,
    next: InvoiceStatus,
    inventory: &mut InventoryTx<'_>,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    if invoice.status == InvoiceStatus::Paid && next == InvoiceStatus::Cancelled {
        return Err(AppError::conflict("No se puede anular un comprobante pagado"));
    }
    if !invoice.status.can_transition_to(next) {
        return Err(AppError::validation(format!(
            "No se puede pasar un comprobante de {} a {}",
            invoice.status, next
        )));
    }

    let document = invoice.document_number();
    match next {
        InvoiceStatus::Issued if invoice.invoice_type.moves_stock() => {
            let batch = stock_batch(&stock_lines(invoice), MovementType::Output, "Venta", &document);
            inventory.apply_batch(&batch, user_id, now)?;
            invoice.stock_posted = true;
        }
        InvoiceStatus::Cancelled if invoice.stock_posted => {
            let batch = stock_batch(&stock_lines(invoice), MovementType::Input, "Anulación", &document);
            inventory.apply_batch(&batch, user_id, now)?;
            invoice.stock_posted = false;
        }
        _ => {}
    }

    invoice.status = next;
    Ok(())
}

fn stock_lines(invoice: &Invoice) -> Vec<StockLine> {
    invoice
        .items
        .iter()
        .map(|item| StockLine {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
        })
        .collect()
}
