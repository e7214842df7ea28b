use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::core::{AppError, Operation, Result, SimulatedLatency};
use crate::modules::customers::CustomerService;
use crate::modules::invoices::InvoiceService;
use crate::modules::products::ProductService;
use crate::modules::reports::models::{
    CustomerReport, DashboardSummary, InventoryReport, SalesReport, SalesReportQuery,
};
use crate::modules::reports::services::aggregator::{self, DateRange};

/// Service for generating reports from the business stores.
///
/// Collections are fetched concurrently and handed to the pure builders in
/// `aggregator`; this service owns no data of its own.
pub struct ReportService {
    products: Arc<ProductService>,
    customers: Arc<CustomerService>,
    invoices: Arc<InvoiceService>,
    latency: SimulatedLatency,
}

impl ReportService {
    pub fn new(
        products: Arc<ProductService>,
        customers: Arc<CustomerService>,
        invoices: Arc<InvoiceService>,
        latency: SimulatedLatency,
    ) -> Self {
        Self {
            products,
            customers,
            invoices,
            latency,
        }
    }

    /// Sales between two inclusive dates; either bound may be omitted
    pub async fn sales_report(&self, query: SalesReportQuery) -> Result<SalesReport> {
        let range = DateRange::new(query.start_date, query.end_date);
        if !range.is_valid() {
            return Err(AppError::validation(
                "La fecha de inicio debe ser anterior o igual a la fecha de fin",
            ));
        }

        let (invoices, products, categories) = tokio::try_join!(
            self.invoices.all_invoices(),
            self.products.all_products(),
            self.products.list_categories(),
        )?;
        self.latency.wait(Operation::SalesReport).await;

        let report = aggregator::sales_report(&invoices, &products, &categories, &range, Utc::now());
        info!(
            start = ?range.start,
            end = ?range.end,
            invoices = report.total_invoices,
            total = %report.total_sales,
            "Sales report generated"
        );
        Ok(report)
    }

    pub async fn inventory_report(&self) -> Result<InventoryReport> {
        let (products, categories, invoices) = tokio::try_join!(
            self.products.all_products(),
            self.products.list_categories(),
            self.invoices.all_invoices(),
        )?;
        self.latency.wait(Operation::InventoryReport).await;

        let report = aggregator::inventory_report(&products, &categories, &invoices);
        info!(
            products = report.total_products,
            low_stock = report.low_stock_products,
            "Inventory report generated"
        );
        Ok(report)
    }

    pub async fn customer_report(&self) -> Result<CustomerReport> {
        let (customers, invoices) = tokio::try_join!(
            self.customers.all_customers(),
            self.invoices.all_invoices(),
        )?;
        self.latency.wait(Operation::CustomerReport).await;

        let report = aggregator::customer_report(&customers, &invoices, Utc::now());
        info!(customers = report.total_customers, "Customer report generated");
        Ok(report)
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary> {
        let (products, customers, invoices) = tokio::try_join!(
            self.products.all_products(),
            self.customers.all_customers(),
            self.invoices.all_invoices(),
        )?;

        Ok(aggregator::dashboard(&products, &customers, &invoices))
    }
}
