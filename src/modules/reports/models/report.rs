use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::invoices::models::{Invoice, InvoiceStats};
use crate::modules::products::models::Product;

/// Sales over a date range with monthly, product and category breakdowns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub total_sales: Decimal,
    pub total_invoices: usize,
    /// totalSales / totalInvoices, 0 when there are no invoices
    pub average_ticket: Decimal,
    /// Twelve calendar months ending with the current one, oldest first
    pub sales_by_month: Vec<MonthlyData>,
    pub top_products: Vec<TopProduct>,
    pub sales_by_category: Vec<CategorySales>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyData {
    /// Short Spanish label, e.g. "ene"
    pub month: String,
    pub year: i32,
    pub value: Decimal,
    pub invoice_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub id: String,
    pub name: String,
    pub value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySales {
    pub category_name: String,
    pub sales: Decimal,
    /// Share of all category revenue, 0-100 with two decimals
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    pub total_products: usize,
    pub total_value: Decimal,
    pub low_stock_products: usize,
    pub low_stock_items: Vec<Product>,
    pub stock_by_category: Vec<CategoryStock>,
    pub top_selling_products: Vec<TopProduct>,
    pub slow_moving_products: Vec<TopProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStock {
    pub category_name: String,
    pub products: usize,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerReport {
    pub total_customers: usize,
    pub active_customers: usize,
    pub new_customers_this_month: usize,
    pub top_customers: Vec<TopCustomer>,
    pub customers_by_type: Vec<CustomerTypeData>,
    pub customers_by_city: Vec<CityData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomer {
    pub id: String,
    pub name: String,
    pub total_purchases: Decimal,
    pub invoice_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerTypeData {
    #[serde(rename = "type")]
    pub label: String,
    pub count: usize,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityData {
    pub city: String,
    pub customers: usize,
}

/// Landing page summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_products: usize,
    pub low_stock_count: usize,
    pub low_stock_products: Vec<Product>,
    pub total_customers: usize,
    pub invoices: InvoiceStats,
    pub recent_invoices: Vec<Invoice>,
}

/// Query of `GET /api/reports/sales`; both bounds are inclusive Lima dates
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
