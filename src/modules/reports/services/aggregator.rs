//! Pure report builders.
//!
//! Every function takes immutable snapshots of the collections plus an
//! explicit `now`, so the same inputs always produce the same report.
//! Cancelled invoices never count as sales.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::core::timezone::{month_key, spanish_month_abbrev, start_of_day, start_of_month, trailing_months};
use crate::modules::customers::models::{Customer, CustomerType};
use crate::modules::invoices::models::{Invoice, InvoiceStats};
use crate::modules::products::models::{Category, Product};
use crate::modules::reports::models::{
    CategorySales, CategoryStock, CityData, CustomerReport, CustomerTypeData, DashboardSummary,
    InventoryReport, MonthlyData, SalesReport, TopCustomer, TopProduct,
};
use crate::modules::taxes::services::round2;

pub const TOP_LIMIT: usize = 10;
pub const MONTHS_IN_REPORT: u32 = 12;
pub const RECENT_INVOICES: usize = 5;

pub const UNKNOWN_PRODUCT: &str = "Producto desconocido";
pub const UNKNOWN_CATEGORY: &str = "Sin categoría";
pub const UNKNOWN_CUSTOMER: &str = "Cliente desconocido";
pub const UNKNOWN_CITY: &str = "No especificado";

/// Inclusive range of Lima calendar days; open on a missing side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_valid(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if instant < start_of_day(start.year(), start.month(), start.day()) {
                return false;
            }
        }
        if let Some(next) = self.end.and_then(|end| end.succ_opt()) {
            if instant >= start_of_day(next.year(), next.month(), next.day()) {
                return false;
            }
        }
        true
    }
}

/// `part` as a percentage of `whole`, 0 when `whole` is 0
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    let ratio = match part.checked_mul(Decimal::ONE_HUNDRED) {
        Some(scaled) => scaled / whole,
        None => part / whole * Decimal::ONE_HUNDRED,
    };
    round2(ratio)
}

/// Report sums clamp at the representable maximum instead of overflowing
fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn add_to(total: &mut Decimal, amount: Decimal) {
    *total = total.saturating_add(amount);
}

fn counted_percentage(part: usize, whole: usize) -> Decimal {
    percentage(Decimal::from(part), Decimal::from(whole))
}

/// Non-cancelled invoices issued within `range`
pub fn sales_in_range<'a>(invoices: &'a [Invoice], range: &DateRange) -> Vec<&'a Invoice> {
    invoices
        .iter()
        .filter(|invoice| !invoice.is_cancelled() && range.contains(invoice.issue_date))
        .collect()
}

pub fn sales_report(
    invoices: &[Invoice],
    products: &[Product],
    categories: &[Category],
    range: &DateRange,
    now: DateTime<Utc>,
) -> SalesReport {
    let sales = sales_in_range(invoices, range);

    let total_sales = saturating_sum(sales.iter().map(|i| i.total_amount));
    let total_invoices = sales.len();
    let average_ticket = if total_invoices == 0 {
        Decimal::ZERO
    } else {
        round2(total_sales / Decimal::from(total_invoices))
    };

    let products_by_id: HashMap<&str, &Product> =
        products.iter().map(|p| (p.id.as_str(), p)).collect();
    let category_names: HashMap<&str, &str> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let mut by_product: HashMap<&str, Decimal> = HashMap::new();
    let mut by_category: HashMap<&str, Decimal> = HashMap::new();
    for item in sales.iter().flat_map(|invoice| invoice.items.iter()) {
        let revenue = item.net_amount();
        add_to(by_product.entry(item.product_id.as_str()).or_default(), revenue);

        let category = products_by_id
            .get(item.product_id.as_str())
            .and_then(|p| category_names.get(p.category_id.as_str()).copied())
            .unwrap_or(UNKNOWN_CATEGORY);
        add_to(by_category.entry(category).or_default(), revenue);
    }

    let mut top_products: Vec<TopProduct> = by_product
        .into_iter()
        .map(|(id, value)| TopProduct {
            id: id.to_string(),
            name: products_by_id
                .get(id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
            value,
            quantity: None,
        })
        .collect();
    top_products.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.id.cmp(&b.id)));
    top_products.truncate(TOP_LIMIT);

    let category_total = saturating_sum(by_category.values().copied());
    let mut sales_by_category: Vec<CategorySales> = by_category
        .into_iter()
        .map(|(name, sales)| CategorySales {
            category_name: name.to_string(),
            sales,
            percentage: percentage(sales, category_total),
        })
        .collect();
    sales_by_category.sort_by(|a, b| {
        b.sales
            .cmp(&a.sales)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });
    sales_by_category.truncate(TOP_LIMIT);

    SalesReport {
        total_sales,
        total_invoices,
        average_ticket,
        sales_by_month: monthly_sales(&sales, now),
        top_products,
        sales_by_category,
    }
}

/// Twelve buckets ending with the month of `now`; older sales are ignored
pub fn monthly_sales(sales: &[&Invoice], now: DateTime<Utc>) -> Vec<MonthlyData> {
    let months = trailing_months(now, MONTHS_IN_REPORT);
    let mut buckets: Vec<MonthlyData> = months
        .iter()
        .map(|&(year, month)| MonthlyData {
            month: spanish_month_abbrev(month).to_string(),
            year,
            value: Decimal::ZERO,
            invoice_count: 0,
        })
        .collect();

    for invoice in sales {
        let key = month_key(invoice.issue_date);
        if let Some(index) = months.iter().position(|m| *m == key) {
            add_to(&mut buckets[index].value, invoice.total_amount);
            buckets[index].invoice_count += 1;
        }
    }

    buckets
}

/// Active products at or below their minimum stock
pub fn low_stock(products: &[Product]) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.is_active && p.is_low_stock())
        .cloned()
        .collect()
}

pub fn inventory_report(
    products: &[Product],
    categories: &[Category],
    invoices: &[Invoice],
) -> InventoryReport {
    let category_names: HashMap<&str, &str> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let mut by_category: HashMap<&str, (usize, Decimal)> = HashMap::new();
    for product in products {
        let name = category_names
            .get(product.category_id.as_str())
            .copied()
            .unwrap_or(UNKNOWN_CATEGORY);
        let slot = by_category.entry(name).or_default();
        slot.0 += 1;
        add_to(&mut slot.1, product.stock_value());
    }
    let mut stock_by_category: Vec<CategoryStock> = by_category
        .into_iter()
        .map(|(name, (count, value))| CategoryStock {
            category_name: name.to_string(),
            products: count,
            value,
        })
        .collect();
    stock_by_category.sort_by(|a, b| {
        b.value
            .cmp(&a.value)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });

    let low_stock_items = low_stock(products);

    InventoryReport {
        total_products: products.len(),
        total_value: saturating_sum(products.iter().map(Product::stock_value)),
        low_stock_products: low_stock_items.len(),
        low_stock_items,
        stock_by_category,
        top_selling_products: top_selling(products, invoices),
        slow_moving_products: slow_moving(products),
    }
}

/// Products ranked by units sold on non-cancelled invoices
pub fn top_selling(products: &[Product], invoices: &[Invoice]) -> Vec<TopProduct> {
    let mut sold: HashMap<&str, (u32, Decimal)> = HashMap::new();
    for item in invoices
        .iter()
        .filter(|i| !i.is_cancelled())
        .flat_map(|i| i.items.iter())
    {
        let slot = sold.entry(item.product_id.as_str()).or_default();
        slot.0 = slot.0.saturating_add(item.quantity);
        add_to(&mut slot.1, item.net_amount());
    }

    let mut ranked: Vec<TopProduct> = sold
        .into_iter()
        .map(|(id, (quantity, value))| TopProduct {
            id: id.to_string(),
            name: products
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
            value,
            quantity: Some(quantity),
        })
        .collect();
    ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.id.cmp(&b.id)));
    ranked.truncate(TOP_LIMIT);
    ranked
}

/// Active products above 80% of their maximum stock, fullest first
pub fn slow_moving(products: &[Product]) -> Vec<TopProduct> {
    let mut overstocked: Vec<&Product> = products
        .iter()
        .filter(|p| p.is_active && p.is_slow_moving())
        .collect();
    overstocked.sort_by(|a, b| b.fill_ratio().cmp(&a.fill_ratio()).then_with(|| a.id.cmp(&b.id)));

    overstocked
        .into_iter()
        .take(TOP_LIMIT)
        .map(|p| TopProduct {
            id: p.id.clone(),
            name: p.name.clone(),
            value: p.stock_value(),
            quantity: Some(p.stock),
        })
        .collect()
}

pub fn customer_report(customers: &[Customer], invoices: &[Invoice], now: DateTime<Utc>) -> CustomerReport {
    let total = customers.len();
    let month_start = start_of_month(now);

    let mut purchases: HashMap<&str, (Decimal, usize)> = HashMap::new();
    for invoice in invoices.iter().filter(|i| !i.is_cancelled()) {
        let slot = purchases.entry(invoice.customer_id.as_str()).or_default();
        add_to(&mut slot.0, invoice.total_amount);
        slot.1 += 1;
    }
    let mut top_customers: Vec<TopCustomer> = purchases
        .into_iter()
        .map(|(id, (total_purchases, invoice_count))| TopCustomer {
            id: id.to_string(),
            name: customers
                .iter()
                .find(|c| c.id == id)
                .map(Customer::display_name)
                .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string()),
            total_purchases,
            invoice_count,
        })
        .collect();
    top_customers.sort_by(|a, b| {
        b.total_purchases
            .cmp(&a.total_purchases)
            .then_with(|| a.id.cmp(&b.id))
    });
    top_customers.truncate(TOP_LIMIT);

    let individuals = customers
        .iter()
        .filter(|c| c.customer_type == CustomerType::Individual)
        .count();
    let businesses = customers
        .iter()
        .filter(|c| c.customer_type == CustomerType::Business)
        .count();

    let mut cities: HashMap<String, usize> = HashMap::new();
    for customer in customers {
        let city = customer
            .city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN_CITY);
        *cities.entry(city.to_string()).or_default() += 1;
    }
    let mut customers_by_city: Vec<CityData> = cities
        .into_iter()
        .map(|(city, customers)| CityData { city, customers })
        .collect();
    customers_by_city.sort_by(|a, b| b.customers.cmp(&a.customers).then_with(|| a.city.cmp(&b.city)));
    customers_by_city.truncate(TOP_LIMIT);

    CustomerReport {
        total_customers: total,
        active_customers: customers.iter().filter(|c| c.is_active).count(),
        new_customers_this_month: customers
            .iter()
            .filter(|c| c.created_at >= month_start)
            .count(),
        top_customers,
        customers_by_type: vec![
            CustomerTypeData {
                label: "Personas".to_string(),
                count: individuals,
                percentage: counted_percentage(individuals, total),
            },
            CustomerTypeData {
                label: "Empresas".to_string(),
                count: businesses,
                percentage: counted_percentage(businesses, total),
            },
        ],
        customers_by_city,
    }
}

pub fn dashboard(products: &[Product], customers: &[Customer], invoices: &[Invoice]) -> DashboardSummary {
    let low_stock_products = low_stock(products);

    let mut recent: Vec<Invoice> = invoices.to_vec();
    recent.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));
    recent.truncate(RECENT_INVOICES);

    DashboardSummary {
        total_products: products.len(),
        low_stock_count: low_stock_products.len(),
        low_stock_products,
        total_customers: customers.len(),
        invoices: InvoiceStats::from_invoices(invoices),
        recent_invoices: recent,
    }
}
