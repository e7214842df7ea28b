/// Tests for the pure report builders
///
/// Sales totals equal the sum of totalAmount over the filtered invoice set,
/// month buckets follow Lima time, and every ratio is guarded against zero.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use negocio::core::Currency;
use negocio::modules::customers::models::{Customer, CustomerType, DocumentType};
use negocio::modules::invoices::models::{Invoice, InvoiceItem, InvoiceStatus, InvoiceType};
use negocio::modules::products::models::{Category, Product};
use negocio::modules::reports::services::aggregator::{
    self, DateRange, UNKNOWN_CATEGORY, UNKNOWN_CITY, UNKNOWN_PRODUCT,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 20, 15, 0, 0).unwrap()
}

fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        parent_id: None,
        is_active: true,
        created_at: now(),
        updated_at: now(),
    }
}

fn product(id: &str, name: &str, category_id: &str, stock: u32, min: u32, max: u32, cost: Decimal) -> Product {
    Product {
        id: id.to_string(),
        code: format!("P{}", id),
        name: name.to_string(),
        description: String::new(),
        category_id: category_id.to_string(),
        price: cost * dec!(2),
        cost,
        stock,
        min_stock: min,
        max_stock: max,
        unit: "UND".to_string(),
        barcode: None,
        is_active: true,
        created_at: now(),
        updated_at: now(),
    }
}

fn item(product_id: &str, quantity: u32, unit_price: Decimal, discount: Decimal) -> InvoiceItem {
    let taxable = Decimal::from(quantity) * unit_price - discount;
    let tax = (taxable * dec!(0.18)).round_dp(2);
    InvoiceItem {
        id: String::new(),
        invoice_id: String::new(),
        product_id: product_id.to_string(),
        description: String::new(),
        quantity,
        unit_price,
        discount_amount: discount,
        tax_amount: tax,
        total_amount: taxable + tax,
    }
}

fn invoice(id: &str, customer_id: &str, issued: DateTime<Utc>, status: InvoiceStatus, items: Vec<InvoiceItem>) -> Invoice {
    let subtotal: Decimal = items.iter().map(InvoiceItem::gross_amount).sum();
    let discount: Decimal = items.iter().map(|i| i.discount_amount).sum();
    let tax: Decimal = items.iter().map(|i| i.tax_amount).sum();
    Invoice {
        id: id.to_string(),
        series: "B001".to_string(),
        number: format!("{:08}", id.parse::<u64>().unwrap_or(0)),
        invoice_type: InvoiceType::Boleta,
        customer_id: customer_id.to_string(),
        user_id: "1".to_string(),
        issue_date: issued,
        due_date: None,
        currency: Currency::PEN,
        exchange_rate: Decimal::ONE,
        subtotal,
        tax_amount: tax,
        discount_amount: discount,
        total_amount: subtotal - discount + tax,
        status,
        items,
        notes: None,
        sunat_status: None,
        sunat_response: None,
        xml_path: None,
        pdf_path: None,
        created_at: issued,
        updated_at: issued,
        stock_posted: false,
    }
}

fn customer(id: &str, customer_type: CustomerType, name: &str, city: Option<&str>, created: DateTime<Utc>) -> Customer {
    let business = customer_type == CustomerType::Business;
    Customer {
        id: id.to_string(),
        customer_type,
        document_type: if business { DocumentType::Ruc } else { DocumentType::Dni },
        document_number: format!("{:0>8}", id),
        business_name: business.then(|| name.to_string()),
        trade_name: None,
        contact_person: None,
        first_name: (!business).then(|| name.to_string()),
        last_name: (!business).then(|| "Prueba".to_string()),
        email: None,
        phone: None,
        address: None,
        city: city.map(str::to_string),
        state: None,
        country: "Perú".to_string(),
        postal_code: None,
        is_active: true,
        created_at: created,
        updated_at: created,
    }
}

fn catalog() -> (Vec<Product>, Vec<Category>) {
    (
        vec![
            product("1", "Laptop", "1", 15, 5, 50, dec!(2000)),
            product("2", "Mouse", "1", 3, 10, 100, dec!(30)),
            product("3", "Cuaderno", "2", 190, 20, 200, dec!(5)),
            product("4", "Silla", "9", 0, 0, 0, dec!(150)),
        ],
        vec![category("1", "Electrónicos"), category("2", "Oficina")],
    )
}

proptest! {
    /// Property: totalSales == sum of totalAmount over non-cancelled invoices in range
    #[test]
    fn test_total_sales_matches_filtered_sum(
        rows in prop::collection::vec((0i64..400, 1u32..20, 1u32..100_000u32, any::<bool>()), 0..30),
    ) {
        let (products, categories) = catalog();
        let invoices: Vec<Invoice> = rows
            .iter()
            .enumerate()
            .map(|(index, (days_ago, qty, cents, cancelled))| {
                let status = if *cancelled { InvoiceStatus::Cancelled } else { InvoiceStatus::Issued };
                invoice(
                    &(index + 1).to_string(),
                    "1",
                    now() - Duration::days(*days_ago),
                    status,
                    vec![item("1", *qty, Decimal::new(i64::from(*cents), 2), Decimal::ZERO)],
                )
            })
            .collect();

        let range = DateRange::new(NaiveDate::from_ymd_opt(2024, 1, 1), NaiveDate::from_ymd_opt(2024, 6, 20));
        let report = aggregator::sales_report(&invoices, &products, &categories, &range, now());

        let expected: Decimal = invoices
            .iter()
            .filter(|i| i.status != InvoiceStatus::Cancelled && range.contains(i.issue_date))
            .map(|i| i.total_amount)
            .sum();
        prop_assert_eq!(report.total_sales, expected);

        let bucketed: Decimal = report.sales_by_month.iter().map(|m| m.value).sum();
        prop_assert_eq!(bucketed, expected);
        prop_assert_eq!(report.sales_by_month.len(), 12);
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_empty_sales_report_guards_division() {
        let (products, categories) = catalog();
        let report = aggregator::sales_report(&[], &products, &categories, &DateRange::default(), now());

        assert_eq!(report.total_invoices, 0);
        assert_eq!(report.average_ticket, Decimal::ZERO);
        assert!(report.top_products.is_empty());
        assert!(report.sales_by_category.is_empty());
    }

    #[test]
    fn test_sales_ranking_and_unknown_products() {
        let (products, categories) = catalog();
        let invoices = vec![
            invoice("1", "1", now(), InvoiceStatus::Paid, vec![item("1", 1, dec!(2500), dec!(0))]),
            invoice(
                "2",
                "2",
                now(),
                InvoiceStatus::Issued,
                vec![item("3", 10, dec!(10), dec!(20)), item("99", 1, dec!(50), dec!(0))],
            ),
            invoice("3", "2", now(), InvoiceStatus::Cancelled, vec![item("2", 100, dec!(45), dec!(0))]),
        ];

        let report = aggregator::sales_report(&invoices, &products, &categories, &DateRange::default(), now());

        assert_eq!(report.total_invoices, 2);
        assert_eq!(report.top_products[0].name, "Laptop");
        assert_eq!(report.top_products[1].value, dec!(80));
        assert!(report.top_products.iter().any(|p| p.name == UNKNOWN_PRODUCT));
        assert!(report.top_products.iter().all(|p| p.id != "2"));

        let names: Vec<&str> = report
            .sales_by_category
            .iter()
            .map(|c| c.category_name.as_str())
            .collect();
        assert_eq!(names, vec!["Electrónicos", "Oficina", UNKNOWN_CATEGORY]);

        let share: Decimal = report.sales_by_category.iter().map(|c| c.percentage).sum();
        assert!((share - dec!(100)).abs() <= dec!(0.02));
    }

    #[test]
    fn test_month_buckets_use_lima_time() {
        let (products, categories) = catalog();
        // 2024-06-01 03:00 UTC is still May 31st in Lima
        let issued = Utc.with_ymd_and_hms(2024, 6, 1, 3, 0, 0).unwrap();
        let invoices = vec![invoice("1", "1", issued, InvoiceStatus::Issued, vec![item("1", 1, dec!(100), dec!(0))])];

        let report = aggregator::sales_report(&invoices, &products, &categories, &DateRange::default(), now());
        let may = &report.sales_by_month[10];
        let june = &report.sales_by_month[11];

        assert_eq!(may.month, "may");
        assert_eq!(may.invoice_count, 1);
        assert_eq!(june.month, "jun");
        assert_eq!(june.invoice_count, 0);
    }

    #[test]
    fn test_inventory_report() {
        let (products, categories) = catalog();
        let invoices = vec![
            invoice("1", "1", now(), InvoiceStatus::Issued, vec![item("2", 7, dec!(45), dec!(0))]),
            invoice("2", "1", now(), InvoiceStatus::Paid, vec![item("1", 2, dec!(2500), dec!(0))]),
            invoice("3", "1", now(), InvoiceStatus::Cancelled, vec![item("3", 50, dec!(8.5), dec!(0))]),
        ];

        let report = aggregator::inventory_report(&products, &categories, &invoices);

        assert_eq!(report.total_products, 4);
        assert_eq!(report.total_value, dec!(30000) + dec!(90) + dec!(950));
        // Mouse 3 <= 10 and Silla 0 <= 0
        assert_eq!(report.low_stock_products, 2);
        assert_eq!(report.stock_by_category[0].category_name, "Electrónicos");
        assert!(report.stock_by_category.iter().any(|c| c.category_name == UNKNOWN_CATEGORY));

        assert_eq!(report.top_selling_products[0].id, "2");
        assert_eq!(report.top_selling_products[0].quantity, Some(7));
        assert!(report.top_selling_products.iter().all(|p| p.id != "3"));

        // Only the notebook is above 80% of its maximum; maxStock 0 never is
        assert_eq!(report.slow_moving_products.len(), 1);
        assert_eq!(report.slow_moving_products[0].id, "3");
    }

    #[test]
    fn test_customer_report() {
        let early = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();
        let customers = vec![
            customer("1", CustomerType::Business, "Empresa ABC", Some("Lima"), early),
            customer("2", CustomerType::Individual, "Juan", Some("Lima"), early),
            customer("3", CustomerType::Individual, "Ana", None, now()),
            customer("4", CustomerType::Individual, "Rosa", Some("  "), now()),
        ];
        let invoices = vec![
            invoice("1", "1", now(), InvoiceStatus::Paid, vec![item("1", 1, dec!(2500), dec!(0))]),
            invoice("2", "2", now(), InvoiceStatus::Issued, vec![item("3", 1, dec!(10), dec!(0))]),
            invoice("3", "77", now(), InvoiceStatus::Issued, vec![item("3", 1, dec!(20), dec!(0))]),
        ];

        let report = aggregator::customer_report(&customers, &invoices, now());

        assert_eq!(report.total_customers, 4);
        assert_eq!(report.active_customers, 4);
        assert_eq!(report.new_customers_this_month, 2);
        assert_eq!(report.top_customers[0].name, "Empresa ABC");
        assert_eq!(report.top_customers[2].name, "Juan Prueba");
        assert_eq!(report.top_customers[1].name, "Cliente desconocido");

        assert_eq!(report.customers_by_type[0].label, "Personas");
        assert_eq!(report.customers_by_type[0].percentage, dec!(75));
        assert_eq!(report.customers_by_type[1].percentage, dec!(25));

        assert_eq!(report.customers_by_city[0].city, "Lima");
        assert_eq!(report.customers_by_city[0].customers, 2);
        assert!(report.customers_by_city.iter().any(|c| c.city == UNKNOWN_CITY && c.customers == 2));
    }

    #[test]
    fn test_customer_report_with_no_customers() {
        let report = aggregator::customer_report(&[], &[], now());
        assert!(report.customers_by_type.iter().all(|t| t.percentage.is_zero()));
    }

    #[test]
    fn test_dashboard_recent_invoices() {
        let (products, _) = catalog();
        let invoices: Vec<Invoice> = (1..=7)
            .map(|day| {
                invoice(
                    &day.to_string(),
                    "1",
                    Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap(),
                    InvoiceStatus::Issued,
                    vec![item("1", 1, dec!(10), dec!(0))],
                )
            })
            .collect();

        let summary = aggregator::dashboard(&products, &[], &invoices);

        assert_eq!(summary.recent_invoices.len(), 5);
        assert_eq!(summary.recent_invoices[0].id, "7");
        assert_eq!(summary.low_stock_count, 2);
        assert_eq!(summary.invoices.total_invoices, 7);
    }
}
