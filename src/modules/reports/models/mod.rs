pub mod report;

pub use report::{
    CategorySales, CategoryStock, CityData, CustomerReport, CustomerTypeData, DashboardSummary,
    InventoryReport, MonthlyData, SalesReport, SalesReportQuery, TopCustomer, TopProduct,
};
