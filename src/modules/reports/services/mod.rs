pub mod aggregator;
pub mod report_service;

pub use aggregator::DateRange;
pub use report_service::ReportService;
