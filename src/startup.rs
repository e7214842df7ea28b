//! Service graph construction and route registration.

use std::sync::Arc;

use actix_web::web;

use crate::config::MockConfig;
use crate::core::Result;
use crate::middleware::configure_extractors;
use crate::modules::auth::{AuthService, UserRepository};
use crate::modules::customers::{CustomerRepository, CustomerService};
use crate::modules::invoices::{InvoiceRepository, InvoiceService, SimulatedSunat, SunatGateway};
use crate::modules::products::{ProductRepository, ProductService};
use crate::modules::reports::ReportService;
use crate::modules::{auth, customers, health, invoices, products, reports};

/// Every service the HTTP layer needs, wired over the seeded stores
#[derive(Clone)]
pub struct AppServices {
    pub auth: Arc<AuthService>,
    pub products: Arc<ProductService>,
    pub customers: Arc<CustomerService>,
    pub invoices: Arc<InvoiceService>,
    pub reports: Arc<ReportService>,
}

impl AppServices {
    /// Builds the services over the demo data set
    pub fn seeded(config: &MockConfig) -> Result<Self> {
        let sunat: Arc<dyn SunatGateway> = Arc::new(SimulatedSunat::new(
            config.sunat_acceptance_rate,
            config.latency(),
        ));

        Ok(Self::build(
            config,
            UserRepository::seeded()?,
            ProductRepository::seeded(),
            CustomerRepository::seeded(),
            InvoiceRepository::seeded(),
            sunat,
        ))
    }

    pub fn build(
        config: &MockConfig,
        users: UserRepository,
        catalog: ProductRepository,
        registry: CustomerRepository,
        book: InvoiceRepository,
        sunat: Arc<dyn SunatGateway>,
    ) -> Self {
        let latency = config.latency();

        let auth = Arc::new(AuthService::new(
            Arc::new(users),
            latency,
            config.session_ttl_hours,
        ));
        let products = Arc::new(ProductService::new(Arc::new(catalog), latency));
        let customers = Arc::new(CustomerService::new(Arc::new(registry), latency));
        let invoices = Arc::new(InvoiceService::new(
            Arc::new(book),
            customers.clone(),
            products.clone(),
            sunat,
            latency,
            config.invoice_due_days,
        ));
        let reports = Arc::new(ReportService::new(
            products.clone(),
            customers.clone(),
            invoices.clone(),
            latency,
        ));

        Self {
            auth,
            products,
            customers,
            invoices,
            reports,
        }
    }

    /// Registers shared state, extractor error handlers and every route.
    /// Authentication is applied by wrapping the app in `BearerAuth`.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        configure_extractors(cfg);

        cfg.app_data(web::Data::new(self.auth.clone()))
            .app_data(web::Data::new(self.products.clone()))
            .app_data(web::Data::new(self.customers.clone()))
            .app_data(web::Data::new(self.invoices.clone()))
            .app_data(web::Data::new(self.reports.clone()))
            .configure(health::controllers::health_controller::configure)
            .service(
                web::scope("/api")
                    .configure(auth::controllers::auth_controller::configure)
                    .configure(products::controllers::product_controller::configure)
                    .configure(products::controllers::category_controller::configure)
                    .configure(customers::controllers::customer_controller::configure)
                    .configure(invoices::controllers::invoice_controller::configure)
                    .configure(reports::controllers::report_controller::configure),
            );
    }
}
