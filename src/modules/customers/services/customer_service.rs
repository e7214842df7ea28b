use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::core::traits::Repository;
use crate::core::{paginate, AppError, Operation, PageRequest, Paginated, Result, SimulatedLatency};
use crate::modules::customers::models::{
    validate_document, Customer, CustomerFilter, CustomerInput, DocumentType,
};
use crate::modules::customers::repositories::CustomerRepository;

const DUPLICATE_DOCUMENT: &str = "Ya existe un cliente con este número de documento";

/// Service for the customer registry
pub struct CustomerService {
    repo: Arc<CustomerRepository>,
    latency: SimulatedLatency,
}

impl CustomerService {
    pub fn new(repo: Arc<CustomerRepository>, latency: SimulatedLatency) -> Self {
        Self { repo, latency }
    }

    pub async fn list_customers(&self, filter: CustomerFilter) -> Result<Paginated<Customer>> {
        let page = PageRequest::from_parts(filter.page, filter.limit)?;
        self.latency.wait(Operation::List).await;

        let mut customers: Vec<Customer> = self
            .repo
            .customers
            .read(|items| items.iter().filter(|c| filter.matches(c)).cloned().collect())
            .await;
        filter.sort(&mut customers);

        Ok(paginate(customers, page))
    }

    pub async fn get_customer(&self, id: &str) -> Result<Customer> {
        self.latency.wait(Operation::Get).await;
        self.find_customer(id)
            .await
            .ok_or_else(|| AppError::not_found("Cliente no encontrado"))
    }

    /// Lookup without latency, for other services joining on customerId
    pub async fn find_customer(&self, id: &str) -> Option<Customer> {
        self.repo.customers.find_by_id(id).await
    }

    pub async fn all_customers(&self) -> Result<Vec<Customer>> {
        self.latency.wait(Operation::List).await;
        Ok(self.repo.customers.all().await)
    }

    /// Active customer holding `document_number`
    pub async fn find_by_document(&self, document_number: &str) -> Result<Customer> {
        self.latency.wait(Operation::Get).await;

        self.repo
            .find_by_document(document_number.trim())
            .await
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::not_found("Cliente no encontrado"))
    }

    pub async fn active_customers(&self) -> Result<Vec<Customer>> {
        self.latency.wait(Operation::Get).await;

        Ok(self
            .repo
            .customers
            .read(|items| items.iter().filter(|c| c.is_active).cloned().collect())
            .await)
    }

    pub async fn validate_document(&self, document_type: DocumentType, number: &str) -> bool {
        self.latency.wait(Operation::Lookup).await;
        validate_document(document_type, number)
    }

    pub async fn create_customer(&self, input: CustomerInput) -> Result<Customer> {
        let customer = input.into_customer(Utc::now())?;
        self.latency.wait(Operation::Create).await;

        let created = self
            .repo
            .customers
            .write(|customers| {
                if customers
                    .iter()
                    .any(|c| c.document_number == customer.document_number)
                {
                    return Err(AppError::conflict(DUPLICATE_DOCUMENT));
                }
                Ok(customers.insert(customer))
            })
            .await?;

        info!(customer_id = %created.id, document = %created.document_number, "Customer created");
        Ok(created)
    }

    pub async fn update_customer(&self, id: &str, input: CustomerInput) -> Result<Customer> {
        self.latency.wait(Operation::Update).await;
        let now = Utc::now();

        let updated = self
            .repo
            .customers
            .write(|customers| {
                let current = customers
                    .find(id)
                    .cloned()
                    .ok_or_else(|| AppError::not_found("Cliente no encontrado"))?;
                let merged = input.merge(&current, now)?;

                if customers
                    .iter()
                    .any(|c| c.id != id && c.document_number == merged.document_number)
                {
                    return Err(AppError::conflict(DUPLICATE_DOCUMENT));
                }

                customers
                    .replace(merged)
                    .ok_or_else(|| AppError::not_found("Cliente no encontrado"))
            })
            .await?;

        info!(customer_id = %id, "Customer updated");
        Ok(updated)
    }

    /// Soft delete: the customer stays on file as inactive
    pub async fn delete_customer(&self, id: &str) -> Result<()> {
        self.latency.wait(Operation::Delete).await;
        let now = Utc::now();

        self.repo
            .customers
            .write(|customers| {
                let current = customers
                    .find(id)
                    .cloned()
                    .ok_or_else(|| AppError::not_found("Cliente no encontrado"))?;
                customers.replace(Customer {
                    is_active: false,
                    updated_at: now,
                    ..current
                });
                Ok::<(), AppError>(())
            })
            .await?;

        info!(customer_id = %id, "Customer deactivated");
        Ok(())
    }
}
