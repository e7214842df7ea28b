//! Artificial latency for the in-memory stores.
//!
//! Every service call sleeps before touching its collection, then performs
//! the read or mutation synchronously under the store lock. Dropping the
//! returned future while it sleeps leaves the store untouched; once the
//! mutation starts there is no await point left, so it always completes.

use std::time::Duration;

/// Kind of simulated backend call; each kind has its own base delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Lookup,
    Create,
    Update,
    Delete,
    CategoryWrite,
    InvoiceCreate,
    SunatSubmit,
    PdfRender,
    Login,
    Session,
    SalesReport,
    InventoryReport,
    CustomerReport,
}

impl Operation {
    /// Unscaled delay in milliseconds
    pub fn base_millis(&self) -> u64 {
        match self {
            Operation::List => 500,
            Operation::Get => 300,
            Operation::Lookup => 200,
            Operation::Create => 1000,
            Operation::Update => 800,
            Operation::Delete => 500,
            Operation::CategoryWrite => 500,
            Operation::InvoiceCreate => 1500,
            Operation::SunatSubmit => 2000,
            Operation::PdfRender => 1500,
            Operation::Login => 1000,
            Operation::Session => 500,
            Operation::SalesReport => 1000,
            Operation::InventoryReport => 800,
            Operation::CustomerReport => 600,
        }
    }
}

/// Largest accepted latency multiplier
pub const MAX_LATENCY_FACTOR: f64 = 100.0;

/// Scales the per-operation delays; a factor of 0 disables them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedLatency {
    factor: f64,
}

impl SimulatedLatency {
    pub fn new(factor: f64) -> Self {
        let factor = if factor.is_finite() && factor > 0.0 {
            factor.min(MAX_LATENCY_FACTOR)
        } else {
            0.0
        };
        Self { factor }
    }

    /// No delay at all, used by tests and benchmarks
    pub fn disabled() -> Self {
        Self { factor: 0.0 }
    }

    pub fn is_enabled(&self) -> bool {
        self.factor > 0.0
    }

    pub fn delay_for(&self, operation: Operation) -> Duration {
        if !self.is_enabled() {
            return Duration::ZERO;
        }
        Duration::from_millis(operation.base_millis()).mul_f64(self.factor)
    }

    pub async fn wait(&self, operation: Operation) {
        let delay = self.delay_for(operation);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self::new(1.0)
    }
}
