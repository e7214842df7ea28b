use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::{Operation, SimulatedLatency};
use crate::modules::invoices::models::{Invoice, SunatStatus};

/// Electronic submission of sales documents to the tax authority
#[async_trait]
pub trait SunatGateway: Send + Sync {
    /// Submit an invoice and return the authority's verdict
    async fn submit(&self, invoice: &Invoice) -> SunatOutcome;

    /// Get gateway name
    fn name(&self) -> &str;
}

/// Verdict returned for one submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SunatOutcome {
    pub status: SunatStatus,
    pub message: String,
}

impl SunatOutcome {
    pub fn accepted() -> Self {
        Self {
            status: SunatStatus::Accepted,
            message: "Comprobante aceptado por SUNAT".to_string(),
        }
    }

    pub fn rejected() -> Self {
        Self {
            status: SunatStatus::Rejected,
            message: "Error en validación SUNAT".to_string(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == SunatStatus::Accepted
    }
}

/// Mocked authority that accepts a fixed share of submissions
pub struct SimulatedSunat {
    acceptance_rate: f64,
    latency: SimulatedLatency,
}

impl SimulatedSunat {
    pub fn new(acceptance_rate: f64, latency: SimulatedLatency) -> Self {
        let acceptance_rate = if acceptance_rate.is_nan() {
            0.0
        } else {
            acceptance_rate.clamp(0.0, 1.0)
        };
        Self {
            acceptance_rate,
            latency,
        }
    }

    fn accepts(&self) -> bool {
        rand::thread_rng().gen_bool(self.acceptance_rate)
    }
}

#[async_trait]
impl SunatGateway for SimulatedSunat {
    async fn submit(&self, invoice: &Invoice) -> SunatOutcome {
        self.latency.wait(Operation::SunatSubmit).await;

        let outcome = if self.accepts() {
            SunatOutcome::accepted()
        } else {
            SunatOutcome::rejected()
        };

        tracing::debug!(
            document = %invoice.document_number(),
            status = ?outcome.status,
            "SUNAT submission simulated"
        );
        outcome
    }

    fn name(&self) -> &str {
        "sunat-simulado"
    }
}
