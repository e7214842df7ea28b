use std::env;

use crate::core::{AppError, Result, SimulatedLatency, MAX_LATENCY_FACTOR};
use crate::modules::auth::services::MAX_SESSION_TTL_HOURS;
use crate::modules::invoices::services::MAX_DUE_DAYS;

/// Knobs for the simulated backend
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Multiplier applied to every artificial delay; 0 disables them
    pub latency_factor: f64,
    /// Probability in [0, 1] that the simulated SUNAT accepts a submission
    pub sunat_acceptance_rate: f64,
    /// Days between issue and due date for facturas
    pub invoice_due_days: i64,
    pub session_ttl_hours: i64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            latency_factor: 1.0,
            sunat_acceptance_rate: 0.9,
            invoice_due_days: 30,
            session_ttl_hours: 24,
        }
    }
}

impl MockConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            latency_factor: parse_var("MOCK_LATENCY_FACTOR", defaults.latency_factor)?,
            sunat_acceptance_rate: parse_var(
                "SUNAT_ACCEPTANCE_RATE",
                defaults.sunat_acceptance_rate,
            )?,
            invoice_due_days: parse_var("INVOICE_DUE_DAYS", defaults.invoice_due_days)?,
            session_ttl_hours: parse_var("SESSION_TTL_HOURS", defaults.session_ttl_hours)?,
        })
    }

    /// Configuration for tests: no delays, SUNAT always accepts
    pub fn instant() -> Self {
        Self {
            latency_factor: 0.0,
            sunat_acceptance_rate: 1.0,
            ..Self::default()
        }
    }

    pub fn latency(&self) -> SimulatedLatency {
        SimulatedLatency::new(self.latency_factor)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=MAX_LATENCY_FACTOR).contains(&self.latency_factor) {
            return Err(AppError::Configuration(format!(
                "MOCK_LATENCY_FACTOR debe estar entre 0 y {}",
                MAX_LATENCY_FACTOR
            )));
        }

        if !(0.0..=1.0).contains(&self.sunat_acceptance_rate) {
            return Err(AppError::Configuration(
                "SUNAT_ACCEPTANCE_RATE debe estar entre 0 y 1".to_string(),
            ));
        }

        if !(1..=MAX_DUE_DAYS).contains(&self.invoice_due_days) {
            return Err(AppError::Configuration(format!(
                "INVOICE_DUE_DAYS debe estar entre 1 y {}",
                MAX_DUE_DAYS
            )));
        }

        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours) {
            return Err(AppError::Configuration(format!(
                "SESSION_TTL_HOURS debe estar entre 1 y {}",
                MAX_SESSION_TTL_HOURS
            )));
        }

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("{} inválido", name))),
        Err(_) => Ok(default),
    }
}
