use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::diagnostic::DiagnosticData;
use super::policy::ValidationPolicy;
use crate::domain::error::EngineResult;

/// Inputs of one validation run. Snapshot and policy sit behind `Arc` so
/// parallel runs share them read-only.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub diagnostic_data: Arc<DiagnosticData>,
    pub policy: Arc<ValidationPolicy>,
    /// Reference time for validation. Falls back to the snapshot's own
    /// validation date, then to the current clock.
    pub validation_time: Option<DateTime<Utc>>,
}

impl ValidationConfig {
    /// Secure opinionated defaults; caller supplies the snapshot.
    pub fn secure_default(diagnostic_data: DiagnosticData) -> Self {
        Self {
            diagnostic_data: Arc::new(diagnostic_data),
            policy: Arc::new(ValidationPolicy::secure_default()),
            validation_time: None,
        }
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn at(mut self, validation_time: DateTime<Utc>) -> Self {
        self.validation_time = Some(validation_time);
        self
    }

    /// Resolve the reference time once per run so every building block
    /// sees the same instant.
    pub fn resolved_validation_time(&self) -> DateTime<Utc> {
        self.validation_time
            .or(self.diagnostic_data.validation_date)
            .unwrap_or_else(Utc::now)
    }

    /// Eager checks: policy first, then the snapshot's input contract.
    pub fn validate(&self) -> EngineResult<()> {
        self.policy.validate()?;
        self.diagnostic_data.validate()
    }
}
