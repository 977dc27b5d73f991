// executor/parallel.rs

use std::sync::Arc;

use crate::domain::error::{EngineError, EngineResult};
use crate::domain::report::CertificateReports;
use crate::domain::types::ValidationConfig;
use super::common::run_on_current_thread;
use super::validate_certificate_at;

/// Validate several certificates concurrently, one blocking task per id.
/// Inputs are checked once up front; reports come back in request order.
pub async fn validate_certificates(
  config: ValidationConfig,
  certificate_ids: Vec<String>,
) -> EngineResult<Vec<CertificateReports>> {
  config.validate()?;
  let validation_time = config.resolved_validation_time();

  let handles: Vec<_> = certificate_ids
    .into_iter()
    .map(|id| {
      let data = Arc::clone(&config.diagnostic_data);
      let policy = Arc::clone(&config.policy);
      tokio::task::spawn_blocking(move || validate_certificate_at(&data, &policy, validation_time, &id))
    })
    .collect();

  // every task is joined before the first error is returned
  let mut results = Vec::with_capacity(handles.len());
  for handle in handles {
    results.push(handle.await.map_err(|e| EngineError::Panic(e.to_string())).and_then(|r| r));
  }
  let reports = results.into_iter().collect::<EngineResult<Vec<_>>>()?;
  tracing::debug!(count = reports.len(), "parallel certificate validation finished");
  Ok(reports)
}

/// Blocking wrapper around [`validate_certificates`].
pub fn validate_certificates_blocking(
  config: ValidationConfig,
  certificate_ids: Vec<String>,
) -> EngineResult<Vec<CertificateReports>> {
  run_on_current_thread(validate_certificates(config, certificate_ids))
}
