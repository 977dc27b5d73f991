// executor/mod.rs

use chrono::{DateTime, Utc};

use crate::domain::error::EngineResult;
use crate::domain::report::{CertificateReports, Reports};
use crate::domain::types::{DiagnosticData, ValidationConfig, ValidationPolicy};
use crate::domain::validation_engine::ValidationEngine;

mod certificate;
mod common;
mod detailed;
mod parallel;
mod simple;

pub use certificate::build_simple_certificate_report;
pub use detailed::{build_detailed_report, build_detailed_report_for_certificate};
pub use parallel::{validate_certificates, validate_certificates_blocking};
pub use simple::build_simple_report;

/// Executes the building blocks under a [`ValidationPolicy`] and projects
/// the reports.
pub struct PolicyExecutor;

impl ValidationEngine for PolicyExecutor {
  type Config = ValidationConfig;

  fn validate(config: &Self::Config) -> EngineResult<Reports> {
    config.validate()?;
    let validation_time = config.resolved_validation_time();
    tracing::debug!(
      policy = %config.policy.name,
      %validation_time,
      certificates = config.diagnostic_data.certificates.len(),
      signatures = config.diagnostic_data.signatures.len(),
      "validation run started"
    );

    let detailed_report = build_detailed_report(&config.diagnostic_data, &config.policy, validation_time)?;
    let simple_report = build_simple_report(&config.diagnostic_data, &detailed_report)?;
    Ok(Reports { detailed_report, simple_report })
  }

  fn validate_certificate(
    config: &Self::Config,
    certificate_id: &str,
  ) -> EngineResult<CertificateReports> {
    config.validate()?;
    let validation_time = config.resolved_validation_time();
    validate_certificate_at(&config.diagnostic_data, &config.policy, validation_time, certificate_id)
  }
}

/// One certificate query over already validated inputs.
pub(crate) fn validate_certificate_at(
  data: &DiagnosticData,
  policy: &ValidationPolicy,
  validation_time: DateTime<Utc>,
  certificate_id: &str,
) -> EngineResult<CertificateReports> {
  tracing::debug!(certificate_id, %validation_time, "certificate query started");
  let detailed_report =
    build_detailed_report_for_certificate(data, policy, validation_time, certificate_id)?;
  let simple_certificate_report =
    build_simple_certificate_report(data, &detailed_report, validation_time, certificate_id)?;
  Ok(CertificateReports { detailed_report, simple_certificate_report })
}
