// executor/detailed.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::blocks::{determine_qualification, validate_chain, validate_signature};
use crate::domain::error::EngineResult;
use crate::domain::report::{CertificateConclusion, DetailedReport};
use crate::domain::types::{CertificateFact, DiagnosticData, ValidationPolicy};

/// Detailed report over every certificate and signature of the snapshot.
pub fn build_detailed_report(
  data: &DiagnosticData,
  policy: &ValidationPolicy,
  validation_time: DateTime<Utc>,
) -> EngineResult<DetailedReport> {
  let mut report = empty_report(policy, validation_time);

  for cert in &data.certificates {
    let conclusion = certificate_conclusion(data, cert, policy, validation_time)?;
    report.certificates.insert(cert.id.clone(), conclusion);
  }
  for signature in &data.signatures {
    let conclusion = validate_signature(data, signature, policy, validation_time)?;
    report.signatures.insert(signature.id.clone(), conclusion);
  }

  tracing::debug!(
    certificates = report.certificates.len(),
    signatures = report.signatures.len(),
    "detailed report built"
  );
  Ok(report)
}

/// Detailed report restricted to the chain of `certificate_id`. Unknown ids
/// are `NotFound`.
pub fn build_detailed_report_for_certificate(
  data: &DiagnosticData,
  policy: &ValidationPolicy,
  validation_time: DateTime<Utc>,
  certificate_id: &str,
) -> EngineResult<DetailedReport> {
  let chain = data.certificate_chain(certificate_id)?;
  let mut report = empty_report(policy, validation_time);
  for cert in chain.elements() {
    let conclusion = certificate_conclusion(data, cert, policy, validation_time)?;
    report.certificates.insert(cert.id.clone(), conclusion);
  }
  Ok(report)
}

fn empty_report(policy: &ValidationPolicy, validation_time: DateTime<Utc>) -> DetailedReport {
  DetailedReport {
    validation_time,
    policy_name: policy.name.clone(),
    policy_version: policy.version.clone(),
    certificates: BTreeMap::new(),
    signatures: BTreeMap::new(),
  }
}

fn certificate_conclusion(
  data: &DiagnosticData,
  cert: &CertificateFact,
  policy: &ValidationPolicy,
  validation_time: DateTime<Utc>,
) -> EngineResult<CertificateConclusion> {
  let chain = validate_chain(data, &data.certificate_chain(&cert.id)?, policy, validation_time);
  Ok(CertificateConclusion {
    certificate_id: cert.id.clone(),
    conclusion: chain.conclusion,
    chain,
    qualification_at_issuance: determine_qualification(cert, cert.not_before),
    qualification_at_validation: determine_qualification(cert, validation_time),
  })
}
