// blocks/signature.rs

use chrono::{DateTime, Utc};

use super::constants::*;
use super::constraint::{Check, ConstraintTrail};
use super::crypto::check_algorithm;
use super::qualification::determine_qualification;
use super::xcv::validate_chain;
use crate::domain::error::EngineResult;
use crate::domain::report::SignatureConclusion;
use crate::domain::types::{
  Conclusion, ConstraintCategory, DiagnosticData, SignatureFact, SubIndication, ValidationPolicy,
};

/// Validate one signature: signing certificate, upstream integrity verdicts
/// and algorithm, then the signing certificate's chain at `validation_time`.
pub fn validate_signature(
  data: &DiagnosticData,
  signature: &SignatureFact,
  policy: &ValidationPolicy,
  validation_time: DateTime<Utc>,
) -> EngineResult<SignatureConclusion> {
  let signing_cert = signature
    .signing_certificate_id
    .as_deref()
    .map(|id| data.used_certificate(id))
    .transpose()?;

  let mut trail = ConstraintTrail::new(policy, &signature.id);
  trail.record(ConstraintCategory::SigningCertificate, || match signing_cert {
    Some(cert) => Check::pass(SIGNING_CERTIFICATE_FOUND).with_evidence(&cert.id),
    None => Check::fail(
      SIGNING_CERTIFICATE_MISSING,
      Conclusion::indeterminate(SubIndication::NoSigningCertificateFound),
    ),
  });
  trail.record(ConstraintCategory::SignatureIntact, || {
    if !signature.reference_data_intact {
      Check::fail(SIGNATURE_HASH_FAILURE, Conclusion::failed(SubIndication::HashFailure))
    } else if !signature.signature_intact {
      Check::fail(SIGNATURE_CRYPTO_FAILURE, Conclusion::failed(SubIndication::SigCryptoFailure))
    } else {
      Check::pass(SIGNATURE_INTACT)
    }
  });
  trail.record(ConstraintCategory::CryptographicAlgorithm, || {
    check_algorithm(&policy.cryptographic, signature.signature_algorithm.as_ref(), validation_time)
  });
  let (mut conclusion, constraints) = trail.finish();

  let chain = match signing_cert {
    Some(cert) => Some(validate_chain(data, &data.certificate_chain(&cert.id)?, policy, validation_time)),
    None => None,
  };
  if let Some(chain) = &chain {
    conclusion = conclusion.worst(chain.conclusion);
  }

  let signing_instant = signature.signing_time.unwrap_or(validation_time);
  let qualification_at_signing_time =
    signing_cert.map(|cert| determine_qualification(cert, signing_instant));

  tracing::debug!(signature_id = %signature.id, %conclusion, "signature validated");

  Ok(SignatureConclusion {
    signature_id: signature.id.clone(),
    signing_certificate_id: signing_cert.map(|c| c.id.clone()),
    signing_time: signature.signing_time,
    conclusion,
    constraints,
    chain,
    qualification_at_signing_time,
  })
}
