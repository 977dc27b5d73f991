// blocks/xcv.rs

//! Certificate path validation (XCV).
//!
//! Chain-level checks run first (trust anchor, chain length), then each
//! certificate from the leaf up to the trust anchor gets its own trail:
//! validity period, certificate signature, key usage, cryptographic
//! algorithm, revocation and revocation freshness. The chain conclusion
//! folds the chain-level conclusion with every element conclusion,
//! FAILED taking precedence over INDETERMINATE.

use chrono::{DateTime, Utc};

use super::constants::*;
use super::constraint::{Check, ConstraintTrail};
use super::crypto::check_algorithm;
use super::revocation::{applicable, evaluate_freshness};
use crate::domain::report::{CertificateValidation, ChainValidation};
use crate::domain::types::{
  CertificateChain, CertificateFact, Conclusion, ConstraintCategory, DiagnosticData, KeyUsage,
  RevocationStatus, SubIndication, ValidationPolicy,
};

/// Position of an element inside the validated part of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
  Leaf,
  Intermediate,
  TrustAnchor,
}

pub fn validate_chain(
  data: &DiagnosticData,
  chain: &CertificateChain<'_>,
  policy: &ValidationPolicy,
  reference_time: DateTime<Utc>,
) -> ChainValidation {
  let leaf = chain.leaf();
  let anchor_index = chain.trust_anchor_index();
  let validated = chain.validated_elements();

  let mut trail = ConstraintTrail::new(policy, &leaf.id);
  trail.record(ConstraintCategory::TrustAnchor, || match chain.trust_anchor() {
    Some(anchor) => Check::pass(CHAIN_TRUST_ANCHOR_FOUND).with_evidence(&anchor.id),
    None => Check::fail(
      CHAIN_TRUST_ANCHOR_MISSING,
      Conclusion::indeterminate(SubIndication::NoCertificateChainFound),
    ),
  });
  trail.record(ConstraintCategory::ChainLength, || match policy.max_chain_length {
    Some(max) if validated.len() > max => Check::fail(
      CHAIN_LENGTH_EXCEEDED,
      Conclusion::indeterminate(SubIndication::ChainConstraintsFailure),
    ),
    _ => Check::pass(CHAIN_LENGTH_ACCEPTED),
  });
  let (chain_conclusion, constraints) = trail.finish();

  let mut certificates = Vec::with_capacity(validated.len());
  for (index, cert) in validated.iter().enumerate() {
    let role = if Some(index) == anchor_index {
      Role::TrustAnchor
    } else if index == 0 {
      Role::Leaf
    } else {
      Role::Intermediate
    };
    if role == Role::TrustAnchor && !policy.revocation.check_trust_anchor {
      continue;
    }
    certificates.push(validate_element(data, cert, role, policy, reference_time));
  }

  let conclusion = certificates
    .iter()
    .fold(chain_conclusion, |acc, cv| acc.worst(cv.conclusion));

  tracing::debug!(
    leaf = %leaf.id,
    length = chain.len(),
    trust_anchor = chain.trust_anchor().map(|c| c.id.as_str()),
    %conclusion,
    "certificate chain validated"
  );

  ChainValidation {
    conclusion,
    trust_anchor_id: chain.trust_anchor().map(|c| c.id.clone()),
    constraints,
    certificates,
  }
}

fn validate_element(
  data: &DiagnosticData,
  cert: &CertificateFact,
  role: Role,
  policy: &ValidationPolicy,
  reference_time: DateTime<Utc>,
) -> CertificateValidation {
  let mut trail = ConstraintTrail::new(policy, &cert.id);

  // a listed trust anchor is only subject to its own revocation checks
  if role != Role::TrustAnchor {
    trail.record(ConstraintCategory::ValidityPeriod, || check_validity(cert, reference_time));
    trail.record(ConstraintCategory::CertificateSignature, || {
      if cert.signature_intact {
        Check::pass(CERT_SIGNATURE_INTACT)
      } else {
        Check::fail(
          CERT_SIGNATURE_INVALID,
          Conclusion::indeterminate(SubIndication::CertificateChainGeneralFailure),
        )
      }
    });
    trail.record(ConstraintCategory::KeyUsage, || check_key_usage(cert, role, policy));
    trail.record(ConstraintCategory::CryptographicAlgorithm, || {
      check_algorithm(&policy.cryptographic, cert.signature_algorithm.as_ref(), reference_time)
    });
  }

  // nobody above a self-signed certificate can revoke it
  if role == Role::TrustAnchor || !cert.is_self_signed() {
    check_revocation(data, cert, policy, reference_time, &mut trail);
  }

  let (conclusion, constraints) = trail.finish();
  CertificateValidation { certificate_id: cert.id.clone(), conclusion, constraints }
}

fn check_validity(cert: &CertificateFact, reference_time: DateTime<Utc>) -> Check {
  if cert.is_valid_at(reference_time) {
    Check::pass(CERT_VALIDITY_RANGE)
  } else if reference_time < cert.not_before {
    Check::fail(CERT_NOT_YET_VALID, Conclusion::failed(SubIndication::NotYetValid))
  } else {
    Check::fail(CERT_EXPIRED, Conclusion::failed(SubIndication::Expired))
  }
}

fn check_key_usage(cert: &CertificateFact, role: Role, policy: &ValidationPolicy) -> Check {
  let accepted = if role == Role::Intermediate || cert.ca {
    cert.has_key_usage(KeyUsage::KeyCertSign)
  } else {
    policy.signing_key_usages.iter().any(|ku| cert.has_key_usage(*ku))
  };
  if accepted {
    Check::pass(CERT_KEY_USAGE_ACCEPTED)
  } else {
    Check::fail(
      CERT_KEY_USAGE_MISMATCH,
      Conclusion::indeterminate(SubIndication::ChainConstraintsFailure),
    )
  }
}

fn check_revocation(
  data: &DiagnosticData,
  cert: &CertificateFact,
  policy: &ValidationPolicy,
  reference_time: DateTime<Utc>,
  trail: &mut ConstraintTrail<'_>,
) {
  let constraints = &policy.revocation;
  let candidates: Vec<_> =
    applicable(data.revocations_for(&cert.id), reference_time, constraints).collect();
  let freshness = evaluate_freshness(&cert.id, reference_time, candidates.iter().copied(), constraints);

  trail.record(ConstraintCategory::Revocation, || {
    let revoked = candidates
      .iter()
      .filter(|r| r.is_revoked_at(reference_time))
      .collect::<Vec<_>>();
    if let Some(r) = revoked.iter().find(|r| !r.is_suspension()) {
      return Check::fail(REVOCATION_REVOKED, Conclusion::failed(SubIndication::Revoked))
        .with_evidence(&r.id);
    }
    if let Some(r) = revoked.first() {
      return Check::fail(REVOCATION_ON_HOLD, Conclusion::indeterminate(SubIndication::TryLater))
        .with_evidence(&r.id);
    }
    match freshness.selected {
      None => Check::fail(REVOCATION_MISSING, freshness.conclusion),
      Some(r) if r.status == RevocationStatus::Unknown => {
        Check::fail(REVOCATION_UNKNOWN, Conclusion::indeterminate(SubIndication::TryLater))
          .with_evidence(&r.id)
      }
      Some(r) => Check::pass(REVOCATION_GOOD).with_evidence(&r.id),
    }
  });

  // freshness only has something to judge once a fact was selected
  if let Some(selected) = freshness.selected {
    trail.record(ConstraintCategory::RevocationFreshness, || {
      if freshness.conclusion.is_passed() {
        Check::pass(REVOCATION_FRESH).with_evidence(&selected.id)
      } else {
        Check::fail(REVOCATION_NOT_FRESH, freshness.conclusion).with_evidence(&selected.id)
      }
    });
  }
}
