// blocks/constants.rs

use std::collections::HashMap;

// Message keys recorded in the constraint trail. Stable identifiers,
// meant for lookup in a message bundle rather than display as-is.
pub const CHAIN_TRUST_ANCHOR_FOUND: &str = "chain.trustAnchorFound";
pub const CHAIN_TRUST_ANCHOR_MISSING: &str = "chain.trustAnchorMissing";
pub const CHAIN_LENGTH_ACCEPTED: &str = "chain.lengthAccepted";
pub const CHAIN_LENGTH_EXCEEDED: &str = "chain.lengthExceeded";

pub const CERT_VALIDITY_RANGE: &str = "certificate.validityRange";
pub const CERT_NOT_YET_VALID: &str = "certificate.notYetValid";
pub const CERT_EXPIRED: &str = "certificate.expired";
pub const CERT_SIGNATURE_INTACT: &str = "certificate.signatureIntact";
pub const CERT_SIGNATURE_INVALID: &str = "certificate.signatureInvalid";
pub const CERT_KEY_USAGE_ACCEPTED: &str = "certificate.keyUsageAccepted";
pub const CERT_KEY_USAGE_MISMATCH: &str = "certificate.keyUsageMismatch";

pub const ALGORITHM_ACCEPTABLE: &str = "algorithm.acceptable";
pub const ALGORITHM_MISSING: &str = "algorithm.missing";
pub const ALGORITHM_DIGEST_UNACCEPTABLE: &str = "algorithm.digestUnacceptable";
pub const ALGORITHM_ENCRYPTION_UNACCEPTABLE: &str = "algorithm.encryptionUnacceptable";
pub const ALGORITHM_KEY_TOO_SHORT: &str = "algorithm.keyTooShort";

pub const REVOCATION_GOOD: &str = "revocation.good";
pub const REVOCATION_REVOKED: &str = "revocation.revoked";
pub const REVOCATION_ON_HOLD: &str = "revocation.onHold";
pub const REVOCATION_MISSING: &str = "revocation.missing";
pub const REVOCATION_UNKNOWN: &str = "revocation.unknown";
pub const REVOCATION_FRESH: &str = "revocation.fresh";
pub const REVOCATION_NOT_FRESH: &str = "revocation.notFresh";

pub const SIGNING_CERTIFICATE_FOUND: &str = "signature.signingCertificateFound";
pub const SIGNING_CERTIFICATE_MISSING: &str = "signature.signingCertificateMissing";
pub const SIGNATURE_REFERENCE_DATA_INTACT: &str = "signature.referenceDataIntact";
pub const SIGNATURE_HASH_FAILURE: &str = "signature.hashFailure";
pub const SIGNATURE_INTACT: &str = "signature.intact";
pub const SIGNATURE_CRYPTO_FAILURE: &str = "signature.cryptoFailure";

// Trusted list service information extension qualifiers (ETSI TS 119 612).
pub const QC_STATEMENT: &str = "QCStatement";
pub const QC_WITH_QSCD: &str = "QCWithQSCD";
pub const QC_WITH_SSCD: &str = "QCWithSSCD";
pub const QC_NO_QSCD: &str = "QCNoQSCD";
pub const QC_NO_SSCD: &str = "QCNoSSCD";
pub const QC_QSCD_MANAGED_ON_BEHALF: &str = "QCQSCDManagedOnBehalf";
pub const QC_FOR_ESIG: &str = "QCForESig";
pub const QC_FOR_ESEAL: &str = "QCForESeal";
pub const QC_FOR_WSA: &str = "QCForWSA";
pub const QC_FOR_LEGAL_PERSON: &str = "QCForLegalPerson";
pub const NOT_QUALIFIED: &str = "NotQualified";

/// Lowercased qualifier spellings (short names and shorthand) mapped to
/// their canonical name. Trusted-list URIs are reduced to their last path
/// segment before lookup.
pub static QUALIFIER_ALIASES: once_cell::sync::Lazy<HashMap<String, &'static str>> =
  once_cell::sync::Lazy::new(|| {
    let canonical = [
      QC_STATEMENT, QC_WITH_QSCD, QC_WITH_SSCD, QC_NO_QSCD, QC_NO_SSCD,
      QC_QSCD_MANAGED_ON_BEHALF, QC_FOR_ESIG, QC_FOR_ESEAL, QC_FOR_WSA,
      QC_FOR_LEGAL_PERSON, NOT_QUALIFIED,
    ];
    let mut table: HashMap<String, &'static str> =
      canonical.iter().map(|q| (q.to_ascii_lowercase(), *q)).collect();
    table.insert("qc".into(), QC_STATEMENT);
    table.insert("qscd".into(), QC_WITH_QSCD);
    table.insert("sscd".into(), QC_WITH_SSCD);
    table
  });
