use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level verdict of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Indication {
    Passed,
    Failed,
    Indeterminate,
}

/// Refinement code attached to FAILED and INDETERMINATE verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubIndication {
    Expired,
    Revoked,
    NotYetValid,
    NoCertificateChainFound,
    RevocationNotFresh,
    NoPoe,
    TryLater,
    ChainConstraintsFailure,
    CryptoAlgorithmUnacceptable,
    CertificateChainGeneralFailure,
    NoSigningCertificateFound,
    SigCryptoFailure,
    HashFailure,
}

impl fmt::Display for Indication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Indication::Passed => "PASSED",
            Indication::Failed => "FAILED",
            Indication::Indeterminate => "INDETERMINATE",
        };
        f.write_str(s)
    }
}

impl fmt::Display for SubIndication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubIndication::Expired => "EXPIRED",
            SubIndication::Revoked => "REVOKED",
            SubIndication::NotYetValid => "NOT_YET_VALID",
            SubIndication::NoCertificateChainFound => "NO_CERTIFICATE_CHAIN_FOUND",
            SubIndication::RevocationNotFresh => "REVOCATION_NOT_FRESH",
            SubIndication::NoPoe => "NO_POE",
            SubIndication::TryLater => "TRY_LATER",
            SubIndication::ChainConstraintsFailure => "CHAIN_CONSTRAINTS_FAILURE",
            SubIndication::CryptoAlgorithmUnacceptable => "CRYPTO_ALGORITHM_UNACCEPTABLE",
            SubIndication::CertificateChainGeneralFailure => "CERTIFICATE_CHAIN_GENERAL_FAILURE",
            SubIndication::NoSigningCertificateFound => "NO_SIGNING_CERTIFICATE_FOUND",
            SubIndication::SigCryptoFailure => "SIG_CRYPTO_FAILURE",
            SubIndication::HashFailure => "HASH_FAILURE",
        };
        f.write_str(s)
    }
}

/// An indication together with its optional sub-indication.
///
/// Use the constructors; a PASSED conclusion never carries a sub-indication
/// and the other two always do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conclusion {
    pub indication: Indication,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,
}

impl Conclusion {
    pub const fn passed() -> Self {
        Self { indication: Indication::Passed, sub_indication: None }
    }

    pub const fn failed(sub: SubIndication) -> Self {
        Self { indication: Indication::Failed, sub_indication: Some(sub) }
    }

    pub const fn indeterminate(sub: SubIndication) -> Self {
        Self { indication: Indication::Indeterminate, sub_indication: Some(sub) }
    }

    pub fn is_passed(&self) -> bool {
        self.indication == Indication::Passed
    }

    /// Fail-closed merge: FAILED beats INDETERMINATE beats PASSED. On a tie
    /// the earlier (`self`) result is kept.
    pub fn worst(self, other: Conclusion) -> Conclusion {
        if rank(other.indication) > rank(self.indication) {
            other
        } else {
            self
        }
    }
}

fn rank(indication: Indication) -> u8 {
    match indication {
        Indication::Passed => 0,
        Indication::Indeterminate => 1,
        Indication::Failed => 2,
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sub_indication {
            Some(sub) => write!(f, "{}/{}", self.indication, sub),
            None => write!(f, "{}", self.indication),
        }
    }
}

/// Enforcement level of a constraint category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    Fail,
    Warn,
    Ignore,
}

/// Constraint categories a policy must assign a level to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintCategory {
    TrustAnchor,
    ChainLength,
    ValidityPeriod,
    CertificateSignature,
    KeyUsage,
    CryptographicAlgorithm,
    Revocation,
    RevocationFreshness,
    SigningCertificate,
    SignatureIntact,
}

impl ConstraintCategory {
    pub const ALL: [ConstraintCategory; 10] = [
        ConstraintCategory::TrustAnchor,
        ConstraintCategory::ChainLength,
        ConstraintCategory::ValidityPeriod,
        ConstraintCategory::CertificateSignature,
        ConstraintCategory::KeyUsage,
        ConstraintCategory::CryptographicAlgorithm,
        ConstraintCategory::Revocation,
        ConstraintCategory::RevocationFreshness,
        ConstraintCategory::SigningCertificate,
        ConstraintCategory::SignatureIntact,
    ];
}

impl fmt::Display for ConstraintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConstraintCategory::TrustAnchor => "TRUST_ANCHOR",
            ConstraintCategory::ChainLength => "CHAIN_LENGTH",
            ConstraintCategory::ValidityPeriod => "VALIDITY_PERIOD",
            ConstraintCategory::CertificateSignature => "CERTIFICATE_SIGNATURE",
            ConstraintCategory::KeyUsage => "KEY_USAGE",
            ConstraintCategory::CryptographicAlgorithm => "CRYPTOGRAPHIC_ALGORITHM",
            ConstraintCategory::Revocation => "REVOCATION",
            ConstraintCategory::RevocationFreshness => "REVOCATION_FRESHNESS",
            ConstraintCategory::SigningCertificate => "SIGNING_CERTIFICATE",
            ConstraintCategory::SignatureIntact => "SIGNATURE_INTACT",
        };
        f.write_str(s)
    }
}

/// Qualification label of a certificate at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Qualification {
    #[serde(rename = "QC with QSCD")]
    QcWithQscd,
    #[serde(rename = "QC")]
    Qc,
    #[serde(rename = "Not qualified")]
    NotQualified,
    /// No trust-service data was available for the certificate.
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Qualification {
    pub fn label(&self) -> &'static str {
        match self {
            Qualification::QcWithQscd => "QC with QSCD",
            Qualification::Qc => "QC",
            Qualification::NotQualified => "Not qualified",
            Qualification::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for Qualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
