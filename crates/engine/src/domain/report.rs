// crates/engine/src/domain/report.rs
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::EngineResult;
use super::types::{
    Conclusion, ConstraintCategory, Indication, KeyUsage, Level, Qualification,
    RevocationReason, SubIndication, SubjectFact,
};

/// Outcome of a single constraint check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintStatus {
    Ok,
    Warning,
    NotOk,
}

/// One entry of the constraint trail behind a conclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintEvaluation {
    pub category: ConstraintCategory,
    pub level: Level,
    pub status: ConstraintStatus,
    pub message_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,
    /// Id of the fact that decided the check (e.g. the revocation used).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_id: Option<String>,
}

/// Per-certificate result inside a chain validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateValidation {
    pub certificate_id: String,
    pub conclusion: Conclusion,
    pub constraints: Vec<ConstraintEvaluation>,
}

/// Result of the certificate path validation (XCV) building block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainValidation {
    pub conclusion: Conclusion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_anchor_id: Option<String>,
    /// Chain-level checks (trust anchor, chain length).
    pub constraints: Vec<ConstraintEvaluation>,
    /// Leaf first; the trust anchor only when its revocation is checked.
    pub certificates: Vec<CertificateValidation>,
}

impl ChainValidation {
    pub fn certificate(&self, id: &str) -> Option<&CertificateValidation> {
        self.certificates.iter().find(|c| c.certificate_id == id)
    }
}

/// A trusted service entry that matched during qualification.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedService {
    pub trust_service_provider: String,
    pub service_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationResult {
    pub instant: DateTime<Utc>,
    pub qualification: Qualification,
    pub matched_services: Vec<MatchedService>,
    /// Canonical names of the union of matched qualifiers, sorted.
    pub qualifiers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateConclusion {
    pub certificate_id: String,
    pub conclusion: Conclusion,
    pub chain: ChainValidation,
    pub qualification_at_issuance: QualificationResult,
    pub qualification_at_validation: QualificationResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureConclusion {
    pub signature_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_certificate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_time: Option<DateTime<Utc>>,
    pub conclusion: Conclusion,
    /// Signature-level checks.
    pub constraints: Vec<ConstraintEvaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<ChainValidation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification_at_signing_time: Option<QualificationResult>,
}

impl SignatureConclusion {
    /// Every constraint behind this conclusion, signature checks first.
    pub fn all_constraints(&self) -> impl Iterator<Item = &ConstraintEvaluation> {
        let chain = self.chain.iter().flat_map(|c| {
            c.constraints
                .iter()
                .chain(c.certificates.iter().flat_map(|cv| cv.constraints.iter()))
        });
        self.constraints.iter().chain(chain)
    }
}

/// Conclusion tree for a whole run, keyed by certificate and signature id.
/// Ordered maps keep the serialized form identical across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedReport {
    pub validation_time: DateTime<Utc>,
    pub policy_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_version: Option<String>,
    pub certificates: BTreeMap<String, CertificateConclusion>,
    pub signatures: BTreeMap<String, SignatureConclusion>,
}

impl DetailedReport {
    pub fn certificate(&self, id: &str) -> Option<&CertificateConclusion> {
        self.certificates.get(id)
    }

    pub fn signature(&self, id: &str) -> Option<&SignatureConclusion> {
        self.signatures.get(id)
    }

    pub fn certificate_indication(&self, id: &str) -> Option<Conclusion> {
        self.certificates.get(id).map(|c| c.conclusion)
    }

    pub fn qualification_at_issuance(&self, id: &str) -> Option<Qualification> {
        self.certificates
            .get(id)
            .map(|c| c.qualification_at_issuance.qualification)
    }

    pub fn qualification_at_validation(&self, id: &str) -> Option<Qualification> {
        self.certificates
            .get(id)
            .map(|c| c.qualification_at_validation.qualification)
    }

    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEntry {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub indication: Indication,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub certificate_chain: Vec<ChainEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<Qualification>,
}

/// Display-oriented summary, one entry per signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleReport {
    pub validation_time: DateTime<Utc>,
    pub policy_name: String,
    pub signatures_count: usize,
    pub valid_signatures_count: usize,
    pub signatures: Vec<SignatureSummary>,
}

impl SimpleReport {
    pub fn signature(&self, id: &str) -> Option<&SignatureSummary> {
        self.signatures.iter().find(|s| s.id == id)
    }

    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Latest revocation data known for a chain item. All fields are empty
/// when no revocation fact exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_reason: Option<RevocationReason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustAnchorLabel {
    pub country_code: String,
    pub trust_service_provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_service_provider_registration_id: Option<String>,
    pub trust_service_name: String,
}

/// One certificate of a simple certificate report chain. `None` on a list
/// means no data; it is never replaced by an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainItem {
    pub id: String,
    pub subject: SubjectFact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_id: Option<String>,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub key_usages: Vec<KeyUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_key_usages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aia_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocsp_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crl_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cps_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pds_urls: Option<Vec<String>>,
    pub revocation: RevocationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_anchors: Option<Vec<TrustAnchorLabel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indication: Option<Conclusion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification_at_issuance: Option<Qualification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification_at_validation: Option<Qualification>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleCertificateReport {
    pub validation_time: DateTime<Utc>,
    pub chain: Vec<ChainItem>,
}

impl SimpleCertificateReport {
    pub fn item(&self, id: &str) -> Option<&ChainItem> {
        self.chain.iter().find(|i| i.id == id)
    }

    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Everything one signature-validation run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reports {
    pub detailed_report: DetailedReport,
    pub simple_report: SimpleReport,
}

/// Everything one certificate query produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateReports {
    pub detailed_report: DetailedReport,
    pub simple_certificate_report: SimpleCertificateReport,
}
