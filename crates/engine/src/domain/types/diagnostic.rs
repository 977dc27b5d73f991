//! Diagnostic data: the immutable snapshot of certificate, revocation,
//! trust-service and signature facts a validation run consumes.
//!
//! Facts reference each other by id only. Lookups resolve against the
//! snapshot, and [`DiagnosticData::validate`] rejects snapshots whose
//! references dangle or loop before any evaluation starts.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubjectFact {
    pub common_name: Option<String>,
    pub pseudonym: Option<String>,
    pub surname: Option<String>,
    pub given_name: Option<String>,
    pub organization_name: Option<String>,
    pub organizational_unit: Option<String>,
    pub email: Option<String>,
    pub locality: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyUsage {
    DigitalSignature,
    NonRepudiation,
    KeyEncipherment,
    DataEncipherment,
    KeyAgreement,
    KeyCertSign,
    CrlSign,
    EncipherOnly,
    DecipherOnly,
}

/// Extended key usage as an OID plus its optional human-readable name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OidFact {
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl OidFact {
    /// Description when present, otherwise the dotted OID.
    pub fn readable(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => &self.value,
        }
    }
}

/// Algorithm used to produce a signature, as reported upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmFact {
    pub digest_algorithm: String,
    pub encryption_algorithm: String,
    /// Length in bits of the key that produced the signature.
    pub key_length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateFact {
    pub id: String,
    #[serde(default)]
    pub subject: SubjectFact,
    /// Id of the issuing certificate. Equal to `id` for a self-signed
    /// certificate, absent when the issuer is unknown.
    #[serde(default)]
    pub issuer_id: Option<String>,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    #[serde(default)]
    pub key_usages: Vec<KeyUsage>,
    #[serde(default)]
    pub extended_key_usages: Vec<OidFact>,
    #[serde(default)]
    pub aia_urls: Vec<String>,
    #[serde(default)]
    pub ocsp_urls: Vec<String>,
    #[serde(default)]
    pub crl_urls: Vec<String>,
    #[serde(default)]
    pub cps_urls: Vec<String>,
    #[serde(default)]
    pub trusted: bool,
    #[serde(default)]
    pub ca: bool,
    /// Upstream verdict on this certificate's own signature.
    pub signature_intact: bool,
    #[serde(default)]
    pub signature_algorithm: Option<AlgorithmFact>,
    #[serde(default)]
    pub trust_service_providers: Vec<TrustServiceProviderFact>,
}

impl CertificateFact {
    pub fn is_self_signed(&self) -> bool {
        self.issuer_id.as_deref() == Some(self.id.as_str())
    }

    pub fn is_valid_at(&self, t: DateTime<Utc>) -> bool {
        self.not_before <= t && t <= self.not_after
    }

    pub fn has_key_usage(&self, usage: KeyUsage) -> bool {
        self.key_usages.contains(&usage)
    }

    fn urls(&self) -> impl Iterator<Item = &String> {
        self.aia_urls
            .iter()
            .chain(&self.ocsp_urls)
            .chain(&self.crl_urls)
            .chain(&self.cps_urls)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationStatus {
    Good,
    Revoked,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationSource {
    Crl,
    Ocsp,
}

/// CRL reason codes (RFC 5280 section 5.3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevocationReason {
    Unspecified,
    KeyCompromise,
    CaCompromise,
    AffiliationChanged,
    Superseded,
    CessationOfOperation,
    CertificateHold,
    RemoveFromCrl,
    PrivilegeWithdrawn,
    AaCompromise,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationFact {
    pub id: String,
    pub certificate_id: String,
    pub source: RevocationSource,
    pub status: RevocationStatus,
    pub production_date: DateTime<Utc>,
    #[serde(default)]
    pub revocation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reason: Option<RevocationReason>,
}

impl RevocationFact {
    /// Revoked with a revocation date not after `t`. A revoked status
    /// without a date counts as revoked at any time.
    pub fn is_revoked_at(&self, t: DateTime<Utc>) -> bool {
        self.status == RevocationStatus::Revoked
            && self.revocation_date.map_or(true, |d| d <= t)
    }

    pub fn is_suspension(&self) -> bool {
        self.reason == Some(RevocationReason::CertificateHold)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    Granted,
    Accredited,
    UnderSupervision,
    SupervisionInCessation,
    Withdrawn,
    SupervisionCeased,
    AccreditationCeased,
}

impl ServiceStatus {
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ServiceStatus::Granted
                | ServiceStatus::Accredited
                | ServiceStatus::UnderSupervision
                | ServiceStatus::SupervisionInCessation
        )
    }
}

/// One status-history entry of a trusted service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedServiceFact {
    /// Id of the certificate this service entry vouches for.
    pub service_digital_identifier: String,
    pub service_name: String,
    #[serde(default)]
    pub service_type: Option<String>,
    pub status: ServiceStatus,
    pub start_date: DateTime<Utc>,
    /// Exclusive end of the entry; open-ended when absent.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub qualifiers: Vec<String>,
}

impl TrustedServiceFact {
    pub fn covers(&self, t: DateTime<Utc>) -> bool {
        self.start_date <= t && self.end_date.map_or(true, |end| t < end)
    }

    pub fn is_active_at(&self, t: DateTime<Utc>) -> bool {
        self.status.is_active() && self.covers(t)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustServiceProviderFact {
    pub country_code: String,
    pub name: String,
    #[serde(default)]
    pub registration_id: Option<String>,
    #[serde(default)]
    pub services: Vec<TrustedServiceFact>,
}

impl TrustServiceProviderFact {
    pub fn references(&self, certificate_id: &str) -> bool {
        self.services
            .iter()
            .any(|s| s.service_digital_identifier == certificate_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureFact {
    pub id: String,
    #[serde(default)]
    pub signing_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub signing_certificate_id: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    /// Upstream verdict on the signature value.
    pub signature_intact: bool,
    /// Upstream verdict on the signed data digests.
    pub reference_data_intact: bool,
    #[serde(default)]
    pub signature_algorithm: Option<AlgorithmFact>,
    #[serde(default)]
    pub certificate_refs: Vec<String>,
    #[serde(default)]
    pub revocation_refs: Vec<String>,
    #[serde(default)]
    pub timestamp_refs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticData {
    #[serde(default)]
    pub validation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub certificates: Vec<CertificateFact>,
    #[serde(default)]
    pub revocations: Vec<RevocationFact>,
    #[serde(default)]
    pub signatures: Vec<SignatureFact>,
}

impl DiagnosticData {
    /// Parse and validate a JSON snapshot. Shape errors are input-contract
    /// violations, not generic JSON errors.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let data: DiagnosticData = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidInput(format!("diagnostic data: {e}")))?;
        data.validate()?;
        Ok(data)
    }

    pub fn from_json_slice(bytes: &[u8]) -> EngineResult<Self> {
        let data: DiagnosticData = serde_json::from_slice(bytes)
            .map_err(|e| EngineError::InvalidInput(format!("diagnostic data: {e}")))?;
        data.validate()?;
        Ok(data)
    }

    pub fn certificate(&self, id: &str) -> Option<&CertificateFact> {
        self.certificates.iter().find(|c| c.id == id)
    }

    /// Like [`certificate`](Self::certificate) but surfaces an unknown id as
    /// `NotFound`.
    pub fn used_certificate(&self, id: &str) -> EngineResult<&CertificateFact> {
        self.certificate(id)
            .ok_or_else(|| EngineError::certificate_not_found(id))
    }

    pub fn signature(&self, id: &str) -> Option<&SignatureFact> {
        self.signatures.iter().find(|s| s.id == id)
    }

    pub fn revocations_for<'a>(
        &'a self,
        certificate_id: &'a str,
    ) -> impl Iterator<Item = &'a RevocationFact> + 'a {
        self.revocations
            .iter()
            .filter(move |r| r.certificate_id == certificate_id)
    }

    /// Most recently produced revocation fact; ties go to the one listed last.
    pub fn latest_revocation_for(&self, certificate_id: &str) -> Option<&RevocationFact> {
        self.revocations
            .iter()
            .filter(|r| r.certificate_id == certificate_id)
            .max_by_key(|r| r.production_date)
    }

    /// Build the chain from `id` up through issuer links until a self-signed
    /// certificate or an unknown issuer.
    pub fn certificate_chain(&self, id: &str) -> EngineResult<CertificateChain<'_>> {
        let mut current = self.used_certificate(id)?;
        let mut seen: HashSet<&str> = HashSet::new();
        let mut elements = Vec::new();

        loop {
            seen.insert(current.id.as_str());
            elements.push(current);

            let issuer_id = match current.issuer_id.as_deref() {
                None => break,
                Some(issuer) if issuer == current.id => break,
                Some(issuer) => issuer,
            };
            if seen.contains(issuer_id) {
                return Err(EngineError::InvalidInput(format!(
                    "certificate chain of '{id}' contains a cycle at '{issuer_id}'"
                )));
            }
            current = self.certificate(issuer_id).ok_or_else(|| {
                EngineError::InvalidInput(format!(
                    "certificate '{}' references unknown issuer '{issuer_id}'",
                    current.id
                ))
            })?;
        }

        Ok(CertificateChain { elements })
    }

    /// Check the input contract: unique non-empty ids, resolvable references,
    /// acyclic issuer links, ordered validity windows and parseable URLs.
    pub fn validate(&self) -> EngineResult<()> {
        unique_ids("certificate", self.certificates.iter().map(|c| c.id.as_str()))?;
        unique_ids("revocation", self.revocations.iter().map(|r| r.id.as_str()))?;
        unique_ids("signature", self.signatures.iter().map(|s| s.id.as_str()))?;

        for cert in &self.certificates {
            if cert.not_before > cert.not_after {
                return Err(EngineError::InvalidInput(format!(
                    "certificate '{}' has notBefore after notAfter",
                    cert.id
                )));
            }
            for raw in cert.urls() {
                url::Url::parse(raw).map_err(|_| {
                    EngineError::InvalidInput(format!(
                        "certificate '{}' has an invalid URL: {raw}",
                        cert.id
                    ))
                })?;
            }
            for tsp in &cert.trust_service_providers {
                for service in &tsp.services {
                    if service.end_date.map_or(false, |end| end < service.start_date) {
                        return Err(EngineError::InvalidInput(format!(
                            "trusted service '{}' of '{}' ends before it starts",
                            service.service_name, tsp.name
                        )));
                    }
                }
            }
            // walks issuer links; fails on dangling issuers and cycles
            self.certificate_chain(&cert.id)?;
        }

        for revocation in &self.revocations {
            if self.certificate(&revocation.certificate_id).is_none() {
                return Err(EngineError::InvalidInput(format!(
                    "revocation '{}' references unknown certificate '{}'",
                    revocation.id, revocation.certificate_id
                )));
            }
        }

        for signature in &self.signatures {
            let cert_refs = signature
                .signing_certificate_id
                .iter()
                .chain(&signature.certificate_refs);
            for cert_id in cert_refs {
                if self.certificate(cert_id).is_none() {
                    return Err(EngineError::InvalidInput(format!(
                        "signature '{}' references unknown certificate '{cert_id}'",
                        signature.id
                    )));
                }
            }
            for revocation_id in &signature.revocation_refs {
                if !self.revocations.iter().any(|r| &r.id == revocation_id) {
                    return Err(EngineError::InvalidInput(format!(
                        "signature '{}' references unknown revocation '{revocation_id}'",
                        signature.id
                    )));
                }
            }
        }

        Ok(())
    }
}

fn unique_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> EngineResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(EngineError::InvalidInput(format!("{kind} with empty id")));
        }
        if !seen.insert(id) {
            return Err(EngineError::InvalidInput(format!("duplicate {kind} id '{id}'")));
        }
    }
    Ok(())
}

/// Certificates from a leaf up to its last resolvable ancestor. Each
/// element's issuer is the next element.
#[derive(Debug, Clone)]
pub struct CertificateChain<'a> {
    elements: Vec<&'a CertificateFact>,
}

impl<'a> CertificateChain<'a> {
    pub fn leaf(&self) -> &'a CertificateFact {
        self.elements[0]
    }

    pub fn elements(&self) -> &[&'a CertificateFact] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Position of the first trusted element.
    pub fn trust_anchor_index(&self) -> Option<usize> {
        self.elements.iter().position(|c| c.trusted)
    }

    pub fn trust_anchor(&self) -> Option<&'a CertificateFact> {
        self.trust_anchor_index().map(|i| self.elements[i])
    }

    /// The part of the chain subject to validation: leaf through trust
    /// anchor, or the whole chain when no anchor is reached.
    pub fn validated_elements(&self) -> &[&'a CertificateFact] {
        match self.trust_anchor_index() {
            Some(i) => &self.elements[..=i],
            None => &self.elements,
        }
    }
}
