#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};

use sigval_engine::domain::types::{
    AlgorithmFact, CertificateFact, DiagnosticData, KeyUsage, RevocationFact, RevocationReason,
    RevocationSource, RevocationStatus, ServiceStatus, SignatureFact, SubjectFact,
    TrustServiceProviderFact, TrustedServiceFact, ValidationConfig, ValidationPolicy,
};

pub const VALIDATION_TIME: &str = "2024-06-01T12:00:00Z";

/// Parse an RFC 3339 timestamp.
pub fn ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).expect("rfc3339").with_timezone(&Utc)
}

pub fn now() -> DateTime<Utc> {
    ts(VALIDATION_TIME)
}

pub fn rsa_sha256() -> AlgorithmFact {
    AlgorithmFact {
        digest_algorithm: "SHA256".into(),
        encryption_algorithm: "RSA".into(),
        key_length: 2048,
    }
}

/// A certificate valid 2020-2030 with a modern algorithm and a common name
/// derived from its id.
pub fn cert(id: &str, issuer: Option<&str>) -> CertificateFact {
    CertificateFact {
        id: id.into(),
        subject: SubjectFact {
            common_name: Some(format!("{id} CN")),
            country: Some("BE".into()),
            ..Default::default()
        },
        issuer_id: issuer.map(Into::into),
        not_before: ts("2020-01-01T00:00:00Z"),
        not_after: ts("2030-01-01T00:00:00Z"),
        key_usages: vec![],
        extended_key_usages: vec![],
        aia_urls: vec![],
        ocsp_urls: vec![],
        crl_urls: vec![],
        cps_urls: vec![],
        trusted: false,
        ca: false,
        signature_intact: true,
        signature_algorithm: Some(rsa_sha256()),
        trust_service_providers: vec![],
    }
}

pub fn leaf() -> CertificateFact {
    let mut c = cert("leaf", Some("ca"));
    c.key_usages = vec![KeyUsage::NonRepudiation];
    c.ocsp_urls = vec!["http://ocsp.example.com".into()];
    c
}

pub fn intermediate() -> CertificateFact {
    let mut c = cert("ca", Some("root"));
    c.ca = true;
    c.key_usages = vec![KeyUsage::KeyCertSign, KeyUsage::CrlSign];
    c.crl_urls = vec!["http://crl.example.com/ca.crl".into()];
    c
}

pub fn root() -> CertificateFact {
    let mut c = cert("root", Some("root"));
    c.ca = true;
    c.trusted = true;
    c.key_usages = vec![KeyUsage::KeyCertSign, KeyUsage::CrlSign];
    c
}

pub fn good_revocation(id: &str, certificate_id: &str, produced: DateTime<Utc>) -> RevocationFact {
    RevocationFact {
        id: id.into(),
        certificate_id: certificate_id.into(),
        source: RevocationSource::Ocsp,
        status: RevocationStatus::Good,
        production_date: produced,
        revocation_date: None,
        reason: None,
    }
}

pub fn revoked_revocation(
    id: &str,
    certificate_id: &str,
    produced: DateTime<Utc>,
    revoked_at: DateTime<Utc>,
) -> RevocationFact {
    RevocationFact {
        id: id.into(),
        certificate_id: certificate_id.into(),
        source: RevocationSource::Crl,
        status: RevocationStatus::Revoked,
        production_date: produced,
        revocation_date: Some(revoked_at),
        reason: Some(RevocationReason::KeyCompromise),
    }
}

/// leaf -> ca -> self-signed trusted root, with good revocation data for
/// leaf and ca produced one day before the validation time.
pub fn three_level_snapshot() -> DiagnosticData {
    DiagnosticData {
        validation_date: Some(now()),
        certificates: vec![leaf(), intermediate(), root()],
        revocations: vec![
            good_revocation("r-leaf", "leaf", now() - Duration::days(1)),
            good_revocation("r-ca", "ca", now() - Duration::days(1)),
        ],
        signatures: vec![],
    }
}

pub fn service(
    name: &str,
    certificate_id: &str,
    start: &str,
    end: Option<&str>,
    qualifiers: &[&str],
) -> TrustedServiceFact {
    TrustedServiceFact {
        service_digital_identifier: certificate_id.into(),
        service_name: name.into(),
        service_type: Some("http://uri.etsi.org/TrstSvc/Svctype/CA/QC".into()),
        status: ServiceStatus::Granted,
        start_date: ts(start),
        end_date: end.map(ts),
        qualifiers: qualifiers.iter().map(|q| q.to_string()).collect(),
    }
}

pub fn provider(name: &str, services: Vec<TrustedServiceFact>) -> TrustServiceProviderFact {
    TrustServiceProviderFact {
        country_code: "BE".into(),
        name: name.into(),
        registration_id: Some(format!("VATBE-{name}")),
        services,
    }
}

pub fn signature(id: &str, signing_certificate_id: Option<&str>) -> SignatureFact {
    SignatureFact {
        id: id.into(),
        signing_time: Some(now() - Duration::days(2)),
        signing_certificate_id: signing_certificate_id.map(Into::into),
        format: Some("PAdES-BASELINE-B".into()),
        signature_intact: true,
        reference_data_intact: true,
        signature_algorithm: Some(rsa_sha256()),
        certificate_refs: vec![],
        revocation_refs: vec![],
        timestamp_refs: vec![],
    }
}

pub fn config(data: DiagnosticData) -> ValidationConfig {
    ValidationConfig::secure_default(data).at(now())
}

pub fn config_with(data: DiagnosticData, policy: ValidationPolicy) -> ValidationConfig {
    config(data).with_policy(policy)
}
