// blocks/qualification.rs

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::constants::*;
use crate::domain::report::{MatchedService, QualificationResult};
use crate::domain::types::{CertificateFact, Qualification};

const QC_MARKERS: [&str; 6] = [
  QC_STATEMENT, QC_WITH_QSCD, QC_WITH_SSCD, QC_QSCD_MANAGED_ON_BEHALF, QC_FOR_ESIG, QC_FOR_ESEAL,
];
const QSCD_MARKERS: [&str; 3] = [QC_WITH_QSCD, QC_WITH_SSCD, QC_QSCD_MANAGED_ON_BEHALF];
const NO_QSCD_MARKERS: [&str; 2] = [QC_NO_QSCD, QC_NO_SSCD];

/// Canonical names for one qualifier value. Accepts short names, trusted
/// list URIs ending in a short name, and `+`-joined shorthand such as
/// `QC+QSCD`. Unknown qualifiers are kept verbatim.
pub fn canonical_qualifiers(raw: &str) -> Vec<String> {
  let raw = raw.trim();
  let name = raw.rsplit('/').next().unwrap_or(raw);
  name
    .split('+')
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .map(|part| match QUALIFIER_ALIASES.get(&part.to_ascii_lowercase()) {
      Some(canonical) => (*canonical).to_string(),
      None => part.to_string(),
    })
    .collect()
}

/// Qualification of `cert` at `instant`, from the union of the qualifiers of
/// every active trusted service entry covering that instant.
pub fn determine_qualification(cert: &CertificateFact, instant: DateTime<Utc>) -> QualificationResult {
  let has_records = cert.trust_service_providers.iter().any(|tsp| !tsp.services.is_empty());

  let mut matched = BTreeSet::new();
  let mut qualifiers = BTreeSet::new();
  for tsp in &cert.trust_service_providers {
    for service in tsp.services.iter().filter(|s| s.is_active_at(instant)) {
      matched.insert(MatchedService {
        trust_service_provider: tsp.name.clone(),
        service_name: service.service_name.clone(),
      });
      qualifiers.extend(service.qualifiers.iter().flat_map(|q| canonical_qualifiers(q)));
    }
  }

  let qualification = if !has_records {
    Qualification::NotApplicable
  } else if matched.is_empty() {
    Qualification::NotQualified
  } else {
    label(&cert.id, &qualifiers)
  };

  tracing::debug!(
    certificate_id = %cert.id,
    %instant,
    matched = matched.len(),
    %qualification,
    "qualification determined"
  );

  QualificationResult {
    instant,
    qualification,
    matched_services: matched.into_iter().collect(),
    qualifiers: qualifiers.into_iter().collect(),
  }
}

fn has_any(qualifiers: &BTreeSet<String>, names: &[&str]) -> bool {
  names.iter().any(|n| qualifiers.contains(*n))
}

fn label(certificate_id: &str, qualifiers: &BTreeSet<String>) -> Qualification {
  if qualifiers.contains(NOT_QUALIFIED) || !has_any(qualifiers, &QC_MARKERS) {
    return Qualification::NotQualified;
  }
  match (has_any(qualifiers, &QSCD_MARKERS), has_any(qualifiers, &NO_QSCD_MARKERS)) {
    (true, false) => Qualification::QcWithQscd,
    (true, true) => {
      tracing::warn!(certificate_id, "conflicting QSCD qualifiers, not claiming QSCD");
      Qualification::Qc
    }
    _ => Qualification::Qc,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::types::{
    ServiceStatus, SubjectFact, TrustServiceProviderFact, TrustedServiceFact,
  };
  use chrono::TimeZone;

  fn date(y: i32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, 1, 1, 0, 0, 0).unwrap()
  }

  fn service(name: &str, start: i32, end: Option<i32>, qualifiers: &[&str]) -> TrustedServiceFact {
    TrustedServiceFact {
      service_digital_identifier: "ca".into(),
      service_name: name.into(),
      service_type: None,
      status: ServiceStatus::Granted,
      start_date: date(start),
      end_date: end.map(date),
      qualifiers: qualifiers.iter().map(|q| q.to_string()).collect(),
    }
  }

  fn cert(services: Vec<TrustedServiceFact>) -> CertificateFact {
    CertificateFact {
      id: "leaf".into(),
      subject: SubjectFact::default(),
      issuer_id: Some("ca".into()),
      not_before: date(2021),
      not_after: date(2026),
      key_usages: vec![],
      extended_key_usages: vec![],
      aia_urls: vec![],
      ocsp_urls: vec![],
      crl_urls: vec![],
      cps_urls: vec![],
      trusted: false,
      ca: false,
      signature_intact: true,
      signature_algorithm: None,
      trust_service_providers: vec![TrustServiceProviderFact {
        country_code: "BE".into(),
        name: "Provider".into(),
        registration_id: None,
        services,
      }],
    }
  }

  #[test]
  fn uri_and_shorthand_qualifiers_are_canonicalized() {
    assert_eq!(
      canonical_qualifiers("http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/QCWithQSCD"),
      vec![QC_WITH_QSCD.to_string()]
    );
    assert_eq!(
      canonical_qualifiers("QC + QSCD"),
      vec![QC_STATEMENT.to_string(), QC_WITH_QSCD.to_string()]
    );
    assert_eq!(canonical_qualifiers("Custom"), vec!["Custom".to_string()]);
  }

  #[test]
  fn union_across_services_yields_qc_with_qscd() {
    let c = cert(vec![
      service("a", 2020, None, &[QC_STATEMENT]),
      service("b", 2020, None, &[QC_WITH_QSCD]),
    ]);
    let result = determine_qualification(&c, date(2022));
    assert_eq!(result.qualification, Qualification::QcWithQscd);
    assert_eq!(result.matched_services.len(), 2);
  }

  #[test]
  fn conflicting_qscd_qualifiers_fall_back_to_qc() {
    let c = cert(vec![service("a", 2020, None, &[QC_WITH_QSCD, QC_NO_QSCD])]);
    assert_eq!(determine_qualification(&c, date(2022)).qualification, Qualification::Qc);
  }

  #[test]
  fn not_qualified_marker_and_missing_qc_marker() {
    let c = cert(vec![service("a", 2020, None, &[QC_STATEMENT, NOT_QUALIFIED])]);
    assert_eq!(determine_qualification(&c, date(2022)).qualification, Qualification::NotQualified);
    let c = cert(vec![service("a", 2020, None, &[QC_FOR_LEGAL_PERSON])]);
    assert_eq!(determine_qualification(&c, date(2022)).qualification, Qualification::NotQualified);
  }

  #[test]
  fn interval_end_is_exclusive_and_withdrawn_never_matches() {
    let c = cert(vec![service("a", 2020, Some(2022), &[QC_STATEMENT])]);
    assert_eq!(determine_qualification(&c, date(2022)).qualification, Qualification::NotQualified);

    let mut withdrawn = service("a", 2020, None, &[QC_STATEMENT]);
    withdrawn.status = ServiceStatus::Withdrawn;
    let c = cert(vec![withdrawn]);
    assert_eq!(determine_qualification(&c, date(2022)).qualification, Qualification::NotQualified);
  }

  #[test]
  fn no_records_is_not_applicable() {
    let mut c = cert(vec![]);
    c.trust_service_providers.clear();
    assert_eq!(determine_qualification(&c, date(2022)).qualification, Qualification::NotApplicable);
  }
}
