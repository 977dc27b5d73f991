// executor/certificate.rs

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::domain::error::EngineResult;
use crate::domain::report::{
  ChainItem, DetailedReport, RevocationSummary, SimpleCertificateReport, TrustAnchorLabel,
};
use crate::domain::types::{CertificateFact, DiagnosticData, OidFact};

/// Flattened chain view of one certificate: the certificate itself, then
/// each ancestor reachable through issuer links.
pub fn build_simple_certificate_report(
  data: &DiagnosticData,
  detailed: &DetailedReport,
  validation_time: DateTime<Utc>,
  certificate_id: &str,
) -> EngineResult<SimpleCertificateReport> {
  let chain = data.certificate_chain(certificate_id)?;

  let mut items: Vec<ChainItem> = chain
    .elements()
    .iter()
    .map(|cert| chain_item(data, detailed, cert))
    .collect();

  if let Some(first) = items.first_mut() {
    first.qualification_at_issuance = detailed.qualification_at_issuance(certificate_id);
    first.qualification_at_validation = detailed.qualification_at_validation(certificate_id);
  }

  Ok(SimpleCertificateReport { validation_time, chain: items })
}

fn chain_item(data: &DiagnosticData, detailed: &DetailedReport, cert: &CertificateFact) -> ChainItem {
  let revocation = data
    .latest_revocation_for(&cert.id)
    .map(|r| RevocationSummary {
      production_date: Some(r.production_date),
      revocation_date: r.revocation_date,
      revocation_reason: r.reason,
    })
    .unwrap_or_default();

  ChainItem {
    id: cert.id.clone(),
    subject: cert.subject.clone(),
    // a self-signed certificate still names itself as issuer
    issuer_id: cert.issuer_id.clone(),
    not_before: cert.not_before,
    not_after: cert.not_after,
    key_usages: cert.key_usages.clone(),
    extended_key_usages: readable(&cert.extended_key_usages),
    aia_urls: non_empty(&cert.aia_urls),
    ocsp_urls: non_empty(&cert.ocsp_urls),
    crl_urls: non_empty(&cert.crl_urls),
    cps_urls: non_empty(&cert.cps_urls),
    pds_urls: None,
    revocation,
    trust_anchors: trust_anchor_labels(cert),
    indication: detailed.certificate_indication(&cert.id),
    qualification_at_issuance: None,
    qualification_at_validation: None,
  }
}

fn readable(oids: &[OidFact]) -> Option<Vec<String>> {
  if oids.is_empty() {
    return None;
  }
  Some(oids.iter().map(|o| o.readable().to_string()).collect())
}

fn non_empty(urls: &[String]) -> Option<Vec<String>> {
  if urls.is_empty() {
    None
  } else {
    Some(urls.to_vec())
  }
}

/// Labels only for trusted certificates, from providers that list a service
/// for this certificate id. One label per distinct service name per provider.
fn trust_anchor_labels(cert: &CertificateFact) -> Option<Vec<TrustAnchorLabel>> {
  if !cert.trusted {
    return None;
  }
  let mut labels = Vec::new();
  for tsp in cert.trust_service_providers.iter().filter(|t| t.references(&cert.id)) {
    let names: BTreeSet<&str> = tsp.services.iter().map(|s| s.service_name.as_str()).collect();
    labels.extend(names.into_iter().map(|name| TrustAnchorLabel {
      country_code: tsp.country_code.clone(),
      trust_service_provider: tsp.name.clone(),
      trust_service_provider_registration_id: tsp.registration_id.clone(),
      trust_service_name: name.to_string(),
    }));
  }
  Some(labels)
}
