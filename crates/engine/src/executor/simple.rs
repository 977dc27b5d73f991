// executor/simple.rs

use crate::domain::error::EngineResult;
use crate::domain::report::{
  ChainEntry, ConstraintStatus, DetailedReport, SignatureConclusion, SignatureSummary, SimpleReport,
};
use crate::domain::types::{DiagnosticData, Indication};

/// Project the detailed report into one summary per signature.
pub fn build_simple_report(
  data: &DiagnosticData,
  detailed: &DetailedReport,
) -> EngineResult<SimpleReport> {
  let signatures = detailed
    .signatures
    .values()
    .map(|sc| summarize(data, sc))
    .collect::<EngineResult<Vec<_>>>()?;

  let valid_signatures_count = signatures
    .iter()
    .filter(|s| s.indication == Indication::Passed)
    .count();

  Ok(SimpleReport {
    validation_time: detailed.validation_time,
    policy_name: detailed.policy_name.clone(),
    signatures_count: signatures.len(),
    valid_signatures_count,
    signatures,
  })
}

fn summarize(data: &DiagnosticData, sc: &SignatureConclusion) -> EngineResult<SignatureSummary> {
  let messages = |status: ConstraintStatus| -> Vec<String> {
    sc.all_constraints()
      .filter(|c| c.status == status)
      .map(|c| c.message_key.clone())
      .collect()
  };

  let (signed_by, certificate_chain) = match sc.signing_certificate_id.as_deref() {
    Some(id) => {
      let chain = data.certificate_chain(id)?;
      let entries = chain
        .elements()
        .iter()
        .map(|c| ChainEntry { id: c.id.clone(), name: c.subject.common_name.clone() })
        .collect();
      (chain.leaf().subject.common_name.clone(), entries)
    }
    None => (None, Vec::new()),
  };

  Ok(SignatureSummary {
    id: sc.signature_id.clone(),
    signing_time: sc.signing_time,
    signed_by,
    format: data.signature(&sc.signature_id).and_then(|s| s.format.clone()),
    indication: sc.conclusion.indication,
    sub_indication: sc.conclusion.sub_indication,
    errors: messages(ConstraintStatus::NotOk),
    warnings: messages(ConstraintStatus::Warning),
    certificate_chain,
    qualification: sc.qualification_at_signing_time.as_ref().map(|q| q.qualification),
  })
}
