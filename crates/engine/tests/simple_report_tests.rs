mod common;

use sigval_engine as sv;
use sv::{Indication, SubIndication};

#[test]
fn simple_report_counts_and_summaries() {
    let mut data = common::three_level_snapshot();
    data.signatures = vec![
        common::signature("sig-a", Some("leaf")),
        common::signature("sig-b", Some("leaf")),
    ];
    data.signatures[1].reference_data_intact = false;

    let reports = sv::validate(&common::config(data)).unwrap();
    let simple = &reports.simple_report;
    assert_eq!(simple.signatures_count, 2);
    assert_eq!(simple.valid_signatures_count, 1);

    let a = simple.signature("sig-a").unwrap();
    assert_eq!(a.indication, Indication::Passed);
    assert_eq!(a.signed_by.as_deref(), Some("leaf CN"));
    assert_eq!(a.format.as_deref(), Some("PAdES-BASELINE-B"));
    assert!(a.errors.is_empty());
    let chain: Vec<_> = a.certificate_chain.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(chain, ["leaf", "ca", "root"]);

    let b = simple.signature("sig-b").unwrap();
    assert_eq!(b.indication, Indication::Failed);
    assert_eq!(b.sub_indication, Some(SubIndication::HashFailure));
    assert_eq!(b.errors, vec!["signature.hashFailure".to_string()]);
}

#[test]
fn warnings_surface_in_simple_report() {
    let mut data = common::three_level_snapshot();
    data.certificates[0].key_usages.clear();
    data.signatures = vec![common::signature("sig", Some("leaf"))];
    let policy = sv::ValidationPolicy::secure_default()
        .with_level(sv::ConstraintCategory::KeyUsage, sv::Level::Warn);

    let reports = sv::validate(&common::config_with(data, policy)).unwrap();
    let sig = reports.simple_report.signature("sig").unwrap();
    assert_eq!(sig.indication, Indication::Passed);
    assert_eq!(sig.warnings, vec!["certificate.keyUsageMismatch".to_string()]);
}

#[test]
fn snapshot_without_signatures_still_reports() {
    let reports = sv::validate(&common::config(common::three_level_snapshot())).unwrap();
    assert_eq!(reports.simple_report.signatures_count, 0);
    assert!(reports.simple_report.signatures.is_empty());
    let json = reports.simple_report.to_json().unwrap();
    assert!(json.contains("\"signaturesCount\":0"));
}
