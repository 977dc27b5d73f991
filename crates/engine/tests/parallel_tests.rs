mod common;

use chrono::Duration;
use sigval_engine as sv;
use sv::{Conclusion, SubIndication};

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn snapshot() -> sv::DiagnosticData {
    let mut data = common::three_level_snapshot();
    data.revocations.push(common::revoked_revocation(
        "r-leaf-revoked",
        "leaf",
        common::now() - Duration::hours(2),
        common::now() - Duration::days(1),
    ));
    data
}

#[test]
fn reports_come_back_in_request_order() {
    let cfg = common::config(snapshot());
    let reports = sv::validate_certificates_blocking(cfg, ids(&["root", "leaf", "ca"])).unwrap();
    let firsts: Vec<_> = reports
        .iter()
        .map(|r| r.simple_certificate_report.chain[0].id.as_str())
        .collect();
    assert_eq!(firsts, ["root", "leaf", "ca"]);
    assert_eq!(
        reports[1].detailed_report.certificate_indication("leaf"),
        Some(Conclusion::failed(SubIndication::Revoked))
    );
}

#[test]
fn parallel_matches_sequential() {
    let cfg = common::config(snapshot());
    let sequential: Vec<_> = ["leaf", "ca"]
        .iter()
        .map(|id| sv::validate_certificate(&cfg, id).unwrap())
        .collect();
    let parallel = sv::validate_certificates_blocking(cfg, ids(&["leaf", "ca"])).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn unknown_id_fails_the_whole_batch() {
    let cfg = common::config(snapshot());
    let err = sv::validate_certificates_blocking(cfg, ids(&["leaf", "missing"])).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn async_runner_inside_multithread_runtime() {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("build rt");
    let cfg = common::config(snapshot());
    let reports = rt
        .block_on(sv::validate_certificates(cfg.clone(), ids(&["ca", "leaf"])))
        .unwrap();
    assert_eq!(reports.len(), 2);

    // the blocking wrapper also works from inside the runtime
    let nested = rt
        .block_on(async move { sv::validate_certificates_blocking(cfg, ids(&["ca"])) })
        .unwrap();
    assert_eq!(nested[0].detailed_report, reports[0].detailed_report);
}

#[test]
fn blocking_runner_inside_current_thread_runtime() {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("build rt");
    let cfg = common::config(snapshot());
    let reports = rt
        .block_on(async move { sv::validate_certificates_blocking(cfg, ids(&["leaf", "ca"])) })
        .unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1].simple_certificate_report.chain[0].id, "ca");
}

#[test]
fn failing_id_first_in_batch_is_reported_after_all_tasks_join() {
    let cfg = common::config(snapshot());
    let err = sv::validate_certificates_blocking(cfg, ids(&["missing", "leaf", "ca"])).unwrap_err();
    assert!(err.is_not_found());
}
