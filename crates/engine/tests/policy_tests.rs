mod common;

use std::io::Write;

use sigval_engine as sv;
use sv::{ConstraintCategory, EngineError, Level, PolicyDefaults, ValidationPolicy};

fn full_policy_json() -> serde_json::Value {
    serde_json::json!({
        "name": "strict-qes",
        "version": "2",
        "constraints": {
            "TRUST_ANCHOR": "FAIL",
            "CHAIN_LENGTH": "FAIL",
            "VALIDITY_PERIOD": "FAIL",
            "CERTIFICATE_SIGNATURE": "FAIL",
            "KEY_USAGE": "WARN",
            "CRYPTOGRAPHIC_ALGORITHM": "FAIL",
            "REVOCATION": "FAIL",
            "REVOCATION_FRESHNESS": "IGNORE",
            "SIGNING_CERTIFICATE": "FAIL",
            "SIGNATURE_INTACT": "FAIL"
        },
        "revocation": { "maxFreshnessSecs": 86400, "allowTryLater": true },
        "maxChainLength": 4
    })
}

#[test]
fn policy_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policy.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(full_policy_json().to_string().as_bytes()).unwrap();

    let policy = ValidationPolicy::from_path(&path).unwrap();
    assert_eq!(policy.name, "strict-qes");
    assert_eq!(policy.version.as_deref(), Some("2"));
    assert_eq!(policy.level(ConstraintCategory::KeyUsage), Level::Warn);
    assert_eq!(policy.level(ConstraintCategory::RevocationFreshness), Level::Ignore);
    assert_eq!(policy.revocation.max_freshness_secs, 86400);
    assert!(policy.revocation.allow_try_later);
    // unspecified thresholds keep their defaults
    assert_eq!(
        policy.revocation.grace_period_secs,
        PolicyDefaults::REVOCATION_GRACE_PERIOD_SECS
    );
    assert_eq!(policy.max_chain_length, Some(4));
    assert_eq!(policy.signing_key_usages, PolicyDefaults::SIGNING_KEY_USAGES.to_vec());
}

#[test]
fn missing_policy_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ValidationPolicy::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, EngineError::Io(_)));
}

#[test]
fn missing_category_level_is_config_error() {
    let mut json = full_policy_json();
    json["constraints"].as_object_mut().unwrap().remove("REVOCATION");
    let err = ValidationPolicy::from_json_str(&json.to_string()).unwrap_err();
    assert!(matches!(err, EngineError::Config(ref m) if m.contains("REVOCATION")));
}

#[test]
fn malformed_policy_is_config_error() {
    let err = ValidationPolicy::from_json_str("{\"name\": 3}").unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));
    let mut json = full_policy_json();
    json["maxChainLength"] = serde_json::json!(0);
    assert!(matches!(
        ValidationPolicy::from_json_str(&json.to_string()),
        Err(EngineError::Config(_))
    ));
}

#[test]
fn misconfigured_policy_fails_before_evaluation() {
    let mut policy = ValidationPolicy::secure_default();
    policy.revocation.grace_period_secs = -5;
    let cfg = common::config_with(common::three_level_snapshot(), policy);
    assert!(matches!(sv::validate(&cfg), Err(EngineError::Config(_))));
    assert!(matches!(sv::validate_certificate(&cfg, "leaf"), Err(EngineError::Config(_))));
}

#[test]
fn empty_signing_key_usages_allowed_only_when_key_usage_ignored() {
    let mut policy = ValidationPolicy::secure_default();
    policy.signing_key_usages.clear();
    assert!(matches!(policy.validate(), Err(EngineError::Config(_))));
    let policy = policy.with_level(ConstraintCategory::KeyUsage, Level::Ignore);
    assert!(policy.validate().is_ok());
}

#[test]
fn tighter_max_freshness_only_degrades() {
    let data = common::three_level_snapshot();
    let mut previous: Option<sv::Conclusion> = None;
    for hours in [240, 72, 25, 23, 1, 0] {
        let mut policy = ValidationPolicy::secure_default();
        policy.revocation.max_freshness_secs = hours * 3600;
        let reports = sv::validate(&common::config_with(data.clone(), policy)).unwrap();
        let conclusion = reports.detailed_report.certificate_indication("leaf").unwrap();
        if let Some(prev) = previous {
            assert!(prev.is_passed() || !conclusion.is_passed());
        }
        if !conclusion.is_passed() {
            assert_eq!(
                conclusion,
                sv::Conclusion::indeterminate(sv::SubIndication::RevocationNotFresh)
            );
        }
        previous = Some(conclusion);
    }
    assert!(!previous.unwrap().is_passed());
}
