use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::core::{ConstraintCategory, Level};
use super::diagnostic::KeyUsage;
use crate::domain::error::{EngineError, EngineResult};

// Upper bound for any policy duration, keeps chrono arithmetic in range.
const MAX_POLICY_DURATION_SECS: i64 = 100 * 365 * 24 * 3600;

/// Centralized defaults for validation policies.
/// All opinionated defaults should be defined here for consistency.
pub struct PolicyDefaults;

impl PolicyDefaults {
    pub const NAME: &'static str = "secure-default";
    pub const LEVEL: Level = Level::Fail; // Fail-closed for every category
    pub const REVOCATION_MAX_FRESHNESS_SECS: i64 = 7 * 24 * 3600; // 7 days
    pub const REVOCATION_GRACE_PERIOD_SECS: i64 = 0; // No revocation data from the future
    pub const ALLOW_TRY_LATER: bool = false; // Missing revocation is NO_POE
    pub const CHECK_TRUST_ANCHOR_REVOCATION: bool = false; // Anchors are trusted as listed
    pub const MAX_CHAIN_LENGTH: Option<usize> = None; // No limit
    pub const SIGNING_KEY_USAGES: [KeyUsage; 2] = [KeyUsage::NonRepudiation, KeyUsage::DigitalSignature];
}

fn default_signing_key_usages() -> Vec<KeyUsage> {
    PolicyDefaults::SIGNING_KEY_USAGES.to_vec()
}

fn utc_date(y: i32, m: u32, d: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single()
}

/// Revocation thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevocationConstraints {
    /// Maximum age of the selected revocation fact at the reference time.
    pub max_freshness_secs: i64,
    /// How far past the reference time a fact may be produced and still apply.
    pub grace_period_secs: i64,
    /// Report missing revocation data as TRY_LATER instead of NO_POE.
    pub allow_try_later: bool,
    /// Also evaluate the trust anchor itself.
    pub check_trust_anchor: bool,
}

impl Default for RevocationConstraints {
    fn default() -> Self {
        Self {
            max_freshness_secs: PolicyDefaults::REVOCATION_MAX_FRESHNESS_SECS,
            grace_period_secs: PolicyDefaults::REVOCATION_GRACE_PERIOD_SECS,
            allow_try_later: PolicyDefaults::ALLOW_TRY_LATER,
            check_trust_anchor: PolicyDefaults::CHECK_TRUST_ANCHOR_REVOCATION,
        }
    }
}

impl RevocationConstraints {
    pub fn max_freshness(&self) -> Duration {
        Duration::seconds(self.max_freshness_secs)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::seconds(self.grace_period_secs)
    }
}

/// An accepted algorithm, optionally only until a cutoff date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmConstraint {
    pub name: String,
    #[serde(default)]
    pub expiration: Option<DateTime<Utc>>,
}

impl AlgorithmConstraint {
    pub fn new(name: &str, expiration: Option<DateTime<Utc>>) -> Self {
        Self { name: name.to_string(), expiration }
    }

    pub fn is_acceptable_at(&self, t: DateTime<Utc>) -> bool {
        self.expiration.map_or(true, |exp| t < exp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyLengthConstraint {
    pub algorithm: String,
    pub min_length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CryptographicConstraints {
    pub acceptable_digest_algorithms: Vec<AlgorithmConstraint>,
    pub acceptable_encryption_algorithms: Vec<AlgorithmConstraint>,
    pub min_key_lengths: Vec<KeyLengthConstraint>,
}

impl Default for CryptographicConstraints {
    fn default() -> Self {
        Self {
            acceptable_digest_algorithms: vec![
                AlgorithmConstraint::new("SHA1", utc_date(2009, 12, 31)),
                AlgorithmConstraint::new("SHA224", utc_date(2029, 1, 1)),
                AlgorithmConstraint::new("SHA256", None),
                AlgorithmConstraint::new("SHA384", None),
                AlgorithmConstraint::new("SHA512", None),
                AlgorithmConstraint::new("SHA3-256", None),
                AlgorithmConstraint::new("SHA3-384", None),
                AlgorithmConstraint::new("SHA3-512", None),
            ],
            acceptable_encryption_algorithms: vec![
                AlgorithmConstraint::new("RSA", None),
                AlgorithmConstraint::new("RSASSA-PSS", None),
                AlgorithmConstraint::new("ECDSA", None),
                AlgorithmConstraint::new("EdDSA", None),
                AlgorithmConstraint::new("DSA", utc_date(2024, 1, 1)),
            ],
            min_key_lengths: vec![
                KeyLengthConstraint { algorithm: "RSA".into(), min_length: 1900 },
                KeyLengthConstraint { algorithm: "RSASSA-PSS".into(), min_length: 1900 },
                KeyLengthConstraint { algorithm: "DSA".into(), min_length: 2048 },
                KeyLengthConstraint { algorithm: "ECDSA".into(), min_length: 256 },
            ],
        }
    }
}

/// Validation policy: an enforcement level per constraint category plus
/// the thresholds the building blocks read. Passed explicitly into each run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationPolicy {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub constraints: BTreeMap<ConstraintCategory, Level>,
    #[serde(default)]
    pub revocation: RevocationConstraints,
    #[serde(default)]
    pub cryptographic: CryptographicConstraints,
    #[serde(default)]
    pub max_chain_length: Option<usize>,
    /// Key usages accepted for a signing (non-CA) leaf; any one suffices.
    #[serde(default = "default_signing_key_usages")]
    pub signing_key_usages: Vec<KeyUsage>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::secure_default()
    }
}

impl ValidationPolicy {
    /// Secure opinionated defaults: every category at FAIL.
    pub fn secure_default() -> Self {
        Self {
            name: PolicyDefaults::NAME.to_string(),
            version: None,
            constraints: ConstraintCategory::ALL
                .iter()
                .map(|c| (*c, PolicyDefaults::LEVEL))
                .collect(),
            revocation: RevocationConstraints::default(),
            cryptographic: CryptographicConstraints::default(),
            max_chain_length: PolicyDefaults::MAX_CHAIN_LENGTH,
            signing_key_usages: default_signing_key_usages(),
        }
    }

    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let policy: ValidationPolicy = serde_json::from_str(json)
            .map_err(|e| EngineError::Config(format!("policy: {e}")))?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn from_path(path: impl AsRef<Path>) -> EngineResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn with_level(mut self, category: ConstraintCategory, level: Level) -> Self {
        self.constraints.insert(category, level);
        self
    }

    /// Level for a category. A validated policy always has one; anything
    /// else falls back to FAIL.
    pub fn level(&self, category: ConstraintCategory) -> Level {
        self.constraints.get(&category).copied().unwrap_or(Level::Fail)
    }

    /// Eager configuration check, run before any evaluation.
    pub fn validate(&self) -> EngineResult<()> {
        for category in ConstraintCategory::ALL {
            if !self.constraints.contains_key(&category) {
                return Err(EngineError::Config(format!(
                    "missing enforcement level for {category}"
                )));
            }
        }
        if self.max_chain_length == Some(0) {
            return Err(EngineError::Config("max chain length must be at least 1".into()));
        }
        check_duration("revocation max freshness", self.revocation.max_freshness_secs)?;
        check_duration("revocation grace period", self.revocation.grace_period_secs)?;

        let crypto = &self.cryptographic;
        let names = crypto
            .acceptable_digest_algorithms
            .iter()
            .chain(&crypto.acceptable_encryption_algorithms)
            .map(|a| a.name.as_str())
            .chain(crypto.min_key_lengths.iter().map(|k| k.algorithm.as_str()));
        for name in names {
            if name.trim().is_empty() {
                return Err(EngineError::Config("algorithm names must not be empty".into()));
            }
        }

        if self.level(ConstraintCategory::KeyUsage) != Level::Ignore
            && self.signing_key_usages.is_empty()
        {
            return Err(EngineError::Config(
                "signing key usages must not be empty while KEY_USAGE is enforced".into(),
            ));
        }
        Ok(())
    }
}

fn check_duration(what: &str, secs: i64) -> EngineResult<()> {
    if !(0..=MAX_POLICY_DURATION_SECS).contains(&secs) {
        return Err(EngineError::Config(format!("{what} out of range: {secs}s")));
    }
    Ok(())
}
