use anyhow::Context;
use chrono::{DateTime, Utc};

use sigval_engine::domain::error::EngineError;
use sigval_engine::domain::types as dt;
use sigval_engine::{validate, validate_certificate, validate_certificates_blocking};

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    #[error("{message}")]
    Generic { message: String },
    #[error("{message}")]
    Config { message: String },
    #[error("{message}")]
    InvalidInput { message: String },
    #[error("{message}")]
    NotFound { message: String },
}

impl From<EngineError> for FfiError {
    fn from(e: EngineError) -> Self {
        let message = e.to_string();
        match e {
            EngineError::Config(_) => FfiError::Config { message },
            EngineError::InvalidInput(_) => FfiError::InvalidInput { message },
            EngineError::NotFound { .. } => FfiError::NotFound { message },
            _ => FfiError::Generic { message },
        }
    }
}

impl From<anyhow::Error> for FfiError {
    fn from(e: anyhow::Error) -> Self {
        FfiError::InvalidInput { message: format!("{e:#}") }
    }
}

// ===== FFI records (reports travel as JSON strings) =====

#[derive(uniffi::Record, Debug, Clone)]
pub struct FfiReports {
    pub detailed_report_json: String,
    pub simple_report_json: String,
}

#[derive(uniffi::Record, Debug, Clone)]
pub struct FfiCertificateReports {
    pub detailed_report_json: String,
    pub simple_certificate_report_json: String,
}

#[derive(uniffi::Record, Debug, Clone)]
pub struct FfiValidationConfig {
    pub diagnostic_data_json: String,
    /// Policy JSON; the secure default policy when absent.
    pub policy_json: Option<String>,
    /// RFC 3339 reference time; the snapshot's date or now when absent.
    pub validation_time: Option<String>,
}

impl TryFrom<FfiValidationConfig> for dt::ValidationConfig {
    type Error = FfiError;

    fn try_from(v: FfiValidationConfig) -> Result<Self, Self::Error> {
        let data = dt::DiagnosticData::from_json_str(&v.diagnostic_data_json)?;
        let policy = match v.policy_json.as_deref() {
            Some(json) => dt::ValidationPolicy::from_json_str(json)?,
            None => dt::ValidationPolicy::secure_default(),
        };
        let mut cfg = dt::ValidationConfig::secure_default(data).with_policy(policy);
        if let Some(raw) = v.validation_time.as_deref() {
            cfg = cfg.at(parse_time(raw)?);
        }
        Ok(cfg)
    }
}

fn parse_time(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    let t = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("invalid validation time '{raw}'"))?;
    Ok(t.with_timezone(&Utc))
}

// ===== High-level API, mirroring Rust surface =====

#[uniffi::export]
pub fn validate_ffi(cfg: FfiValidationConfig) -> Result<FfiReports, FfiError> {
    let cfg: dt::ValidationConfig = cfg.try_into()?;
    let reports = validate(&cfg)?;
    Ok(FfiReports {
        detailed_report_json: reports.detailed_report.to_json()?,
        simple_report_json: reports.simple_report.to_json()?,
    })
}

#[uniffi::export]
pub fn validate_certificate_ffi(
    cfg: FfiValidationConfig,
    certificate_id: String,
) -> Result<FfiCertificateReports, FfiError> {
    let cfg: dt::ValidationConfig = cfg.try_into()?;
    let reports = validate_certificate(&cfg, &certificate_id)?;
    Ok(FfiCertificateReports {
        detailed_report_json: reports.detailed_report.to_json()?,
        simple_certificate_report_json: reports.simple_certificate_report.to_json()?,
    })
}

#[uniffi::export]
pub fn validate_certificates_ffi(
    cfg: FfiValidationConfig,
    certificate_ids: Vec<String>,
) -> Result<Vec<FfiCertificateReports>, FfiError> {
    let cfg: dt::ValidationConfig = cfg.try_into()?;
    validate_certificates_blocking(cfg, certificate_ids)?
        .into_iter()
        .map(|r| -> Result<FfiCertificateReports, FfiError> {
            Ok(FfiCertificateReports {
                detailed_report_json: r.detailed_report.to_json()?,
                simple_certificate_report_json: r.simple_certificate_report.to_json()?,
            })
        })
        .collect()
}

/// The secure default policy, as a starting point for custom policies.
#[uniffi::export]
pub fn default_policy_json() -> Result<String, FfiError> {
    serde_json::to_string_pretty(&dt::ValidationPolicy::secure_default())
        .map_err(|e| FfiError::from(EngineError::from(e)))
}

uniffi::setup_scaffolding!();
