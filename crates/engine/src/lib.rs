// crates/engine/src/lib.rs

//! Public facade for the signature validation engine.
//! Exposes a stable API and re-exports types for consumers (services, FFI).

pub mod blocks;
pub mod domain;
pub mod executor;

use domain::error::EngineResult;
use domain::report::{CertificateReports, Reports};
use domain::types::ValidationConfig;

/// High-level helpers for the common path.
/// Inputs are checked eagerly; callers get complete reports or an error.

pub fn validate(cfg: &ValidationConfig) -> EngineResult<Reports> {
    executor::PolicyExecutor::validate(cfg)
}

/// Certificate-only validation: detailed report over the certificate's chain
/// plus the simple certificate report. Unknown ids are `NotFound`.
pub fn validate_certificate(cfg: &ValidationConfig, certificate_id: &str) -> EngineResult<CertificateReports> {
    executor::PolicyExecutor::validate_certificate(cfg, certificate_id)
}

// Re-exports for convenience
pub use blocks::{determine_qualification, evaluate_freshness, validate_chain, validate_signature};
pub use domain::error::EngineError;
pub use domain::report::{
    ChainItem, DetailedReport, SignatureSummary, SimpleCertificateReport, SimpleReport,
};
pub use domain::types::{
    Conclusion, ConstraintCategory, DiagnosticData, Indication, Level, PolicyDefaults,
    Qualification, SubIndication, ValidationPolicy,
};
pub use domain::validation_engine::ValidationEngine;
pub use executor::{validate_certificates, validate_certificates_blocking, PolicyExecutor};
