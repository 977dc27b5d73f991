// crates/engine/src/domain/validation_engine.rs

use super::error::EngineResult;
use super::report::{CertificateReports, Reports};

/// Trait implemented by validation backends (the ETSI-style policy
/// executor today, others later).
pub trait ValidationEngine {
    type Config;

    /// Validate every certificate and signature in the snapshot.
    fn validate(config: &Self::Config) -> EngineResult<Reports>;

    /// Validate one certificate and project its simple certificate report.
    fn validate_certificate(
        config: &Self::Config,
        certificate_id: &str,
    ) -> EngineResult<CertificateReports>;
}
