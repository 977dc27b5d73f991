// crates/engine/src/domain/error.rs
use thiserror::Error;

/// Fatal conditions of a validation run. Evaluation outcomes (PASSED, FAILED,
/// INDETERMINATE) are never reported through this type.
#[derive(Debug, Error)]
pub enum EngineError {
  /// Policy misconfiguration, detected before any certificate is evaluated.
  #[error("configuration: {0}")]
  Config(String),

  /// The diagnostic data violates its input contract.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("{kind} not found: {id}")]
  NotFound { kind: &'static str, id: String },

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),

  // Raised when a parallel run's worker task panics or is cancelled.
  #[error("internal panic: {0}")]
  Panic(String),
}

impl EngineError {
  pub fn certificate_not_found(id: impl Into<String>) -> Self {
    EngineError::NotFound { kind: "certificate", id: id.into() }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, EngineError::NotFound { .. })
  }
}

pub type EngineResult<T> = Result<T, EngineError>;
