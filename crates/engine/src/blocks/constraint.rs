// blocks/constraint.rs

use crate::domain::report::{ConstraintEvaluation, ConstraintStatus};
use crate::domain::types::{Conclusion, ConstraintCategory, Level, ValidationPolicy};

/// Result of evaluating one constraint, before the policy level applies.
#[derive(Debug, Clone)]
pub(crate) enum Check {
  Pass { message_key: &'static str, evidence_id: Option<String> },
  Fail { message_key: &'static str, conclusion: Conclusion, evidence_id: Option<String> },
}

impl Check {
  pub fn pass(message_key: &'static str) -> Self {
    Check::Pass { message_key, evidence_id: None }
  }

  pub fn fail(message_key: &'static str, conclusion: Conclusion) -> Self {
    Check::Fail { message_key, conclusion, evidence_id: None }
  }

  pub fn with_evidence(mut self, id: &str) -> Self {
    match &mut self {
      Check::Pass { evidence_id, .. } | Check::Fail { evidence_id, .. } => {
        *evidence_id = Some(id.to_string());
      }
    }
    self
  }
}

/// Ordered constraint trail of one subject (a certificate, a chain or a
/// signature). Every enabled check is recorded; the conclusion is the
/// first failure at FAIL level.
pub(crate) struct ConstraintTrail<'p> {
  policy: &'p ValidationPolicy,
  subject: &'p str,
  conclusion: Conclusion,
  evaluations: Vec<ConstraintEvaluation>,
}

impl<'p> ConstraintTrail<'p> {
  pub fn new(policy: &'p ValidationPolicy, subject: &'p str) -> Self {
    Self { policy, subject, conclusion: Conclusion::passed(), evaluations: Vec::new() }
  }

  /// Evaluate `check` unless the category is ignored, then record it.
  pub fn record<F>(&mut self, category: ConstraintCategory, check: F)
  where
    F: FnOnce() -> Check,
  {
    let level = self.policy.level(category);
    if level == Level::Ignore {
      return;
    }

    let evaluation = match check() {
      Check::Pass { message_key, evidence_id } => ConstraintEvaluation {
        category,
        level,
        status: ConstraintStatus::Ok,
        message_key: message_key.to_string(),
        sub_indication: None,
        evidence_id,
      },
      Check::Fail { message_key, conclusion, evidence_id } => {
        let status = match level {
          Level::Fail => {
            if self.conclusion.is_passed() {
              self.conclusion = conclusion;
            }
            ConstraintStatus::NotOk
          }
          _ => {
            tracing::warn!(subject = self.subject, %category, message_key, "constraint failed at WARN level");
            ConstraintStatus::Warning
          }
        };
        ConstraintEvaluation {
          category,
          level,
          status,
          message_key: message_key.to_string(),
          sub_indication: conclusion.sub_indication,
          evidence_id,
        }
      }
    };
    self.evaluations.push(evaluation);
  }

  pub fn finish(self) -> (Conclusion, Vec<ConstraintEvaluation>) {
    (self.conclusion, self.evaluations)
  }
}
