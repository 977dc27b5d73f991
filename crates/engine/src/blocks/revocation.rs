// blocks/revocation.rs

//! Revocation freshness: pick the revocation fact that applies at a
//! reference time and decide whether it is recent enough.

use chrono::{DateTime, Utc};

use crate::domain::types::{Conclusion, RevocationConstraints, RevocationFact, SubIndication};

/// Outcome of a freshness evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessResult<'a> {
  /// Latest applicable fact, if any.
  pub selected: Option<&'a RevocationFact>,
  pub conclusion: Conclusion,
}

/// Facts produced no later than `reference_time` plus the grace period.
pub fn applicable<'a>(
  facts: impl IntoIterator<Item = &'a RevocationFact>,
  reference_time: DateTime<Utc>,
  constraints: &RevocationConstraints,
) -> impl Iterator<Item = &'a RevocationFact> {
  let horizon = reference_time
    .checked_add_signed(constraints.grace_period())
    .unwrap_or(DateTime::<Utc>::MAX_UTC);
  facts.into_iter().filter(move |r| r.production_date <= horizon)
}

/// Select the latest applicable fact for `certificate_id` and check its age.
/// Ties on production time go to the fact listed last.
pub fn evaluate_freshness<'a>(
  certificate_id: &str,
  reference_time: DateTime<Utc>,
  candidates: impl IntoIterator<Item = &'a RevocationFact>,
  constraints: &RevocationConstraints,
) -> FreshnessResult<'a> {
  let selected = applicable(candidates, reference_time, constraints)
    .filter(|r| r.certificate_id == certificate_id)
    .max_by_key(|r| r.production_date);

  let conclusion = match selected {
    None if constraints.allow_try_later => Conclusion::indeterminate(SubIndication::TryLater),
    None => Conclusion::indeterminate(SubIndication::NoPoe),
    Some(fact) if reference_time - fact.production_date <= constraints.max_freshness() => {
      Conclusion::passed()
    }
    Some(_) => Conclusion::indeterminate(SubIndication::RevocationNotFresh),
  };

  tracing::debug!(
    certificate_id,
    selected = selected.map(|r| r.id.as_str()),
    %conclusion,
    "revocation freshness evaluated"
  );
  FreshnessResult { selected, conclusion }
}
