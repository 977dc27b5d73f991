// blocks/crypto.rs

use chrono::{DateTime, Utc};

use super::constants::*;
use super::constraint::Check;
use crate::domain::types::{
  AlgorithmConstraint, AlgorithmFact, Conclusion, CryptographicConstraints, SubIndication,
};

fn find<'a>(list: &'a [AlgorithmConstraint], name: &str) -> Option<&'a AlgorithmConstraint> {
  list.iter().find(|a| a.name.eq_ignore_ascii_case(name))
}

/// Check an algorithm against the cryptographic constraints at `at`.
///
/// Returns the message key of the first violation. A missing algorithm is
/// a violation: nothing can be said about its strength.
pub fn algorithm_violation(
  constraints: &CryptographicConstraints,
  algorithm: Option<&AlgorithmFact>,
  at: DateTime<Utc>,
) -> Option<&'static str> {
  let Some(alg) = algorithm else {
    return Some(ALGORITHM_MISSING);
  };

  let digest_ok = find(&constraints.acceptable_digest_algorithms, &alg.digest_algorithm)
    .map_or(false, |c| c.is_acceptable_at(at));
  if !digest_ok {
    return Some(ALGORITHM_DIGEST_UNACCEPTABLE);
  }

  let encryption_ok = find(&constraints.acceptable_encryption_algorithms, &alg.encryption_algorithm)
    .map_or(false, |c| c.is_acceptable_at(at));
  if !encryption_ok {
    return Some(ALGORITHM_ENCRYPTION_UNACCEPTABLE);
  }

  let too_short = constraints
    .min_key_lengths
    .iter()
    .filter(|k| k.algorithm.eq_ignore_ascii_case(&alg.encryption_algorithm))
    .any(|k| alg.key_length < k.min_length);
  if too_short {
    return Some(ALGORITHM_KEY_TOO_SHORT);
  }
  None
}

pub(crate) fn check_algorithm(
  constraints: &CryptographicConstraints,
  algorithm: Option<&AlgorithmFact>,
  at: DateTime<Utc>,
) -> Check {
  match algorithm_violation(constraints, algorithm, at) {
    None => Check::pass(ALGORITHM_ACCEPTABLE),
    Some(key) => Check::fail(key, Conclusion::indeterminate(SubIndication::CryptoAlgorithmUnacceptable)),
  }
}
