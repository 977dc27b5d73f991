// blocks/mod.rs

//! Building-block evaluators. Each one is a pure function of the snapshot,
//! the policy and a reference time.

pub(crate) mod constraint;
pub mod constants;
pub mod crypto;
pub mod qualification;
pub mod revocation;
pub mod signature;
pub mod xcv;

pub use qualification::determine_qualification;
pub use revocation::{evaluate_freshness, FreshnessResult};
pub use signature::validate_signature;
pub use xcv::validate_chain;
