// Re-export all types so callers can use `domain::types::*`
// while the code stays organized by concern internally.

pub use self::core::*;
pub use diagnostic::*;
pub use policy::*;
pub use config::*;

// Module declarations
mod core;
mod diagnostic;
mod policy;
mod config;
