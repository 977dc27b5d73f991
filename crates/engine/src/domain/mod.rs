pub mod validation_engine;
pub mod types;
pub mod report;
pub mod error;
