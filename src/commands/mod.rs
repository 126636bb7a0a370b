//! Top-level command orchestration.
pub mod launch;
