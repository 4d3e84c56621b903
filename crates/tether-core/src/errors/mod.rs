//! Error types for the tether runtime.

mod violation_error;

pub use violation_error::ViolationError;

/// Result alias used across the workspace.
pub type TetherResult<T> = Result<T, ViolationError>;
