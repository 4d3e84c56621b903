//! # tether-core
//!
//! Foundation crate for the tether dependency-tracking runtime.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod handle;
pub mod record;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::TrackerConfig;
pub use errors::{TetherResult, ViolationError};
pub use handle::{EdgeKind, Handle, ObjectId};
pub use record::{DependencyEdge, TrackedRecord};
pub use traits::ITrackingSink;
