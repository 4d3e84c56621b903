//! # tether-engine
//!
//! Dynamic dependency-tracking validator for temporal memory safety.
//!
//! The engine is a passive side table consulted synchronously by
//! instrumented call sites. It records which objects exist, which have been
//! destroyed or modified, and which depend on which — then, immediately
//! before any use flagged as unsafe-if-stale, checks that nothing the used
//! object depends on has been invalidated.
//!
//! ## Components
//! - **Registry** — identity → current record, with slot+generation handles
//!   so identity reuse never resurrects a stale handle
//! - **Lifecycle / content trackers** — `mark_destroyed`, `mark_modified`
//! - **Dependency edge store** — per-record ordered existence/content edges
//! - **Validator** — the single check run before a potentially unsafe use
//!
//! Invalidation is lazy: destroying or modifying an object is O(1) and
//! never walks its dependents. A broken dependency is only discovered when
//! the dependent itself is validated.
//!
//! Known limitation: invalidation does not cascade across multiple hops.
//! If A depends on B and B on C, destroying C fails validation of B, not of
//! A — the instrumentation must record the edges it wants checked.

pub mod engine;
pub mod local;
pub mod registry;
pub mod validator;

pub use engine::{DependencyTracker, TrackerStats, ViolationAction};
pub use registry::Registry;
