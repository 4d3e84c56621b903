//! Traits implemented across the workspace.

mod tracking_sink;

pub use tracking_sink::ITrackingSink;
