//! Runtime configuration.

mod defaults;
mod tracker_config;

pub use tracker_config::TrackerConfig;
