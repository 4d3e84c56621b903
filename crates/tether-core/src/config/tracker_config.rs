use serde::{Deserialize, Serialize};

use super::defaults;

/// Tracker configuration.
///
/// Loadable from TOML so instrumented builds can tune the runtime without
/// recompiling. All fields default sensibly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Initial capacity of the slot table.
    pub initial_slot_capacity: usize,
    /// Per-record edge count above which a warning is logged.
    ///
    /// Validation cost is bounded by the dependent's edge count; this is a
    /// documented precondition, never an enforced limit.
    pub expected_max_edges: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            initial_slot_capacity: defaults::DEFAULT_INITIAL_SLOT_CAPACITY,
            expected_max_edges: defaults::DEFAULT_EXPECTED_MAX_EDGES,
        }
    }
}

impl TrackerConfig {
    /// Parse a config from a TOML string.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_core::TrackerConfig;
    ///
    /// let cfg = TrackerConfig::from_toml_str("initial_slot_capacity = 1024").unwrap();
    /// assert_eq!(cfg.initial_slot_capacity, 1024);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
