/// Tether runtime version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default initial capacity of the registry's slot table.
pub const DEFAULT_SLOT_CAPACITY: usize = 256;

/// Expected upper bound on edges owned by a single record.
///
/// A documented precondition of the O(1)-amortized validation bound, not an
/// enforced limit; the engine logs a warning when a record crosses it.
pub const EXPECTED_MAX_EDGES_PER_RECORD: usize = 64;
