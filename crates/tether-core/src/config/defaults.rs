//! Default values for configuration fields.

use crate::constants;

pub const DEFAULT_INITIAL_SLOT_CAPACITY: usize = constants::DEFAULT_SLOT_CAPACITY;
pub const DEFAULT_EXPECTED_MAX_EDGES: usize = constants::EXPECTED_MAX_EDGES_PER_RECORD;
