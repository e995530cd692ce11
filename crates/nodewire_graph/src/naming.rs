// SPDX-License-Identifier: MIT OR Apache-2.0
//! Unique display name generation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-surface allocator of unique display names.
///
/// Each base name gets its own monotonically increasing counter starting at
/// zero, so `allocate("Branch")` yields `Branch#0`, `Branch#1`, ... with no
/// repeats for the lifetime of the allocator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameAllocator {
    counters: HashMap<String, u64>,
}

impl NameAllocator {
    /// Create a new allocator with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next unique name for a base name
    pub fn allocate(&mut self, base: &str) -> String {
        let counter = self.counters.entry(base.to_owned()).or_insert(0);
        let name = format!("{base}#{counter}");
        *counter += 1;
        name
    }
}
