//! Named event counters

use std::collections::HashMap;

/// Accumulating counters keyed by name (sprites drawn, records reconciled...).
#[derive(Default)]
pub struct Counter {
    totals: HashMap<String, u64>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, amount: u64) {
        *self.totals.entry(name.to_string()).or_insert(0) += amount;
    }

    pub fn get(&self, name: &str) -> u64 {
        self.totals.get(name).copied().unwrap_or(0)
    }

    pub fn reset_all(&mut self) {
        self.totals.clear();
    }
}
