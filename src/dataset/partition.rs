use serde::{Deserialize, Serialize};

use crate::domain::ShortUrlEntry;

/// Percent shares used to split a seeded list.
///
/// Every share is taken from the *requested* count, so a run with failed
/// creations still gets the same Hot/Warm boundaries as a clean run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionPlan {
    pub hot_percent: u8,
    /// Upper bound of Hot plus Warm.
    pub warm_percent: u8,
    pub invalid_percent: u8,
}

impl Default for PartitionPlan {
    fn default() -> Self {
        Self {
            hot_percent: 1,
            warm_percent: 10,
            invalid_percent: 2,
        }
    }
}

/// The four buckets written under `data` in the dataset file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partitions {
    pub hot: Vec<ShortUrlEntry>,
    pub warm: Vec<ShortUrlEntry>,
    pub cold: Vec<ShortUrlEntry>,
    pub invalid: Vec<String>,
}

impl Partitions {
    pub fn created_len(&self) -> usize {
        self.hot.len() + self.warm.len() + self.cold.len()
    }
}

fn share(requested: usize, percent: u8) -> usize {
    (requested.saturating_mul(usize::from(percent)) / 100).max(1)
}

impl PartitionPlan {
    pub fn hot_len(&self, requested: usize) -> usize {
        share(requested, self.hot_percent)
    }

    pub fn warm_end(&self, requested: usize) -> usize {
        share(requested, self.warm_percent)
    }

    pub fn invalid_len(&self, requested: usize) -> usize {
        share(requested, self.invalid_percent)
    }

    /// Split `entries` into Hot, Warm and Cold, keeping creation order, and
    /// build the invalid identifier set.
    pub fn partition(
        &self,
        mut entries: Vec<ShortUrlEntry>,
        requested: usize,
        invalid_prefix: &str,
    ) -> Partitions {
        if entries.is_empty() {
            return Partitions::default();
        }

        let len = entries.len();
        let hot_end = self.hot_len(requested).min(len);
        let warm_end = self.warm_end(requested).min(len).max(hot_end);

        let cold = entries.split_off(warm_end);
        let warm = entries.split_off(hot_end);
        let hot = entries;

        Partitions {
            hot,
            warm,
            cold,
            invalid: invalid_codes(invalid_prefix, self.invalid_len(requested)),
        }
    }
}

/// Identifiers that look like short codes but were never created.
pub fn invalid_codes(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{i:06}")).collect()
}
