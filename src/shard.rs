//! Per-worker counter shards.

use std::sync::Arc;

use crate::stats::StatsInner;

/// Initial number of type-id slots in a fresh shard.
const INITIAL_CAPACITY: usize = 8;

/// Uncontended edge counter owned by a single parallel worker.
///
/// Each worker of the bulk-load pipeline holds exactly one shard and calls
/// [`increment`](StatsShard::increment) once per ingested edge. The hot path
/// touches only shard-local memory: no lock, no atomics. Exclusive write
/// access is enforced by `&mut self` and move semantics rather than by a
/// runtime contract.
///
/// Dropping the shard hands its counts back to the owning
/// [`ImportStats`](crate::ImportStats), which merges all shards the moment
/// the last outstanding one is returned. Release therefore happens exactly
/// once on every exit path, including unwinds.
pub struct StatsShard {
    owner: Arc<StatsInner>,
    counts: Vec<u64>,
    highest_type_id: usize,
}

impl StatsShard {
    pub(crate) fn new(owner: Arc<StatsInner>) -> Self {
        Self {
            owner,
            counts: vec![0; INITIAL_CAPACITY],
            highest_type_id: 0,
        }
    }

    /// Count one edge of the given type.
    ///
    /// Grows the backing storage to `max(len * 2, type_id + 1)` slots when
    /// `type_id` falls outside the current capacity, zero-filling new slots.
    pub fn increment(&mut self, type_id: u32) {
        let idx = type_id as usize;
        if idx >= self.counts.len() {
            let grown = (self.counts.len() * 2).max(idx + 1);
            self.counts.resize(grown, 0);
        }
        self.counts[idx] += 1;
        if idx > self.highest_type_id {
            self.highest_type_id = idx;
        }
    }

    /// Hand the shard back to its aggregator.
    ///
    /// Equivalent to dropping the shard; provided so pipeline code can mark
    /// the release point explicitly.
    pub fn release(self) {}
}

impl Drop for StatsShard {
    fn drop(&mut self) {
        let counts = std::mem::take(&mut self.counts);
        self.owner.release_shard(ShardData {
            counts,
            highest_type_id: self.highest_type_id,
        });
    }
}

/// A retired shard's contribution, held by the aggregator's registry.
pub(crate) struct ShardData {
    counts: Vec<u64>,
    highest_type_id: usize,
}

impl ShardData {
    pub(crate) fn highest_type_id(&self) -> usize {
        self.highest_type_id
    }

    /// Add this shard's counts for type ids `0..=highest_type_id` into
    /// `totals`. Only called during a merge, with `totals` sized to cover
    /// every registered shard's highest id.
    pub(crate) fn add_into(&self, totals: &mut [u64]) {
        for (total, count) in totals
            .iter_mut()
            .zip(&self.counts[..=self.highest_type_id])
        {
            *total += count;
        }
    }
}
