//! Aggregation of per-shard edge-type counts.
//!
//! [`ImportStats`] owns the shared state of one bulk-import run: the fixed
//! node/property totals decided by the planning phase, the registry of
//! retired shard contributions, the number of shards still outstanding, and
//! the currently published snapshot of per-type edge counts.
//!
//! A single mutex guards registry, open count, and snapshot. Workers never
//! take it on the per-edge hot path — only shard creation and release do.
//! The release that brings the open count to zero performs the merge
//! synchronously while still holding the lock, so a snapshot read that is
//! ordered after all releases always observes the merged result.
//!
//! The registry is append-only: a retired shard's contribution is never
//! removed, so a later wave of shards re-sums all earlier waves' counts
//! alongside its own. Aggregation is cumulative across waves, not delta-only.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Result, StatsError};
use crate::shard::{ShardData, StatsShard};
use crate::type_count::EdgeTypeCount;

/// Edge-type statistics for one bulk-import run.
///
/// Cheap to clone; all clones share the same underlying state. Workers
/// obtain private counter shards via [`new_shard`](ImportStats::new_shard);
/// the read accessors serve the snapshot published by the most recent merge.
///
/// While any shard is outstanding the snapshot is stale — it reflects the
/// previous merge (or the initial snapshot). Callers wanting an accurate
/// view must read only after every shard has been released.
#[derive(Clone)]
pub struct ImportStats {
    inner: Arc<StatsInner>,
}

pub(crate) struct StatsInner {
    node_count: u64,
    property_count: u64,
    state: Mutex<State>,
}

struct State {
    /// Retired shard contributions, append-only across waves.
    shards: Vec<ShardData>,
    /// Shards handed out but not yet released.
    open: usize,
    /// Last published aggregation, replaced wholesale by each merge.
    snapshot: Arc<[EdgeTypeCount]>,
}

impl ImportStats {
    /// Create statistics for a run with the given node/property totals and
    /// an initial snapshot (empty when no prior knowledge exists; expected
    /// to be count-sorted when non-empty).
    pub fn new(node_count: u64, property_count: u64, initial: Vec<EdgeTypeCount>) -> Self {
        Self {
            inner: Arc::new(StatsInner {
                node_count,
                property_count,
                state: Mutex::new(State {
                    shards: Vec::new(),
                    open: 0,
                    snapshot: initial.into(),
                }),
            }),
        }
    }

    /// Hand out a fresh counter shard for one parallel worker.
    ///
    /// Safe to call concurrently from any number of workers. The shard
    /// releases itself back to this aggregator when dropped.
    pub fn new_shard(&self) -> StatsShard {
        self.inner.lock_state().open += 1;
        StatsShard::new(Arc::clone(&self.inner))
    }

    /// The entry at sorted position `index` in the current snapshot.
    pub fn get(&self, index: usize) -> Result<EdgeTypeCount> {
        let snapshot = self.snapshot();
        snapshot
            .get(index)
            .copied()
            .ok_or(StatsError::IndexOutOfBounds {
                index,
                len: snapshot.len(),
            })
    }

    /// Number of edge types in the current snapshot.
    ///
    /// Snapshots are dense from type id 0 to the highest id observed, so
    /// ids never incremented count here too (with zero edges).
    pub fn num_edge_types(&self) -> usize {
        self.snapshot().len()
    }

    /// Total number of edges in the current snapshot, summed on demand.
    pub fn edge_count(&self) -> u64 {
        self.snapshot().iter().map(|tc| tc.count()).sum()
    }

    pub fn node_count(&self) -> u64 {
        self.inner.node_count
    }

    pub fn property_count(&self) -> u64 {
        self.inner.property_count
    }

    /// The currently published snapshot, count-sorted ascending.
    pub fn snapshot(&self) -> Arc<[EdgeTypeCount]> {
        Arc::clone(&self.inner.lock_state().snapshot)
    }

    /// Iterate the current snapshot in ascending-count order.
    ///
    /// The iterator walks the snapshot as published when `iter` was called.
    /// A merge completing mid-iteration replaces the aggregator's snapshot
    /// but never affects an in-flight traversal; the caller simply observes
    /// the older view.
    pub fn iter(&self) -> SnapshotIter {
        SnapshotIter {
            snapshot: self.snapshot(),
            index: 0,
        }
    }
}

impl<'a> IntoIterator for &'a ImportStats {
    type Item = EdgeTypeCount;
    type IntoIter = SnapshotIter;

    fn into_iter(self) -> SnapshotIter {
        self.iter()
    }
}

/// Iterator over one published snapshot, in ascending-count order.
///
/// Holds its own reference to the snapshot array, so it is unaffected by
/// merges that publish a newer snapshot while it is in flight.
pub struct SnapshotIter {
    snapshot: Arc<[EdgeTypeCount]>,
    index: usize,
}

impl Iterator for SnapshotIter {
    type Item = EdgeTypeCount;

    fn next(&mut self) -> Option<EdgeTypeCount> {
        let entry = self.snapshot.get(self.index).copied();
        if entry.is_some() {
            self.index += 1;
        }
        entry
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.snapshot.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SnapshotIter {}

impl fmt::Display for ImportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Imported: {} nodes, {} edges, {} properties",
            self.node_count(),
            self.edge_count(),
            self.property_count()
        )
    }
}

impl StatsInner {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        // Runs from Drop during unwinds too; recover a poisoned guard
        // instead of double-panicking.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Retire one shard's contribution. Invoked by `StatsShard::drop`, so it
    /// runs exactly once per shard. The release that brings the open count
    /// to zero merges every registered contribution and publishes the
    /// result before the lock is dropped.
    pub(crate) fn release_shard(&self, data: ShardData) {
        let mut state = self.lock_state();
        state.shards.push(data);
        state.open -= 1;
        if state.open == 0 {
            state.snapshot = merge(&state.shards);
            tracing::debug!(
                shards = state.shards.len(),
                edge_types = state.snapshot.len(),
                "merged shard counts into new snapshot"
            );
        }
    }
}

/// Sum every registered shard's counts into a dense per-type array and sort
/// it into a fresh snapshot (count ascending, ties in ascending type order).
fn merge(shards: &[ShardData]) -> Arc<[EdgeTypeCount]> {
    let highest = shards
        .iter()
        .map(ShardData::highest_type_id)
        .max()
        .unwrap_or(0);
    let mut totals = vec![0u64; highest + 1];
    for shard in shards {
        shard.add_into(&mut totals);
    }
    let mut entries: Vec<EdgeTypeCount> = totals
        .iter()
        .enumerate()
        .map(|(id, &count)| EdgeTypeCount::new(id as u32, count))
        .collect();
    entries.sort();
    entries.into()
}
