//! # Import Stats
//!
//! Edge-type statistics aggregation for a parallel graph bulk loader.
//! This crate provides:
//!
//! - [`ImportStats`] — per-run aggregator holding node/property totals and
//!   the published, count-sorted snapshot of per-type edge counts
//! - [`StatsShard`] — uncontended per-worker counter for the per-edge hot path
//! - [`EdgeTypeCount`] — immutable `(type_id, count)` snapshot entry
//!
//! ## Design
//!
//! Every parallel worker of the edge-ingestion phase takes a private
//! [`StatsShard`] and increments it freely with no coordination; the only
//! locking happens on shard creation and release. When the last outstanding
//! shard is released, the aggregator merges every shard contribution it has
//! ever received into a fresh dense snapshot, sorted by count ascending with
//! ties in ascending type-id order.
//!
//! Released shard contributions are never discarded: a later wave of shards
//! re-sums earlier waves' counts alongside its own, so statistics accumulate
//! across waves rather than reporting deltas.

pub mod error;
pub mod shard;
pub mod stats;
pub mod type_count;

pub use error::{Result, StatsError};
pub use shard::StatsShard;
pub use stats::{ImportStats, SnapshotIter};
pub use type_count::EdgeTypeCount;
