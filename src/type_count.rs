//! Per-edge-type occurrence counts.

use std::cmp::Ordering;
use std::fmt;

/// Number of edges observed for a single edge type.
///
/// Published snapshots hold one entry per type id from 0 up to the highest
/// id observed anywhere, ordered by `count` ascending with ties in ascending
/// `type_id` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeTypeCount {
    type_id: u32,
    count: u64,
}

impl EdgeTypeCount {
    pub fn new(type_id: u32, count: u64) -> Self {
        Self { type_id, count }
    }

    pub fn type_id(&self) -> u32 {
        self.type_id
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Ord for EdgeTypeCount {
    /// Orders by `count`, with `type_id` as an explicit tie-breaker so the
    /// ordering stays consistent with `Eq`.
    fn cmp(&self, other: &Self) -> Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| self.type_id.cmp(&other.type_id))
    }
}

impl PartialOrd for EdgeTypeCount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EdgeTypeCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type:{} count:{}", self.type_id, self.count)
    }
}
