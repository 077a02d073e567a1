/// Hole detection for a single round.
///
/// Pure function of the receive queue and the prefix hierarchy. The whole
/// queue is scanned, not just what already made it into the local RIB, so
/// the result does not depend on the order announcements arrived in.
use std::collections::BTreeMap;

use crate::announcement::Hole;
use crate::hierarchy::PrefixHierarchy;
use crate::queue::RecvQueue;
use crate::types::Prefix;

/// Identifies a received announcement by its prefix and its position in
/// that prefix's arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnKey {
    pub prefix: Prefix,
    pub slot: usize,
}

impl AnnKey {
    pub fn new(prefix: Prefix, slot: usize) -> Self {
        Self { prefix, slot }
    }
}

/// Holes of every announcement received this round.
#[derive(Debug, Default, Clone)]
pub struct HoleMap {
    holes: BTreeMap<AnnKey, Vec<Hole>>,
}

impl HoleMap {
    /// Holes of the announcement at `key`, empty if it has none or was not
    /// part of the scanned queue.
    pub fn holes_for(&self, key: &AnnKey) -> &[Hole] {
        self.holes.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AnnKey, &[Hole])> {
        self.holes.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of announcements with an entry (holes or not).
    pub fn len(&self) -> usize {
        self.holes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holes.is_empty()
    }

    /// Total number of holes across all announcements.
    pub fn total_holes(&self) -> usize {
        self.holes.values().map(Vec::len).sum()
    }
}

/// Map every received announcement to the invalid subprefix announcements
/// it covers that arrived through the same neighbor.
///
/// Holes are ordered by subprefix, then by arrival within a subprefix.
pub fn detect_holes(recv_q: &RecvQueue, hierarchy: &PrefixHierarchy) -> HoleMap {
    let mut map = HoleMap::default();

    for (prefix, anns) in recv_q.prefix_anns() {
        for (slot, ann) in anns.iter().enumerate() {
            let mut ann_holes = Vec::new();
            for subprefix in hierarchy.subprefixes(prefix) {
                for sub_ann in recv_q.get_ann_list(subprefix) {
                    if sub_ann.invalid_by_roa() && sub_ann.shares_neighbor(ann) {
                        ann_holes.push(Hole::new(sub_ann));
                    }
                }
            }

            if !ann_holes.is_empty() {
                tracing::debug!(
                    "holes: {prefix} via {:?} covers {} invalid subprefix ann(s)",
                    ann.neighbor(),
                    ann_holes.len()
                );
            }
            map.holes.insert(AnnKey::new(*prefix, slot), ann_holes);
        }
    }

    map
}
