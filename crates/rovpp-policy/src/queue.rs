use std::collections::BTreeMap;

use crate::announcement::Announcement;
use crate::types::Prefix;

/// Announcements received by one AS during the current round, grouped by
/// prefix in arrival order.
#[derive(Debug, Default, Clone)]
pub struct RecvQueue {
    anns: BTreeMap<Prefix, Vec<Announcement>>,
}

impl RecvQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_ann(&mut self, ann: Announcement) {
        self.anns.entry(ann.prefix).or_default().push(ann);
    }

    /// Announcements received for exactly `prefix`, empty if none.
    pub fn get_ann_list(&self, prefix: &Prefix) -> &[Announcement] {
        self.anns.get(prefix).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn get_ann_list_mut(&mut self, prefix: &Prefix) -> Option<&mut Vec<Announcement>> {
        self.anns.get_mut(prefix)
    }

    /// Every queued prefix with its announcements.
    pub fn prefix_anns(&self) -> impl Iterator<Item = (&Prefix, &[Announcement])> {
        self.anns.iter().map(|(p, anns)| (p, anns.as_slice()))
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &Prefix> {
        self.anns.keys()
    }

    /// Total number of queued announcements.
    pub fn len(&self) -> usize {
        self.anns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.anns.is_empty()
    }

    pub fn clear(&mut self) {
        self.anns.clear();
    }
}
