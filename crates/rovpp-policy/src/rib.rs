use std::collections::BTreeMap;

use crate::announcement::Announcement;
use crate::types::Prefix;

/// Per-AS local RIB: at most one selected announcement per prefix.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LocalRib {
    anns: BTreeMap<Prefix, Announcement>,
}

impl LocalRib {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_ann(&self, prefix: &Prefix) -> Option<&Announcement> {
        self.anns.get(prefix)
    }

    pub fn get_ann_mut(&mut self, prefix: &Prefix) -> Option<&mut Announcement> {
        self.anns.get_mut(prefix)
    }

    /// Insert `ann` under its prefix, returning the entry it replaced.
    pub fn add_ann(&mut self, ann: Announcement) -> Option<Announcement> {
        self.anns.insert(ann.prefix, ann)
    }

    pub fn remove_ann(&mut self, prefix: &Prefix) -> Option<Announcement> {
        self.anns.remove(prefix)
    }

    pub fn prefix_anns(&self) -> impl Iterator<Item = (&Prefix, &Announcement)> {
        self.anns.iter()
    }

    pub fn len(&self) -> usize {
        self.anns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anns.is_empty()
    }
}
