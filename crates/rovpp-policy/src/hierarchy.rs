/// Registered prefix → direct subprefix relation.
///
/// Supplied by the engine input. [`PrefixHierarchy::from_prefixes`] derives
/// it from the set of announced prefixes; [`PrefixHierarchy::register`]
/// lets a host install an explicit relation instead.
use std::collections::{BTreeMap, BTreeSet};

use crate::error::PolicyError;
use crate::types::Prefix;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PrefixHierarchy {
    subprefixes: BTreeMap<Prefix, BTreeSet<Prefix>>,
}

impl PrefixHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the direct-subprefix relation over `prefixes`.
    ///
    /// `S` is a direct subprefix of `P` when `P` strictly contains `S` and
    /// no other registered prefix sits between them. Every input prefix is
    /// registered, even when it has no subprefixes.
    pub fn from_prefixes<I: IntoIterator<Item = Prefix>>(prefixes: I) -> Self {
        let all: BTreeSet<Prefix> = prefixes.into_iter().map(|p| p.trunc()).collect();
        let mut subprefixes = BTreeMap::new();

        for p in &all {
            let contained: Vec<&Prefix> = all.iter().filter(|q| *q != p && p.contains(*q)).collect();
            let direct: BTreeSet<Prefix> = contained
                .iter()
                .filter(|q| {
                    !contained
                        .iter()
                        .any(|mid| mid != *q && mid.contains(**q))
                })
                .map(|q| **q)
                .collect();
            subprefixes.insert(*p, direct);
        }

        Self { subprefixes }
    }

    /// Register `subprefix` as a direct subprefix of `prefix`.
    pub fn register(&mut self, prefix: Prefix, subprefix: Prefix) -> Result<(), PolicyError> {
        if prefix == subprefix || !prefix.contains(&subprefix) {
            return Err(PolicyError::contract(format!(
                "{subprefix} is not a strict subprefix of {prefix}"
            )));
        }
        self.subprefixes.entry(prefix).or_default().insert(subprefix);
        self.subprefixes.entry(subprefix).or_default();
        Ok(())
    }

    /// Direct subprefixes of `prefix`, in ascending order. Unregistered
    /// prefixes have none.
    pub fn subprefixes(&self, prefix: &Prefix) -> impl Iterator<Item = &Prefix> {
        self.subprefixes.get(prefix).into_iter().flatten()
    }

    pub fn is_registered(&self, prefix: &Prefix) -> bool {
        self.subprefixes.contains_key(prefix)
    }

    pub fn len(&self) -> usize {
        self.subprefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subprefixes.is_empty()
    }
}
