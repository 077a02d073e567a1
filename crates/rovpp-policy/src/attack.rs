/// Attack scenarios and the engine input handed to the policy each round.
///
/// A scenario knows which prefixes the victim and the attacker announce and
/// how to seed those announcements. It does not inherit ROV++ defaults; it
/// holds an injected [`HoleAugmentation`] that supplies them.
///
/// Hole counting here is scenario-specific: temporary holes are computed
/// straight from the receive queue before best-path selection and promoted
/// only on the announcement that wins. It is only defined for scenarios with
/// exactly one victim announcement and one attacker announcement.
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::announcement::{Announcement, Hole};
use crate::hierarchy::PrefixHierarchy;
use crate::queue::RecvQueue;
use crate::rib::LocalRib;
use crate::types::{
    default_prefix, default_subprefix, Asn, Prefix, Relationship, RoaValidity, ATTACKER_ASN,
    VICTIM_ASN,
};

/// Attacker announcements collected by [`HoleCounter::count_holes`], keyed by
/// the attacker prefix.
pub type TempHoleMap = BTreeMap<Prefix, Vec<Announcement>>;

// ── Augmentation ───────────────────────────────────────────────────────

/// ROV++ defaults stamped onto every announcement a scenario seeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoleAugmentation {
    pub blackhole: bool,
    pub holes: Vec<Hole>,
    pub temp_holes: Option<Vec<Hole>>,
}

impl HoleAugmentation {
    /// Build a seeded announcement originated by `origin`.
    pub fn seed(&self, prefix: Prefix, origin: Asn, roa: RoaValidity) -> Announcement {
        let mut ann = Announcement::new(prefix, vec![origin], roa);
        ann.blackhole = self.blackhole;
        ann.holes = self.holes.clone();
        ann.temp_holes = self.temp_holes.clone();
        ann.recv_relationship = Relationship::Origin;
        ann
    }
}

// ── Scenario seams ─────────────────────────────────────────────────────

/// Scenario-specific hole counting run around best-path selection.
pub trait HoleCounter {
    /// Record temporary holes on victim-prefix candidates before selection.
    fn count_holes(&self, recv_q: &mut RecvQueue) -> TempHoleMap;

    /// Promote the temporary holes of the selected victim-prefix entry and
    /// discard them everywhere else.
    fn remove_temp_holes(&self, recv_q: &mut RecvQueue, rib: &mut LocalRib);
}

/// An attack scenario the simulation engine can run.
pub trait Scenario: HoleCounter + Send + Sync {
    fn name(&self) -> &'static str;

    /// Announcements seeded at their origin ASes when the trial starts.
    fn seed_announcements(&self) -> Vec<Announcement>;
}

// ── Subprefix hijack ───────────────────────────────────────────────────

/// Victim announces a prefix; attacker announces an invalid, more-specific
/// subprefix of it.
#[derive(Debug, Clone)]
pub struct SubprefixHijack {
    pub victim_prefix: Prefix,
    pub attacker_prefix: Prefix,
    pub victim_asn: Asn,
    pub attacker_asn: Asn,
    augmentation: Arc<HoleAugmentation>,
}

impl SubprefixHijack {
    /// Default scenario: `1.2.0.0/16` from AS 777, `1.2.3.0/24` from AS 666.
    pub fn new(augmentation: Arc<HoleAugmentation>) -> Self {
        Self {
            victim_prefix: default_prefix(),
            attacker_prefix: default_subprefix(),
            victim_asn: VICTIM_ASN,
            attacker_asn: ATTACKER_ASN,
            augmentation,
        }
    }

    pub fn with_prefixes(mut self, victim_prefix: Prefix, attacker_prefix: Prefix) -> Self {
        self.victim_prefix = victim_prefix;
        self.attacker_prefix = attacker_prefix;
        self
    }

    pub fn with_asns(mut self, victim_asn: Asn, attacker_asn: Asn) -> Self {
        self.victim_asn = victim_asn;
        self.attacker_asn = attacker_asn;
        self
    }
}

impl HoleCounter for SubprefixHijack {
    fn count_holes(&self, recv_q: &mut RecvQueue) -> TempHoleMap {
        let attacker_anns = recv_q.get_ann_list(&self.attacker_prefix).to_vec();
        let Some(victim_anns) = recv_q.get_ann_list_mut(&self.victim_prefix) else {
            return TempHoleMap::new();
        };

        // Received copies: as_path[0] is the neighbor they came from.
        let mut by_neighbor: HashMap<Asn, Vec<usize>> = HashMap::new();
        for (slot, ann) in victim_anns.iter_mut().enumerate() {
            ann.temp_holes = Some(Vec::new());
            if let Some(neighbor) = ann.neighbor() {
                by_neighbor.entry(neighbor).or_default().push(slot);
            }
        }

        let mut collected = Vec::new();
        for attacker_ann in &attacker_anns {
            let Some(slots) = attacker_ann.neighbor().and_then(|n| by_neighbor.get(&n)) else {
                continue;
            };
            for &slot in slots {
                victim_anns[slot]
                    .temp_holes
                    .get_or_insert_with(Vec::new)
                    .push(Hole::new(attacker_ann));
                collected.push(attacker_ann.clone());
            }
        }

        if collected.is_empty() {
            return TempHoleMap::new();
        }
        tracing::debug!(
            "{}: {} temporary hole(s) for {}",
            self.name(),
            collected.len(),
            self.attacker_prefix
        );
        TempHoleMap::from([(self.attacker_prefix, collected)])
    }

    fn remove_temp_holes(&self, recv_q: &mut RecvQueue, rib: &mut LocalRib) {
        if let Some(selected) = rib.get_ann_mut(&self.victim_prefix) {
            if let Some(temp_holes) = selected.temp_holes.take() {
                selected.holes = temp_holes;
            }
        }

        if let Some(candidates) = recv_q.get_ann_list_mut(&self.victim_prefix) {
            for ann in candidates {
                ann.temp_holes = None;
            }
        }
    }
}

impl Scenario for SubprefixHijack {
    fn name(&self) -> &'static str {
        "subprefix_hijack"
    }

    fn seed_announcements(&self) -> Vec<Announcement> {
        vec![
            self.augmentation
                .seed(self.victim_prefix, self.victim_asn, RoaValidity::Valid),
            self.augmentation
                .seed(self.attacker_prefix, self.attacker_asn, RoaValidity::Invalid),
        ]
    }
}

// ── Prefix hijack ──────────────────────────────────────────────────────

/// Victim and attacker announce the same prefix. Holes cannot occur, so
/// counting is a no-op.
#[derive(Debug, Clone)]
pub struct PrefixHijack {
    pub prefix: Prefix,
    pub victim_asn: Asn,
    pub attacker_asn: Asn,
    augmentation: Arc<HoleAugmentation>,
}

impl PrefixHijack {
    pub fn new(augmentation: Arc<HoleAugmentation>) -> Self {
        Self {
            prefix: default_prefix(),
            victim_asn: VICTIM_ASN,
            attacker_asn: ATTACKER_ASN,
            augmentation,
        }
    }
}

impl HoleCounter for PrefixHijack {
    fn count_holes(&self, _recv_q: &mut RecvQueue) -> TempHoleMap {
        TempHoleMap::new()
    }

    fn remove_temp_holes(&self, _recv_q: &mut RecvQueue, _rib: &mut LocalRib) {}
}

impl Scenario for PrefixHijack {
    fn name(&self) -> &'static str {
        "prefix_hijack"
    }

    fn seed_announcements(&self) -> Vec<Announcement> {
        vec![
            self.augmentation
                .seed(self.prefix, self.victim_asn, RoaValidity::Valid),
            self.augmentation
                .seed(self.prefix, self.attacker_asn, RoaValidity::Invalid),
        ]
    }
}

// ── Unannounced prefix hijack ──────────────────────────────────────────

/// Attacker announces a prefix nobody else announces.
#[derive(Debug, Clone)]
pub struct UnannouncedPrefixHijack {
    pub prefix: Prefix,
    pub attacker_asn: Asn,
    augmentation: Arc<HoleAugmentation>,
}

impl UnannouncedPrefixHijack {
    pub fn new(augmentation: Arc<HoleAugmentation>) -> Self {
        Self {
            prefix: default_prefix(),
            attacker_asn: ATTACKER_ASN,
            augmentation,
        }
    }
}

impl HoleCounter for UnannouncedPrefixHijack {
    fn count_holes(&self, _recv_q: &mut RecvQueue) -> TempHoleMap {
        TempHoleMap::new()
    }

    fn remove_temp_holes(&self, _recv_q: &mut RecvQueue, _rib: &mut LocalRib) {}
}

impl Scenario for UnannouncedPrefixHijack {
    fn name(&self) -> &'static str {
        "unannounced_prefix_hijack"
    }

    fn seed_announcements(&self) -> Vec<Announcement> {
        vec![self
            .augmentation
            .seed(self.prefix, self.attacker_asn, RoaValidity::Invalid)]
    }
}

// ── Engine input ───────────────────────────────────────────────────────

/// Per-trial input shared by every AS: the scenario and the prefix
/// hierarchy the hole detector walks.
pub struct EngineInput {
    hierarchy: PrefixHierarchy,
    scenario: Box<dyn Scenario>,
}

impl EngineInput {
    /// Derive the hierarchy from the prefixes the scenario seeds.
    pub fn new(scenario: impl Scenario + 'static) -> Self {
        let hierarchy =
            PrefixHierarchy::from_prefixes(scenario.seed_announcements().iter().map(|a| a.prefix));
        Self::with_hierarchy(hierarchy, scenario)
    }

    pub fn with_hierarchy(hierarchy: PrefixHierarchy, scenario: impl Scenario + 'static) -> Self {
        Self {
            hierarchy,
            scenario: Box::new(scenario),
        }
    }

    pub fn hierarchy(&self) -> &PrefixHierarchy {
        &self.hierarchy
    }

    pub fn scenario(&self) -> &dyn Scenario {
        self.scenario.as_ref()
    }
}

impl std::fmt::Debug for EngineInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineInput")
            .field("hierarchy", &self.hierarchy)
            .field("scenario", &self.scenario.name())
            .finish()
    }
}
