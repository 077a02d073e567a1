/// Blackhole insertion into the local RIB.
///
/// Runs after the host's best-path selection. For every hole carried by a
/// RIB entry, installs a non-forwarding blackhole for the hole's prefix
/// unless that prefix already holds a valid, preventive or blackholed route.
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::announcement::{Announcement, CopyOptions, Hole};
use crate::attack::EngineInput;
use crate::error::PolicyError;
use crate::rib::LocalRib;
use crate::types::{Asn, Prefix, Relationship};

/// Why an existing RIB entry kept its place instead of being blackholed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WithholdReason {
    Valid,
    Preventive,
    AlreadyBlackholed,
}

impl WithholdReason {
    /// `None` when `entry` may be replaced by a blackhole.
    fn for_entry(entry: &Announcement) -> Option<Self> {
        if entry.blackhole {
            Some(WithholdReason::AlreadyBlackholed)
        } else if !entry.invalid_by_roa() {
            Some(WithholdReason::Valid)
        } else if entry.preventive {
            Some(WithholdReason::Preventive)
        } else {
            None
        }
    }
}

/// What one installer pass did to the RIB.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct InstallReport {
    /// Every prefix referenced by a hole on some RIB entry.
    pub hole_prefixes: BTreeSet<Prefix>,
    pub installed: Vec<Prefix>,
    pub withheld: BTreeMap<Prefix, WithholdReason>,
}

impl InstallReport {
    pub fn is_noop(&self) -> bool {
        self.installed.is_empty()
    }
}

pub struct BlackholeInstaller {
    local_asn: Asn,
}

impl BlackholeInstaller {
    pub fn new(local_asn: Asn) -> Self {
        Self { local_asn }
    }

    /// Scan `rib` and install blackholes for its holes.
    ///
    /// Decisions are taken against the RIB as it was before the pass; the
    /// staged blackholes are written only once the scan is done. When two
    /// entries carry holes for the same prefix, the first one staged wins.
    pub fn install(
        &self,
        rib: &mut LocalRib,
        from_rel: Relationship,
        engine_input: Option<&EngineInput>,
    ) -> Result<InstallReport, PolicyError> {
        if engine_input.is_none() {
            return Err(PolicyError::contract(
                "blackhole insertion requires the engine input",
            ));
        }

        let mut report = InstallReport::default();
        let mut staged: BTreeMap<Prefix, Announcement> = BTreeMap::new();

        for (_, ann) in rib.prefix_anns() {
            for hole in &ann.holes {
                let prefix = hole.prefix();
                report.hole_prefixes.insert(prefix);

                match rib.get_ann(&prefix).and_then(WithholdReason::for_entry) {
                    Some(reason) => {
                        tracing::debug!("blackhole: withheld for {prefix} ({reason:?})");
                        report.withheld.insert(prefix, reason);
                    }
                    None => {
                        staged
                            .entry(prefix)
                            .or_insert_with(|| self.blackhole_for(hole, from_rel));
                    }
                }
            }
        }

        for (prefix, blackhole) in staged {
            tracing::debug!("blackhole: installing for {prefix}");
            rib.add_ann(blackhole);
            report.installed.push(prefix);
        }

        Ok(report)
    }

    fn blackhole_for(&self, hole: &Hole, from_rel: Relationship) -> Announcement {
        let mut blackhole = hole.ann().copy_and_process(
            self.local_asn,
            from_rel,
            CopyOptions::new()
                .holes(Vec::new())
                .blackhole(true)
                .traceback_end(true),
        );
        blackhole.temp_holes = None;
        blackhole
    }
}

/// Check that no prefix in `hole_prefixes` is left with an invalid,
/// non-blackholed route. Preventive entries are exempt.
pub fn verify_blackholed(
    rib: &LocalRib,
    hole_prefixes: &BTreeSet<Prefix>,
) -> Result<(), PolicyError> {
    for prefix in hole_prefixes {
        if let Some(entry) = rib.get_ann(prefix) {
            if entry.invalid_by_roa() && !entry.blackhole && !entry.preventive {
                return Err(PolicyError::InvariantBroken { prefix: *prefix });
            }
        }
    }
    Ok(())
}
