/// Best-path selection seam.
///
/// Selection belongs to the host engine. The policy only needs the local
/// RIB populated, with detected holes carried onto the copies it stores,
/// before the blackhole pass runs.
use crate::announcement::{Announcement, CopyOptions};
use crate::holes::{AnnKey, HoleMap};
use crate::queue::RecvQueue;
use crate::rib::LocalRib;
use crate::types::{Asn, Relationship};

pub trait RouteSelector {
    /// Populate `rib` from this round's `recv_q`. Stored copies must carry
    /// the holes `holes` lists for the announcement they were made from.
    fn select(
        &self,
        local_asn: Asn,
        recv_q: &RecvQueue,
        holes: &HoleMap,
        rib: &mut LocalRib,
        from_rel: Relationship,
    );
}

/// Minimal ROV selector for harnesses and tests.
///
/// Drops ROA-invalid and looping announcements, then prefers the shortest
/// path and the lowest neighbor ASN. An existing entry is replaced when it
/// is a blackhole, ROA-invalid, or has a longer path than the candidate.
/// No Gao-Rexford relationship preference.
#[derive(Debug, Default, Clone, Copy)]
pub struct RovSelector;

impl RovSelector {
    fn better(candidate: &Announcement, current: &Announcement) -> bool {
        (candidate.as_path.len(), candidate.neighbor()) < (current.as_path.len(), current.neighbor())
    }
}

impl RouteSelector for RovSelector {
    fn select(
        &self,
        local_asn: Asn,
        recv_q: &RecvQueue,
        holes: &HoleMap,
        rib: &mut LocalRib,
        from_rel: Relationship,
    ) {
        for (prefix, anns) in recv_q.prefix_anns() {
            let best = anns
                .iter()
                .enumerate()
                .filter(|(_, ann)| !ann.invalid_by_roa() && !ann.as_path.contains(&local_asn))
                .min_by_key(|(_, ann)| (ann.as_path.len(), ann.neighbor()));

            let Some((slot, ann)) = best else {
                continue;
            };

            let candidate = ann.copy_and_process(
                local_asn,
                from_rel,
                CopyOptions::new().holes(holes.holes_for(&AnnKey::new(*prefix, slot)).to_vec()),
            );

            let replace = match rib.get_ann(prefix) {
                None => true,
                Some(current) => {
                    current.blackhole || current.invalid_by_roa() || Self::better(&candidate, current)
                }
            };
            if replace {
                rib.add_ann(candidate);
            }
        }
    }
}
