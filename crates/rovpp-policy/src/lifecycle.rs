/// Hole lifecycle across rounds and at the propagation boundary.
///
/// Holes are never cached between rounds: the detector re-derives them from
/// each round's receive queue. Recounting holes already stored in the RIB
/// is only verified for the first propagation round. Holes are local
/// defensive state and are stripped from everything sent to neighbors.
use crate::announcement::{Announcement, CopyOptions};
use crate::error::PolicyError;
use crate::rib::LocalRib;

/// The only propagation round hole recounting is verified for.
pub const VERIFIED_RECOUNT_ROUND: u32 = 0;

/// Recount holes of the announcements in the local RIB after `round`.
///
/// A previously valid prefix may gain an invalid subprefix later, or an
/// invalid subprefix may disappear. Neither can happen before round 0 has
/// been processed, so round 0 needs no further work. Later rounds are not
/// supported.
pub fn recount_holes(round: u32) -> Result<(), PolicyError> {
    if round != VERIFIED_RECOUNT_ROUND {
        return Err(PolicyError::StaleAssumption { round });
    }
    Ok(())
}

/// Copy of `ann` safe to send to a neighbor: no holes, no temporary holes.
pub fn scrub_for_propagation(ann: &Announcement) -> Announcement {
    let mut copy = ann.copy_with(CopyOptions::new().holes(Vec::new()));
    copy.temp_holes = None;
    copy
}

/// Announcements this AS offers to its neighbors. Blackholes stay local.
pub fn outgoing_anns(rib: &LocalRib) -> Vec<Announcement> {
    rib.prefix_anns()
        .filter(|(_, ann)| !ann.blackhole)
        .map(|(_, ann)| scrub_for_propagation(ann))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announcement::Hole;
    use crate::types::{Prefix, RoaValidity};

    fn p(s: &str) -> Prefix {
        s.parse().unwrap()
    }

    #[test]
    fn recount_round_zero_ok() {
        assert!(recount_holes(0).is_ok());
    }

    #[test]
    fn recount_later_round_is_stale() {
        let err = recount_holes(1).unwrap_err();
        assert!(matches!(err, PolicyError::StaleAssumption { round: 1 }));
        assert!(err.is_fatal());
    }

    #[test]
    fn scrub_strips_holes_and_temp_holes() {
        let sub = Announcement::new(p("10.0.0.0/16"), vec![1, 666], RoaValidity::Invalid);
        let mut ann = Announcement::new(p("10.0.0.0/8"), vec![100, 1, 777], RoaValidity::Valid)
            .copy_with(CopyOptions::new().holes(vec![Hole::new(&sub)]));
        ann.temp_holes = Some(vec![Hole::new(&sub)]);

        let out = scrub_for_propagation(&ann);
        assert!(out.holes.is_empty());
        assert!(out.temp_holes.is_none());
        assert_eq!(out.as_path, ann.as_path);
        assert_eq!(ann.holes.len(), 1, "stored entry keeps its holes");
    }

    #[test]
    fn blackholes_are_not_propagated() {
        let mut rib = LocalRib::new();
        rib.add_ann(Announcement::new(p("10.0.0.0/8"), vec![100, 1, 777], RoaValidity::Valid));
        rib.add_ann(
            Announcement::new(p("10.0.0.0/16"), vec![100, 1, 666], RoaValidity::Invalid)
                .copy_with(CopyOptions::new().blackhole(true).traceback_end(true)),
        );

        let out = outgoing_anns(&rib);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].prefix, p("10.0.0.0/8"));
    }
}
