use rovpp_policy::{Announcement, Asn, PolicyConfig, RoundOutcome, RovSelector, RovppV1Lite};
use serde::Serialize;

use crate::fixture::Fixture;

/// Result of replaying one fixture, printed as JSON.
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub policy: &'static str,
    pub asn: Asn,
    pub outcome: RoundOutcome,
    pub local_rib: Vec<Announcement>,
    pub outgoing: Vec<Announcement>,
}

pub fn run(fixture: Fixture, config: PolicyConfig) -> anyhow::Result<ReplayReport> {
    let input = fixture.engine_input()?;
    let mut policy = RovppV1Lite::new(config);

    for ann in fixture.local_rib {
        policy.local_rib_mut().add_ann(ann);
    }
    for ann in fixture.received {
        policy.receive_ann(ann)?;
    }

    let outcome =
        policy.process_incoming_anns(fixture.from_rel, fixture.round, Some(&input), &RovSelector)?;

    Ok(ReplayReport {
        policy: policy.name(),
        asn: policy.asn(),
        outcome,
        local_rib: policy
            .local_rib()
            .prefix_anns()
            .map(|(_, a)| a.clone())
            .collect(),
        outgoing: policy.outgoing_anns(),
    })
}
