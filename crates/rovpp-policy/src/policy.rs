/// ROV++ v1 Lite policy for one AS.
///
/// Owns the AS's receive queue and local RIB. The host engine feeds
/// announcements with [`RovppV1Lite::receive_ann`], then calls
/// [`RovppV1Lite::process_incoming_anns`] once per round with its selector,
/// and finally propagates [`RovppV1Lite::outgoing_anns`].
use serde::Serialize;

use crate::announcement::Announcement;
use crate::attack::{EngineInput, TempHoleMap};
use crate::blackhole::{verify_blackholed, BlackholeInstaller, InstallReport};
use crate::config::PolicyConfig;
use crate::error::PolicyError;
use crate::holes::detect_holes;
use crate::lifecycle;
use crate::queue::RecvQueue;
use crate::rib::LocalRib;
use crate::selection::RouteSelector;
use crate::types::{Asn, Relationship};

pub const POLICY_NAME: &str = "ROV++V1 Lite Simple";

/// Summary of one processed round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundOutcome {
    pub round: u32,
    pub from_rel: Relationship,
    /// Holes found in the receive queue, before selection.
    pub holes_found: usize,
    /// Attacker announcements collected by the scenario's temporary hole
    /// counter. Zero unless [`PolicyConfig::temp_holes`] is on.
    pub temp_holes: usize,
    pub install: InstallReport,
}

pub struct RovppV1Lite {
    config: PolicyConfig,
    recv_q: RecvQueue,
    local_rib: LocalRib,
    installer: BlackholeInstaller,
}

impl RovppV1Lite {
    pub fn new(config: PolicyConfig) -> Self {
        let installer = BlackholeInstaller::new(config.asn());
        Self {
            config,
            recv_q: RecvQueue::new(),
            local_rib: LocalRib::new(),
            installer,
        }
    }

    pub fn name(&self) -> &'static str {
        POLICY_NAME
    }

    pub fn asn(&self) -> Asn {
        self.config.asn()
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn recv_q(&self) -> &RecvQueue {
        &self.recv_q
    }

    pub fn local_rib(&self) -> &LocalRib {
        &self.local_rib
    }

    /// Direct RIB access for hosts that seed or inspect routes between
    /// rounds.
    pub fn local_rib_mut(&mut self) -> &mut LocalRib {
        &mut self.local_rib
    }

    /// Queue an announcement for this round.
    ///
    /// The policy cannot reason about announcements that were never run
    /// through ROV, nor about ones without a neighbor in their path.
    pub fn receive_ann(&mut self, ann: Announcement) -> Result<(), PolicyError> {
        if ann.roa.is_none() {
            tracing::warn!("AS {}: dropping {} without ROA validity", self.asn(), ann.prefix);
            return Err(PolicyError::contract(format!(
                "announcement for {} carries no ROA validity",
                ann.prefix
            )));
        }
        if ann.as_path.is_empty() {
            tracing::warn!("AS {}: dropping {} with empty AS path", self.asn(), ann.prefix);
            return Err(PolicyError::contract(format!(
                "announcement for {} has an empty AS path",
                ann.prefix
            )));
        }
        self.recv_q.add_ann(ann);
        Ok(())
    }

    /// Process everything received this round.
    ///
    /// Holes are detected over the full queue, `selector` populates the RIB
    /// (carrying holes onto stored copies), blackholes are installed, and
    /// holes are recounted for `round`. With [`PolicyConfig::temp_holes`]
    /// on, the scenario's counter runs before selection and its holes are
    /// promoted before the installer sees the RIB.
    pub fn process_incoming_anns<S: RouteSelector + ?Sized>(
        &mut self,
        from_rel: Relationship,
        round: u32,
        engine_input: Option<&EngineInput>,
        selector: &S,
    ) -> Result<RoundOutcome, PolicyError> {
        let input = engine_input
            .ok_or_else(|| PolicyError::contract("round processing requires the engine input"))?;

        let holes = detect_holes(&self.recv_q, input.hierarchy());
        let temp_holes: usize = if self.config.counts_temp_holes() {
            self.count_temp_holes(input).values().map(Vec::len).sum()
        } else {
            0
        };

        selector.select(
            self.config.asn(),
            &self.recv_q,
            &holes,
            &mut self.local_rib,
            from_rel,
        );
        if self.config.counts_temp_holes() {
            self.promote_temp_holes(input);
        }

        let install = self
            .installer
            .install(&mut self.local_rib, from_rel, Some(input))?;
        if self.config.verifies_invariants() {
            verify_blackholed(&self.local_rib, &install.hole_prefixes)?;
        }

        lifecycle::recount_holes(round)?;

        if self.config.resets_queue() {
            self.recv_q.clear();
        }

        tracing::info!(
            "AS {}: round {round} from {from_rel:?}: {} hole(s), {} blackhole(s) installed, {} withheld",
            self.asn(),
            holes.total_holes(),
            install.installed.len(),
            install.withheld.len()
        );

        Ok(RoundOutcome {
            round,
            from_rel,
            holes_found: holes.total_holes(),
            temp_holes,
            install,
        })
    }

    /// Run the scenario's temporary hole counter over the receive queue.
    /// Call before selection, or let the round do it via
    /// [`PolicyConfig::temp_holes`].
    pub fn count_temp_holes(&mut self, engine_input: &EngineInput) -> TempHoleMap {
        engine_input.scenario().count_holes(&mut self.recv_q)
    }

    /// Promote temporary holes on the selected victim-prefix entry and clear
    /// them from every candidate. Call after selection.
    pub fn promote_temp_holes(&mut self, engine_input: &EngineInput) {
        engine_input
            .scenario()
            .remove_temp_holes(&mut self.recv_q, &mut self.local_rib);
    }

    /// Copies of the RIB to offer neighbors: blackholes withheld, holes
    /// stripped.
    pub fn outgoing_anns(&self) -> Vec<Announcement> {
        lifecycle::outgoing_anns(&self.local_rib)
    }

    pub fn reset_q(&mut self) {
        self.recv_q.clear();
    }
}
