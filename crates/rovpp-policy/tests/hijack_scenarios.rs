/// End-to-end subprefix hijack scenarios through the v1 Lite policy.
///
/// Each test drives one AS for round 0 the way the simulation engine does:
/// receive, process with a selector, propagate.
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rovpp_policy::{
    Announcement, Asn, BlackholeInstaller, EngineInput, HoleAugmentation, PolicyConfig, Prefix,
    PrefixHierarchy, Relationship, RoaValidity, RouteSelector, RovSelector, RovppV1Lite,
    SubprefixHijack, WithholdReason,
};

const LOCAL: Asn = 100;
const N1: Asn = 1;
const N2: Asn = 2;

fn p(s: &str) -> Prefix {
    s.parse().unwrap()
}

fn hijack() -> SubprefixHijack {
    SubprefixHijack::new(Arc::new(HoleAugmentation::default()))
        .with_prefixes(p("10.0.0.0/8"), p("10.0.0.0/16"))
}

fn engine_input() -> EngineInput {
    EngineInput::new(hijack())
}

fn victim_via(neighbor: Asn) -> Announcement {
    Announcement::new(p("10.0.0.0/8"), vec![neighbor, 777], RoaValidity::Valid)
}

fn attacker_via(neighbor: Asn) -> Announcement {
    Announcement::new(p("10.0.0.0/16"), vec![neighbor, 666], RoaValidity::Invalid)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn policy() -> RovppV1Lite {
    RovppV1Lite::new(PolicyConfig::new(LOCAL).verify_invariants(true))
}

/// Victim /8 and attacker /16 both via N1: blackhole for the /16.
#[test]
fn same_neighbor_subprefix_gets_blackholed() {
    init_tracing();
    let input = engine_input();
    let mut pol = policy();
    pol.receive_ann(victim_via(N1)).unwrap();
    pol.receive_ann(attacker_via(N1)).unwrap();

    let outcome = pol
        .process_incoming_anns(Relationship::Customer, 0, Some(&input), &RovSelector)
        .unwrap();

    assert_eq!(outcome.holes_found, 1);
    assert_eq!(outcome.install.installed, vec![p("10.0.0.0/16")]);

    let covering = pol.local_rib().get_ann(&p("10.0.0.0/8")).unwrap();
    assert_eq!(covering.holes.len(), 1);
    assert_eq!(covering.holes[0].prefix(), p("10.0.0.0/16"));

    let bh = pol.local_rib().get_ann(&p("10.0.0.0/16")).unwrap();
    assert!(bh.blackhole && bh.traceback_end);
    assert!(bh.holes.is_empty());
}

/// Attacker via N2 instead: no hole, no blackhole.
#[test]
fn cross_neighbor_subprefix_is_ignored() {
    let input = engine_input();
    let mut pol = policy();
    pol.receive_ann(victim_via(N1)).unwrap();
    pol.receive_ann(attacker_via(N2)).unwrap();

    let outcome = pol
        .process_incoming_anns(Relationship::Customer, 0, Some(&input), &RovSelector)
        .unwrap();

    assert_eq!(outcome.holes_found, 0);
    assert!(outcome.install.installed.is_empty());
    assert!(pol.local_rib().get_ann(&p("10.0.0.0/16")).is_none());
    assert!(pol.local_rib().get_ann(&p("10.0.0.0/8")).unwrap().holes.is_empty());
}

/// A valid /16 already in the RIB is left alone despite the hole.
#[test]
fn existing_valid_subprefix_is_untouched() {
    let input = engine_input();
    let mut pol = policy();
    let valid = Announcement::new(p("10.0.0.0/16"), vec![LOCAL, N2, 777], RoaValidity::Valid);
    pol.local_rib_mut().add_ann(valid.clone());

    pol.receive_ann(victim_via(N1)).unwrap();
    pol.receive_ann(attacker_via(N1)).unwrap();
    let outcome = pol
        .process_incoming_anns(Relationship::Customer, 0, Some(&input), &RovSelector)
        .unwrap();

    assert!(outcome.install.installed.is_empty());
    assert_eq!(
        outcome.install.withheld.get(&p("10.0.0.0/16")),
        Some(&WithholdReason::Valid)
    );
    assert_eq!(pol.local_rib().get_ann(&p("10.0.0.0/16")), Some(&valid));
}

/// Same round: a valid /16 from N2 wins selection over the invalid one
/// from N1, so the hole on the /8 does not produce a blackhole.
#[test]
fn valid_subprefix_received_same_round_wins() {
    let input = engine_input();
    let mut pol = policy();
    pol.receive_ann(victim_via(N1)).unwrap();
    pol.receive_ann(attacker_via(N1)).unwrap();
    pol.receive_ann(Announcement::new(p("10.0.0.0/16"), vec![N2, 777], RoaValidity::Valid))
        .unwrap();

    let outcome = pol
        .process_incoming_anns(Relationship::Customer, 0, Some(&input), &RovSelector)
        .unwrap();

    assert_eq!(outcome.holes_found, 1);
    assert!(outcome.install.installed.is_empty());
    assert!(!pol.local_rib().get_ann(&p("10.0.0.0/16")).unwrap().blackhole);
}

/// Victim candidates from N1 and N2, attacker only via N1. Temporary holes
/// land on N1's candidate, are promoted once selection picks it, and the
/// same round blackholes the attacker prefix.
#[test]
fn temp_holes_promoted_on_selected_candidate() {
    init_tracing();
    let input = engine_input();
    let mut pol = RovppV1Lite::new(
        PolicyConfig::new(LOCAL)
            .verify_invariants(true)
            .reset_queue(false)
            .temp_holes(true),
    );
    pol.receive_ann(victim_via(N1)).unwrap();
    pol.receive_ann(victim_via(N2)).unwrap();
    pol.receive_ann(attacker_via(N1)).unwrap();

    // Selection (lowest neighbor wins the tie) picks N1's candidate.
    let outcome = pol
        .process_incoming_anns(Relationship::Customer, 0, Some(&input), &RovSelector)
        .unwrap();
    assert_eq!(outcome.temp_holes, 1);
    assert_eq!(outcome.install.installed, vec![p("10.0.0.0/16")]);

    let selected = pol.local_rib().get_ann(&p("10.0.0.0/8")).unwrap();
    assert_eq!(selected.as_path, vec![LOCAL, N1, 777]);
    assert_eq!(selected.holes.len(), 1);
    assert_eq!(selected.holes[0].ann().neighbor(), Some(N1));
    assert!(selected.temp_holes.is_none());
    assert!(pol
        .recv_q()
        .get_ann_list(&p("10.0.0.0/8"))
        .iter()
        .all(|a| a.temp_holes.is_none()));
    assert!(pol.local_rib().get_ann(&p("10.0.0.0/16")).unwrap().blackhole);
}

/// Only the scenario counter knows about the subprefix: the hierarchy is
/// empty, so detection alone would leave the attacker route unblackholed.
#[test]
fn counter_only_hole_is_blackholed_in_same_round() {
    init_tracing();
    let input = EngineInput::with_hierarchy(PrefixHierarchy::new(), hijack());
    let mut pol = RovppV1Lite::new(
        PolicyConfig::new(LOCAL)
            .verify_invariants(true)
            .temp_holes(true),
    );
    pol.receive_ann(victim_via(N1)).unwrap();
    pol.receive_ann(attacker_via(N1)).unwrap();

    let outcome = pol
        .process_incoming_anns(Relationship::Customer, 0, Some(&input), &RovSelector)
        .unwrap();

    assert_eq!(outcome.holes_found, 0);
    assert_eq!(outcome.temp_holes, 1);
    assert_eq!(outcome.install.installed, vec![p("10.0.0.0/16")]);
    assert!(pol.local_rib().get_ann(&p("10.0.0.0/16")).unwrap().blackhole);

    let rerun = BlackholeInstaller::new(LOCAL)
        .install(pol.local_rib_mut(), Relationship::Customer, Some(&input))
        .unwrap();
    assert!(rerun.is_noop());
}

/// Hole detection does not depend on the order announcements arrive in.
#[test]
fn detection_is_order_independent() {
    let anns = vec![
        victim_via(N1),
        victim_via(N2),
        attacker_via(N1),
        attacker_via(N2),
        Announcement::new(p("10.1.0.0/16"), vec![N1, 666], RoaValidity::Invalid),
    ];
    let hierarchy = PrefixHierarchy::from_prefixes(anns.iter().map(|a| a.prefix));
    let input = EngineInput::with_hierarchy(hierarchy, hijack());

    let mut baseline = None;
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for _ in 0..10 {
        let mut shuffled = anns.clone();
        shuffled.shuffle(&mut rng);

        let mut pol = policy();
        for ann in shuffled {
            pol.receive_ann(ann).unwrap();
        }
        pol.process_incoming_anns(Relationship::Customer, 0, Some(&input), &RovSelector)
            .unwrap();

        let mut blackholed: Vec<Prefix> = pol
            .local_rib()
            .prefix_anns()
            .filter(|(_, a)| a.blackhole)
            .map(|(p, _)| *p)
            .collect();
        blackholed.sort();

        match &baseline {
            None => baseline = Some(blackholed),
            Some(expected) => assert_eq!(&blackholed, expected),
        }
    }
    assert_eq!(
        baseline.unwrap(),
        vec![p("10.0.0.0/16"), p("10.1.0.0/16")]
    );
}

/// A custom selector plugs into the same seam.
#[test]
fn host_selector_drives_the_round() {
    struct TakeEverything;

    impl RouteSelector for TakeEverything {
        fn select(
            &self,
            local_asn: Asn,
            recv_q: &rovpp_policy::RecvQueue,
            holes: &rovpp_policy::HoleMap,
            rib: &mut rovpp_policy::LocalRib,
            from_rel: Relationship,
        ) {
            for (prefix, anns) in recv_q.prefix_anns() {
                let key = rovpp_policy::AnnKey::new(*prefix, 0);
                let opts = rovpp_policy::CopyOptions::new().holes(holes.holes_for(&key).to_vec());
                rib.add_ann(anns[0].copy_and_process(local_asn, from_rel, opts));
            }
        }
    }

    // Invalid /16 is selected too; the installer must replace it.
    let input = engine_input();
    let mut pol = policy();
    pol.receive_ann(victim_via(N1)).unwrap();
    pol.receive_ann(attacker_via(N1)).unwrap();
    let outcome = pol
        .process_incoming_anns(Relationship::Provider, 0, Some(&input), &TakeEverything)
        .unwrap();

    assert_eq!(outcome.install.installed, vec![p("10.0.0.0/16")]);
    let bh = pol.local_rib().get_ann(&p("10.0.0.0/16")).unwrap();
    assert!(bh.blackhole);
    assert_eq!(bh.recv_relationship, Relationship::Provider);
}

/// Blackholes and holes never leave the AS.
#[test]
fn propagation_is_scrubbed() {
    let input = engine_input();
    let mut pol = policy();
    pol.receive_ann(victim_via(N1)).unwrap();
    pol.receive_ann(attacker_via(N1)).unwrap();
    pol.process_incoming_anns(Relationship::Customer, 0, Some(&input), &RovSelector)
        .unwrap();

    let out = pol.outgoing_anns();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].prefix, p("10.0.0.0/8"));
    assert!(out[0].holes.is_empty());
    assert!(out[0].temp_holes.is_none());
}
