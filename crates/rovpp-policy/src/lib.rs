//! ROV++ v1 Lite policy layer.
//!
//! Detects subprefix hijacks ("holes") in the announcements an AS receives
//! during a propagation round and neutralizes them by installing blackhole
//! routes in the local RIB.
//!
//! Pure logic: the host simulation engine owns propagation, best-path
//! selection and trial orchestration, and drives this crate once per AS per
//! round.

pub mod announcement;
pub mod attack;
pub mod blackhole;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod holes;
pub mod lifecycle;
pub mod policy;
pub mod queue;
pub mod rib;
pub mod selection;
pub mod types;

pub use announcement::{Announcement, CopyOptions, Hole};
pub use attack::{
    EngineInput, HoleAugmentation, HoleCounter, PrefixHijack, Scenario, SubprefixHijack,
    TempHoleMap, UnannouncedPrefixHijack,
};
pub use blackhole::{BlackholeInstaller, InstallReport, WithholdReason};
pub use config::PolicyConfig;
pub use error::PolicyError;
pub use hierarchy::PrefixHierarchy;
pub use holes::{detect_holes, AnnKey, HoleMap};
pub use lifecycle::{outgoing_anns, recount_holes, scrub_for_propagation};
pub use policy::{RoundOutcome, RovppV1Lite};
pub use queue::RecvQueue;
pub use rib::LocalRib;
pub use selection::{RouteSelector, RovSelector};
pub use types::{parse_prefix, Asn, Prefix, Relationship, RoaValidity};
