use std::net::Ipv4Addr;

use ipnet::{IpNet, Ipv4Net};
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Autonomous system number.
pub type Asn = u32;

/// Network block identifier.
pub type Prefix = IpNet;

/// ASN used by the victim in the built-in attack scenarios.
pub const VICTIM_ASN: Asn = 777;

/// ASN used by the attacker in the built-in attack scenarios.
pub const ATTACKER_ASN: Asn = 666;

/// Relationship of the neighbor an announcement was received from.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Provider = 1,
    Peer = 2,
    Customer = 3,
    /// Seeded by this AS itself.
    #[default]
    Origin = 4,
}

/// Route origin validation outcome, computed outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoaValidity {
    Valid,
    Unknown,
    Invalid,
}

/// Parse a prefix in CIDR notation, normalizing host bits away.
pub fn parse_prefix(s: &str) -> Result<Prefix, PolicyError> {
    Ok(s.trim().parse::<Prefix>()?.trunc())
}

/// Default covering prefix announced by the victim (`1.2.0.0/16`).
pub fn default_prefix() -> Prefix {
    IpNet::V4(Ipv4Net::new(Ipv4Addr::new(1, 2, 0, 0), 16).expect("16 is a valid v4 length"))
}

/// Default more-specific prefix announced by the attacker (`1.2.3.0/24`).
pub fn default_subprefix() -> Prefix {
    IpNet::V4(Ipv4Net::new(Ipv4Addr::new(1, 2, 3, 0), 24).expect("24 is a valid v4 length"))
}
