use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use rovpp_policy::{
    Announcement, Asn, EngineInput, HoleAugmentation, Prefix, PrefixHierarchy, Relationship,
    SubprefixHijack,
};
use serde::Deserialize;

/// One AS, one round: what it already holds and what it receives.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub asn: Asn,
    #[serde(default)]
    pub round: u32,
    #[serde(default = "default_from_rel")]
    pub from_rel: Relationship,
    /// Subprefix hijack prefixes. Defaults to `1.2.0.0/16` / `1.2.3.0/24`.
    #[serde(default)]
    pub hijack: Option<HijackSpec>,
    /// Explicit prefix → direct subprefixes. Derived from the announced
    /// prefixes when absent.
    #[serde(default)]
    pub hierarchy: Option<BTreeMap<Prefix, Vec<Prefix>>>,
    /// Entries already in the local RIB before the round.
    #[serde(default)]
    pub local_rib: Vec<Announcement>,
    pub received: Vec<Announcement>,
}

#[derive(Debug, Deserialize)]
pub struct HijackSpec {
    pub victim_prefix: Prefix,
    pub attacker_prefix: Prefix,
}

fn default_from_rel() -> Relationship {
    Relationship::Customer
}

pub fn load(path: &Path) -> anyhow::Result<Fixture> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading fixture {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing fixture {}", path.display()))
}

impl Fixture {
    pub fn engine_input(&self) -> anyhow::Result<EngineInput> {
        let mut scenario = SubprefixHijack::new(Arc::new(HoleAugmentation::default()));
        if let Some(h) = &self.hijack {
            scenario = scenario.with_prefixes(h.victim_prefix, h.attacker_prefix);
        }

        let hierarchy = match &self.hierarchy {
            Some(map) => {
                let mut hierarchy = PrefixHierarchy::new();
                for (prefix, subprefixes) in map {
                    for sub in subprefixes {
                        hierarchy.register(*prefix, *sub)?;
                    }
                }
                hierarchy
            }
            None => PrefixHierarchy::from_prefixes(
                self.received
                    .iter()
                    .chain(&self.local_rib)
                    .map(|a| a.prefix),
            ),
        };

        Ok(EngineInput::with_hierarchy(hierarchy, scenario))
    }
}
