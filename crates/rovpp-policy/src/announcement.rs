/// Route records handled by the ROV++ policy.
///
/// An [`Announcement`] is a plain value: every copy is independent, and the
/// only way to derive a modified record is [`Announcement::copy_with`] (or
/// [`Announcement::copy_and_process`] when the record enters the local RIB).
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{Asn, Prefix, Relationship, RoaValidity};

// ── Announcement ───────────────────────────────────────────────────────

/// A BGP announcement as seen by one AS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub prefix: Prefix,
    /// `as_path[0]` is the neighbor the announcement was received from.
    pub as_path: Vec<Asn>,
    /// ROV outcome. `None` means the engine never ran validation on it.
    #[serde(default)]
    pub roa: Option<RoaValidity>,
    #[serde(default)]
    pub blackhole: bool,
    #[serde(default)]
    pub preventive: bool,
    #[serde(default)]
    pub traceback_end: bool,
    #[serde(default)]
    pub recv_relationship: Relationship,
    /// Invalid subprefixes this announcement covers. Only set on RIB entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holes: Vec<Hole>,
    /// Holes recorded by an attack-scenario counter before selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_holes: Option<Vec<Hole>>,
}

impl Announcement {
    /// A fresh announcement with no defensive state attached.
    pub fn new(prefix: Prefix, as_path: Vec<Asn>, roa: RoaValidity) -> Self {
        Self {
            prefix,
            as_path,
            roa: Some(roa),
            blackhole: false,
            preventive: false,
            traceback_end: false,
            recv_relationship: Relationship::Origin,
            holes: Vec::new(),
            temp_holes: None,
        }
    }

    pub fn invalid_by_roa(&self) -> bool {
        self.roa == Some(RoaValidity::Invalid)
    }

    /// The neighbor this announcement was received from.
    pub fn neighbor(&self) -> Option<Asn> {
        self.as_path.first().copied()
    }

    /// The AS that originated this announcement.
    pub fn origin(&self) -> Option<Asn> {
        self.as_path.last().copied()
    }

    /// True when both announcements came in through the same neighbor.
    ///
    /// An empty path never matches anything.
    pub fn shares_neighbor(&self, other: &Announcement) -> bool {
        matches!((self.neighbor(), other.neighbor()), (Some(a), Some(b)) if a == b)
    }

    /// Copy this announcement, overriding the fields set in `opts`.
    pub fn copy_with(&self, opts: CopyOptions) -> Announcement {
        let mut copy = self.clone();
        if let Some(prefix) = opts.prefix {
            copy.prefix = prefix;
        }
        if let Some(holes) = opts.holes {
            copy.holes = holes;
        }
        if let Some(blackhole) = opts.blackhole {
            copy.blackhole = blackhole;
        }
        if let Some(traceback_end) = opts.traceback_end {
            copy.traceback_end = traceback_end;
        }
        copy
    }

    /// Copy a received announcement into the form stored in the local RIB:
    /// `local_asn` is prepended to the path and the receive relationship
    /// recorded, then `opts` is applied.
    pub fn copy_and_process(
        &self,
        local_asn: Asn,
        recv_relationship: Relationship,
        opts: CopyOptions,
    ) -> Announcement {
        let mut copy = self.copy_with(opts);
        copy.as_path.insert(0, local_asn);
        copy.recv_relationship = recv_relationship;
        copy
    }
}

// ── Copy options ───────────────────────────────────────────────────────

/// Fields to override when copying an [`Announcement`]. Unset fields are
/// carried over from the source record.
#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    pub holes: Option<Vec<Hole>>,
    pub blackhole: Option<bool>,
    pub traceback_end: Option<bool>,
    pub prefix: Option<Prefix>,
}

impl CopyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holes(mut self, holes: Vec<Hole>) -> Self {
        self.holes = Some(holes);
        self
    }

    pub fn blackhole(mut self, blackhole: bool) -> Self {
        self.blackhole = Some(blackhole);
        self
    }

    pub fn traceback_end(mut self, traceback_end: bool) -> Self {
        self.traceback_end = Some(traceback_end);
        self
    }

    pub fn prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }
}

// ── Holes ──────────────────────────────────────────────────────────────

/// An invalid, more-specific announcement covered by another announcement
/// received from the same neighbor.
///
/// Holds a shared, read-only snapshot of the subprefix announcement as it
/// sat in the receive queue; the covering record never owns or mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hole(Arc<Announcement>);

impl Hole {
    pub fn new(ann: &Announcement) -> Self {
        Hole(Arc::new(ann.clone()))
    }

    pub fn ann(&self) -> &Announcement {
        &self.0
    }

    pub fn prefix(&self) -> Prefix {
        self.0.prefix
    }
}
