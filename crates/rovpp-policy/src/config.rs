use crate::types::Asn;

/// Configuration for a [`RovppV1Lite`](crate::RovppV1Lite) policy instance.
///
/// ```rust
/// use rovpp_policy::PolicyConfig;
///
/// let config = PolicyConfig::new(64500)
///     .verify_invariants(false)
///     .reset_queue(true);
/// assert_eq!(config.asn(), 64500);
/// ```
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// ASN of the AS running the policy.
    pub(crate) asn: Asn,
    /// Check after every round that each hole prefix is blackholed or
    /// otherwise covered.
    pub(crate) verify_invariants: bool,
    /// Clear the receive queue once a round has been processed.
    pub(crate) reset_queue: bool,
    /// Run the scenario's temporary hole counter around selection, so its
    /// promoted holes reach the blackhole installer in the same round.
    pub(crate) temp_holes: bool,
}

impl PolicyConfig {
    /// Create a config with defaults.
    ///
    /// Invariant verification is on unless `ROVPP_VERIFY_INVARIANTS` is set
    /// to `0` or `false`; large sweeps turn it off for speed.
    pub fn new(asn: Asn) -> Self {
        let verify_invariants = std::env::var("ROVPP_VERIFY_INVARIANTS")
            .map(|v| !matches!(v.trim(), "0" | "false"))
            .unwrap_or(true);

        Self {
            asn,
            verify_invariants,
            reset_queue: true,
            temp_holes: false,
        }
    }

    pub fn verify_invariants(mut self, enabled: bool) -> Self {
        self.verify_invariants = enabled;
        self
    }

    /// Keep the receive queue after processing (default: cleared).
    pub fn reset_queue(mut self, enabled: bool) -> Self {
        self.reset_queue = enabled;
        self
    }

    /// Count temporary holes before selection and promote them right after
    /// (default: off).
    pub fn temp_holes(mut self, enabled: bool) -> Self {
        self.temp_holes = enabled;
        self
    }

    pub fn asn(&self) -> Asn {
        self.asn
    }

    pub fn verifies_invariants(&self) -> bool {
        self.verify_invariants
    }

    pub fn resets_queue(&self) -> bool {
        self.reset_queue
    }

    pub fn counts_temp_holes(&self) -> bool {
        self.temp_holes
    }
}
