use crate::types::Prefix;

/// Errors raised by the ROV++ policy.
///
/// Every variant is fatal for the simulation trial that produced it.
/// Conditions the policy treats as normal (no same-neighbor match while
/// counting holes, promoting a candidate without temporary holes) are not
/// represented here at all.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("contract violation: {reason}")]
    ContractViolation { reason: String },

    #[error("hole recount is only verified for round 0 (got round {round})")]
    StaleAssumption { round: u32 },

    #[error("invalid announcement left without a blackhole for {prefix}")]
    InvariantBroken { prefix: Prefix },

    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),
}

impl PolicyError {
    /// Shorthand for a [`PolicyError::ContractViolation`].
    pub fn contract(reason: impl Into<String>) -> Self {
        PolicyError::ContractViolation {
            reason: reason.into(),
        }
    }

    /// Whether the trial that raised this error must be aborted.
    ///
    /// Only malformed textual input (a prefix that fails to parse) can be
    /// corrected and retried by the caller.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PolicyError::InvalidPrefix(_))
    }
}

impl From<ipnet::AddrParseError> for PolicyError {
    fn from(e: ipnet::AddrParseError) -> Self {
        PolicyError::InvalidPrefix(e.to_string())
    }
}
