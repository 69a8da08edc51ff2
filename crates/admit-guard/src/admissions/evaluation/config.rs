use serde::{Deserialize, Serialize};

use super::rationale::RationalePolicy;

/// Tunables for the submission gate and the assembler's review flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    pub rationale: RationalePolicy,
    /// A record with more open exceptions than this is flagged for manual review.
    pub auto_flag_threshold: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            rationale: RationalePolicy::default(),
            auto_flag_threshold: 2,
        }
    }
}
