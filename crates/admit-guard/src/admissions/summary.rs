use serde::Serialize;

use super::domain::Candidate;

/// Headline numbers for the audit dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub with_exceptions: usize,
    pub flagged: usize,
    /// Share of candidates carrying at least one exception, as a percentage with one decimal.
    pub exception_rate: f64,
}

impl DashboardSummary {
    pub fn from_candidates(candidates: &[Candidate]) -> Self {
        let total = candidates.len();
        let with_exceptions = candidates
            .iter()
            .filter(|candidate| candidate.exception_count() > 0)
            .count();
        let flagged = candidates.iter().filter(|candidate| candidate.flagged).count();

        let exception_rate = if total == 0 {
            0.0
        } else {
            let percent = with_exceptions as f64 / total as f64 * 100.0;
            (percent * 10.0).round() / 10.0
        };

        Self {
            total,
            with_exceptions,
            flagged,
            exception_rate,
        }
    }
}
