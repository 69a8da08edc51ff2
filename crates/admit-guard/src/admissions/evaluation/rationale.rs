use serde::{Deserialize, Serialize};

pub const MIN_RATIONALE_LENGTH: usize = 30;

pub const RATIONALE_KEYWORDS: [&str; 4] = [
    "approved by",
    "special case",
    "documentation pending",
    "waiver granted",
];

/// Acceptance policy for the free-text justification attached to an exception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RationalePolicy {
    pub min_length: usize,
    /// Lower-case phrases; at least one must appear in the rationale.
    pub keywords: Vec<String>,
}

impl RationalePolicy {
    pub fn new(min_length: usize, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            min_length,
            keywords: keywords
                .into_iter()
                .map(|keyword| keyword.into().to_lowercase())
                .collect(),
        }
    }

    /// Length is counted in characters, not bytes or words.
    pub fn is_acceptable(&self, text: &str) -> bool {
        if text.chars().count() < self.min_length {
            return false;
        }

        let lowered = text.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| lowered.contains(keyword.as_str()))
    }
}

impl Default for RationalePolicy {
    fn default() -> Self {
        Self::new(MIN_RATIONALE_LENGTH, RATIONALE_KEYWORDS)
    }
}
