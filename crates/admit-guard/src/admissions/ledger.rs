use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::FieldId;

/// Exception requests for a single candidate, keyed by field.
///
/// Presence of a key means an exception was requested for that field; the value is the
/// rationale offered so far and may be empty. Serializes as a plain `field -> rationale`
/// object so stored records keep the same shape on the wire and in the audit table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExceptionLedger {
    entries: BTreeMap<FieldId, String>,
}

/// Outcome of writing a rationale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RationaleUpdate {
    Updated,
    /// No exception was open for the field, so the rationale opened one.
    Opened,
}

impl ExceptionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an exception with an empty rationale, or withdraw it if one is already open.
    /// Returns whether an exception is open after the call.
    pub fn toggle(&mut self, field: FieldId) -> bool {
        if self.entries.remove(&field).is_some() {
            false
        } else {
            self.entries.insert(field, String::new());
            true
        }
    }

    pub fn set_rationale(&mut self, field: FieldId, text: impl Into<String>) -> RationaleUpdate {
        match self.entries.insert(field, text.into()) {
            Some(_) => RationaleUpdate::Updated,
            None => RationaleUpdate::Opened,
        }
    }

    /// Drop the exception for `field`, returning the rationale it carried.
    pub fn clear(&mut self, field: FieldId) -> Option<String> {
        self.entries.remove(&field)
    }

    pub fn is_open(&self, field: FieldId) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn rationale(&self, field: FieldId) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> {
        self.entries
            .iter()
            .map(|(field, rationale)| (*field, rationale.as_str()))
    }
}

impl FromIterator<(FieldId, String)> for ExceptionLedger {
    fn from_iter<T: IntoIterator<Item = (FieldId, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
