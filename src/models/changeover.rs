//! Family changeover matrix.
//!
//! Maps ordered family pairs to changeover minutes, keyed `"From->To"`
//! on the wire. A missing pair means zero minutes; the self-pair
//! (`"A->A"`) is allowed and typically zero.
//!
//! Changeover time is accounted for in KPIs only — it is not enforced
//! as a separation constraint between adjacent operations.
//!
//! # Reference
//! Allahverdi et al. (2008), "A survey of scheduling problems with
//! setup times or costs"

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Separator between the two family names in a wire key.
pub const KEY_SEPARATOR: &str = "->";

/// Changeover minutes between product families.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeoverMatrix {
    /// Entries keyed `"fromFamily->toFamily"`, values in minutes.
    #[serde(default)]
    pub values: HashMap<String, i64>,
}

impl ChangeoverMatrix {
    /// Creates an empty matrix (every transition costs zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: sets the changeover time for a family transition.
    pub fn with_transition(mut self, from: &str, to: &str, minutes: i64) -> Self {
        self.values.insert(Self::key(from, to), minutes);
        self
    }

    /// Wire key for a transition.
    pub fn key(from: &str, to: &str) -> String {
        format!("{from}{KEY_SEPARATOR}{to}")
    }

    /// Changeover minutes from one family to another. Missing pair = 0.
    pub fn minutes(&self, from: &str, to: &str) -> i64 {
        self.values
            .get(&Self::key(from, to))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_default() {
        let m = ChangeoverMatrix::new()
            .with_transition("standard", "premium", 20)
            .with_transition("premium", "standard", 15);

        assert_eq!(m.minutes("standard", "premium"), 20);
        assert_eq!(m.minutes("premium", "standard"), 15);
        // Missing pair and self-pair both default to zero.
        assert_eq!(m.minutes("standard", "bulk"), 0);
        assert_eq!(m.minutes("standard", "standard"), 0);
    }

    #[test]
    fn test_key_format() {
        assert_eq!(ChangeoverMatrix::key("A", "B"), "A->B");
    }

    #[test]
    fn test_asymmetric() {
        let m = ChangeoverMatrix::new().with_transition("A", "B", 10);
        assert_eq!(m.minutes("A", "B"), 10);
        assert_eq!(m.minutes("B", "A"), 0);
    }

    #[test]
    fn test_deserialize_wire_keys() {
        let m: ChangeoverMatrix =
            serde_json::from_str(r#"{"values": {"standard->premium": 20}}"#).unwrap();
        assert_eq!(m.minutes("standard", "premium"), 20);
    }
}
