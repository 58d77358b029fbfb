//! Resource model.
//!
//! Resources are the machines and workstations that perform operations.
//! Each resource declares a set of capabilities (operation tags it can
//! execute) and a working calendar of absolute [open, close) windows.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1.2

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resource that operations can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Capabilities this resource provides (e.g., "fill", "label").
    pub capabilities: Vec<String>,
    /// Working windows as [open, close) instant pairs, sorted and disjoint.
    pub calendar: Vec<(DateTime<Utc>, DateTime<Utc>)>,
}

impl Resource {
    /// Creates a resource with no capabilities and an empty calendar.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            capabilities: Vec::new(),
            calendar: Vec::new(),
        }
    }

    /// Adds a capability.
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    /// Adds a working window.
    pub fn with_window(mut self, open: DateTime<Utc>, close: DateTime<Utc>) -> Self {
        self.calendar.push((open, close));
        self
    }

    /// Whether this resource provides a capability.
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}
