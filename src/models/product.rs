//! Product and operation models.
//!
//! A product is a job to be manufactured: an ordered route of operations,
//! a family (for changeover accounting), and a due instant. Route order
//! is strict — operation k+1 may not start before operation k ends.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single processing step in a product's route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Operation {
    /// Capability required to execute this operation.
    pub capability: String,
    /// Processing time in whole minutes.
    pub duration_minutes: i64,
}

impl Operation {
    /// Creates a new operation.
    pub fn new(capability: impl Into<String>, duration_minutes: i64) -> Self {
        Self {
            capability: capability.into(),
            duration_minutes,
        }
    }
}

/// A product (job) to be scheduled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: String,
    /// Product family, the equivalence class used for changeover counting.
    pub family: String,
    /// Due instant. Completion after this accrues tardiness.
    pub due: DateTime<Utc>,
    /// Ordered operations; executed strictly in sequence.
    pub route: Vec<Operation>,
}

impl Product {
    /// Creates a product with an empty route.
    pub fn new(id: impl Into<String>, family: impl Into<String>, due: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            family: family.into(),
            due,
            route: Vec::new(),
        }
    }

    /// Appends an operation to the route.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.route.push(operation);
        self
    }

    /// Sum of route durations in minutes.
    pub fn total_duration_minutes(&self) -> i64 {
        self.route.iter().map(|op| op.duration_minutes).sum()
    }
}
