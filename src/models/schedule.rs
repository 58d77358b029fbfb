//! Schedule response model.
//!
//! The canonical success output: one assignment per route operation plus
//! the KPI block. Assignments reference products and resources by id and
//! carry absolute instants; the minute-domain placements produced by
//! search are converted before the response is assembled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An operation placed on a resource during a time interval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assignment {
    /// Product id.
    pub product: String,
    /// Capability of the route operation this assignment realizes.
    pub op: String,
    /// Resource id.
    pub resource: String,
    /// Start instant (UTC).
    pub start: DateTime<Utc>,
    /// End instant (UTC).
    pub end: DateTime<Utc>,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(
        product: impl Into<String>,
        op: impl Into<String>,
        resource: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            product: product.into(),
            op: op.into(),
            resource: resource.into(),
            start,
            end,
        }
    }

    /// Assignment length in whole minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Schedule quality metrics.
///
/// All time values are in minutes; utilization is a percentage in [0, 100].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Kpis {
    /// Total tardiness: `Σ_p max(0, completion(p) − due(p))`.
    pub tardiness_minutes: i64,
    /// Count of adjacent same-resource operation pairs with differing families.
    pub changeovers: i64,
    /// Latest end minus earliest start across all assignments; 0 when empty.
    pub makespan_minutes: i64,
    /// Busy / available percentage per resource, rounded to nearest integer.
    pub utilization: BTreeMap<String, i64>,
}

/// A validated schedule: the canonical success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    /// One assignment per (product, route position).
    pub assignments: Vec<Assignment>,
    /// Quality metrics for the schedule.
    pub kpis: Kpis,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_assignment_duration() {
        let start = Utc.with_ymd_and_hms(2025, 11, 3, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 11, 3, 8, 30, 0).unwrap();
        let a = Assignment::new("P1", "fill", "Fill-1", start, end);
        assert_eq!(a.duration_minutes(), 30);
    }

    #[test]
    fn test_response_wire_shape() {
        let start = Utc.with_ymd_and_hms(2025, 11, 3, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 11, 3, 8, 30, 0).unwrap();
        let mut utilization = BTreeMap::new();
        utilization.insert("Fill-1".to_string(), 6);

        let response = ScheduleResponse {
            assignments: vec![Assignment::new("P1", "fill", "Fill-1", start, end)],
            kpis: Kpis {
                tardiness_minutes: 0,
                changeovers: 0,
                makespan_minutes: 30,
                utilization,
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["assignments"][0]["product"], "P1");
        assert_eq!(json["assignments"][0]["op"], "fill");
        assert_eq!(json["assignments"][0]["start"], "2025-11-03T08:00:00Z");
        assert_eq!(json["kpis"]["tardiness_minutes"], 0);
        assert_eq!(json["kpis"]["makespan_minutes"], 30);
        assert_eq!(json["kpis"]["utilization"]["Fill-1"], 6);
    }
}
