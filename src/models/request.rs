//! Canonical schedule request.
//!
//! The core accepts exactly one request shape; client-format adapters
//! live outside the crate and are responsible for producing it. The
//! request is immutable once accepted — the pipeline borrows it read-only
//! and produces new values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ChangeoverMatrix, Product, Resource};

/// Default search budget in seconds.
const DEFAULT_TIME_LIMIT_SECONDS: i64 = 30;

/// The global scheduling window. All times in a request lie inside it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Horizon {
    /// Horizon start (UTC). The reference instant for minute offsets.
    pub start: DateTime<Utc>,
    /// Horizon end (UTC), strictly after start.
    pub end: DateTime<Utc>,
}

impl Horizon {
    /// Creates a horizon.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whether an instant lies within [start, end].
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Solver settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Wall-clock search budget in seconds. Zero means no budget:
    /// the search reports `timeout_unknown` (or proves infeasibility)
    /// without producing a schedule.
    #[serde(default = "default_time_limit")]
    pub time_limit_seconds: i64,
}

fn default_time_limit() -> i64 {
    DEFAULT_TIME_LIMIT_SECONDS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_limit_seconds: DEFAULT_TIME_LIMIT_SECONDS,
        }
    }
}

/// A complete scheduling problem in canonical form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Global scheduling window.
    pub horizon: Horizon,
    /// Available resources.
    pub resources: Vec<Resource>,
    /// Products to schedule.
    pub products: Vec<Product>,
    /// Family changeover minutes (KPI accounting only).
    #[serde(rename = "changeover_matrix_minutes", default)]
    pub changeover_matrix: ChangeoverMatrix,
    /// Solver settings; defaults applied when omitted.
    #[serde(default)]
    pub settings: Settings,
}

impl ScheduleRequest {
    /// Creates a request with an empty changeover matrix and default settings.
    pub fn new(horizon: Horizon, resources: Vec<Resource>, products: Vec<Product>) -> Self {
        Self {
            horizon,
            resources,
            products,
            changeover_matrix: ChangeoverMatrix::new(),
            settings: Settings::default(),
        }
    }

    /// Sets the changeover matrix.
    pub fn with_changeover_matrix(mut self, matrix: ChangeoverMatrix) -> Self {
        self.changeover_matrix = matrix;
        self
    }

    /// Sets the solver settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Looks up a product by id.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks up a resource by id.
    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_horizon_contains() {
        let start = Utc.with_ymd_and_hms(2025, 11, 3, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 11, 3, 16, 0, 0).unwrap();
        let h = Horizon::new(start, end);

        assert!(h.contains(start));
        assert!(h.contains(end)); // inclusive upper bound
        assert!(h.contains(Utc.with_ymd_and_hms(2025, 11, 3, 12, 0, 0).unwrap()));
        assert!(!h.contains(Utc.with_ymd_and_hms(2025, 11, 3, 16, 1, 0).unwrap()));
    }

    #[test]
    fn test_settings_default() {
        assert_eq!(Settings::default().time_limit_seconds, 30);
    }

    #[test]
    fn test_request_defaults_from_json() {
        // Omitted settings and changeover matrix take their defaults.
        let json = r#"{
            "horizon": { "start": "2025-11-03T08:00:00Z", "end": "2025-11-03T16:00:00Z" },
            "resources": [],
            "products": []
        }"#;
        let request: ScheduleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.settings.time_limit_seconds, 30);
        assert_eq!(request.changeover_matrix.minutes("a", "b"), 0);
    }

    #[test]
    fn test_empty_settings_object_defaults_time_limit() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.time_limit_seconds, 30);
    }

    #[test]
    fn test_request_canonical_json() {
        let json = r#"{
            "horizon": { "start": "2025-11-03T08:00:00Z", "end": "2025-11-03T16:00:00Z" },
            "resources": [
                { "id": "Fill-1", "capabilities": ["fill"],
                  "calendar": [["2025-11-03T08:00:00Z", "2025-11-03T16:00:00Z"]] }
            ],
            "products": [
                { "id": "P1", "family": "standard", "due": "2025-11-03T12:00:00Z",
                  "route": [{ "capability": "fill", "duration_minutes": 30 }] }
            ],
            "changeover_matrix_minutes": { "values": { "standard->premium": 20 } },
            "settings": { "time_limit_seconds": 10 }
        }"#;
        let request: ScheduleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.resources[0].id, "Fill-1");
        assert_eq!(request.products[0].route[0].duration_minutes, 30);
        assert_eq!(request.changeover_matrix.minutes("standard", "premium"), 20);
        assert_eq!(request.settings.time_limit_seconds, 10);
    }
}
