//! Schedule quality metrics.
//!
//! Computes the reported KPI block from the original request and the
//! validated assignment list:
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Tardiness | `Σ_p max(0, completion(p) − due(p))` in minutes |
//! | Changeovers | Adjacent same-resource pairs with differing families |
//! | Makespan | Latest end − earliest start, 0 when empty |
//! | Utilization | `round(busy / available × 100)` per resource |
//!
//! Planned changeover time from the matrix is computed separately; it
//! is informational only and is neither subtracted from busy time nor
//! enforced as a separation constraint.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::{BTreeMap, HashMap};

use crate::models::{Assignment, Kpis, ScheduleRequest};

/// Computes all KPIs for a validated schedule.
pub fn compute_kpis(request: &ScheduleRequest, assignments: &[Assignment]) -> Kpis {
    Kpis {
        tardiness_minutes: tardiness_minutes(request, assignments),
        changeovers: count_changeovers(request, assignments),
        makespan_minutes: makespan_minutes(assignments),
        utilization: utilization(request, assignments),
    }
}

/// Total tardiness across all products, in minutes.
pub fn tardiness_minutes(request: &ScheduleRequest, assignments: &[Assignment]) -> i64 {
    let mut total = 0;
    for product in &request.products {
        let completion = assignments
            .iter()
            .filter(|a| a.product == product.id)
            .map(|a| a.end)
            .max();
        if let Some(completion) = completion {
            if completion > product.due {
                total += (completion - product.due).num_minutes();
            }
        }
    }
    total
}

/// Number of family changeovers: adjacent operation pairs on the same
/// resource (ordered by start) whose product families differ.
pub fn count_changeovers(request: &ScheduleRequest, assignments: &[Assignment]) -> i64 {
    let families: HashMap<&str, &str> = request
        .products
        .iter()
        .map(|p| (p.id.as_str(), p.family.as_str()))
        .collect();

    let mut count = 0;
    for resource in &request.resources {
        for (from, to) in adjacent_pairs(resource.id.as_str(), assignments) {
            let from_family = families.get(from.product.as_str());
            let to_family = families.get(to.product.as_str());
            if let (Some(f), Some(t)) = (from_family, to_family) {
                if f != t {
                    count += 1;
                }
            }
        }
    }
    count
}

/// Planned changeover minutes from the matrix across all family
/// changeovers. Informational: reported via logging, not on the wire.
pub fn planned_changeover_minutes(request: &ScheduleRequest, assignments: &[Assignment]) -> i64 {
    let families: HashMap<&str, &str> = request
        .products
        .iter()
        .map(|p| (p.id.as_str(), p.family.as_str()))
        .collect();

    let mut minutes = 0;
    for resource in &request.resources {
        for (from, to) in adjacent_pairs(resource.id.as_str(), assignments) {
            if let (Some(f), Some(t)) = (
                families.get(from.product.as_str()),
                families.get(to.product.as_str()),
            ) {
                if f != t {
                    minutes += request.changeover_matrix.minutes(f, t);
                }
            }
        }
    }
    minutes
}

/// Duration from the earliest start to the latest end, in minutes.
pub fn makespan_minutes(assignments: &[Assignment]) -> i64 {
    let earliest = assignments.iter().map(|a| a.start).min();
    let latest = assignments.iter().map(|a| a.end).max();
    match (earliest, latest) {
        (Some(start), Some(end)) => (end - start).num_minutes(),
        _ => 0,
    }
}

/// Busy / available percentage per resource, rounded to nearest integer.
///
/// Every resource in the request is reported; a resource with no
/// availability (or no assignments) reports 0.
pub fn utilization(request: &ScheduleRequest, assignments: &[Assignment]) -> BTreeMap<String, i64> {
    let mut result = BTreeMap::new();

    for resource in &request.resources {
        let available: i64 = resource
            .calendar
            .iter()
            .map(|&(open, close)| (close - open).num_minutes())
            .sum();
        let busy: i64 = assignments
            .iter()
            .filter(|a| a.resource == resource.id)
            .map(Assignment::duration_minutes)
            .sum();

        let percent = if available > 0 {
            ((busy as f64 / available as f64) * 100.0).round() as i64
        } else {
            0
        };
        result.insert(resource.id.clone(), percent);
    }
    result
}

/// Adjacent assignment pairs on one resource, ordered by start time.
fn adjacent_pairs<'a>(
    resource_id: &str,
    assignments: &'a [Assignment],
) -> Vec<(&'a Assignment, &'a Assignment)> {
    let mut on_resource: Vec<&Assignment> = assignments
        .iter()
        .filter(|a| a.resource == resource_id)
        .collect();
    on_resource.sort_by_key(|a| a.start);
    on_resource
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}
