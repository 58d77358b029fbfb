//! End-to-end pipeline scenarios.
//!
//! Drives `solve_schedule` with complete canonical requests and checks
//! the invariants every successful response must satisfy, the boundary
//! behaviors, and determinism of the reported KPIs.

use chrono::{DateTime, TimeZone, Utc};
use harmony_scheduler::error::ErrorCode;
use harmony_scheduler::models::{
    ChangeoverMatrix, Horizon, Operation, Product, Resource, ScheduleRequest, ScheduleResponse,
    Settings,
};
use harmony_scheduler::solve_schedule;

fn hm(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 3, hour, minute, 0).unwrap()
}

fn day_horizon() -> Horizon {
    Horizon::new(hm(8, 0), hm(16, 0))
}

fn full_day(id: &str, capability: &str) -> Resource {
    Resource::new(id)
        .with_capability(capability)
        .with_window(hm(8, 0), hm(16, 0))
}

/// Checks every invariant a successful response must satisfy.
fn assert_schedule_invariants(request: &ScheduleRequest, response: &ScheduleResponse) {
    // One assignment per (product, route position); durations and
    // precedence checked against the route in start order.
    for product in &request.products {
        let mut ops: Vec<_> = response
            .assignments
            .iter()
            .filter(|a| a.product == product.id)
            .collect();
        ops.sort_by_key(|a| a.start);
        assert_eq!(ops.len(), product.route.len(), "product {}", product.id);

        for (assignment, operation) in ops.iter().zip(&product.route) {
            assert_eq!(assignment.op, operation.capability);
            assert_eq!(
                (assignment.end - assignment.start).num_minutes(),
                operation.duration_minutes
            );
        }
        for pair in ops.windows(2) {
            assert!(pair[0].end <= pair[1].start, "precedence in {}", product.id);
        }
    }

    for a in &response.assignments {
        let resource = request.resource(&a.resource).expect("known resource");
        // Capability and calendar containment.
        assert!(resource.has_capability(&a.op));
        assert!(resource
            .calendar
            .iter()
            .any(|&(open, close)| a.start >= open && a.end <= close));
        // Horizon bounds.
        assert!(a.start >= request.horizon.start && a.end <= request.horizon.end);
    }

    // Pairwise no-overlap per resource.
    for a in &response.assignments {
        for b in &response.assignments {
            if !std::ptr::eq(a, b) && a.resource == b.resource {
                assert!(
                    a.end <= b.start || b.end <= a.start,
                    "overlap on {}",
                    a.resource
                );
            }
        }
    }

    // Reported tardiness equals the recomputed sum.
    let mut tardiness = 0;
    for product in &request.products {
        if let Some(completion) = response
            .assignments
            .iter()
            .filter(|a| a.product == product.id)
            .map(|a| a.end)
            .max()
        {
            tardiness += (completion - product.due).num_minutes().max(0);
        }
    }
    assert_eq!(response.kpis.tardiness_minutes, tardiness);

    // Utilization bounded and consistent with busy/available minutes.
    for resource in &request.resources {
        let percent = response.kpis.utilization[&resource.id];
        assert!((0..=100).contains(&percent));

        let available: i64 = resource
            .calendar
            .iter()
            .map(|&(open, close)| (close - open).num_minutes())
            .sum();
        let busy: i64 = response
            .assignments
            .iter()
            .filter(|a| a.resource == resource.id)
            .map(|a| (a.end - a.start).num_minutes())
            .sum();
        assert!(busy <= available);
    }
}

#[test]
fn single_product_single_resource_fits() {
    let request = ScheduleRequest::new(
        day_horizon(),
        vec![full_day("Fill-1", "fill")],
        vec![Product::new("P1", "standard", hm(12, 0))
            .with_operation(Operation::new("fill", 30))],
    );

    let response = solve_schedule(&request).unwrap();
    assert_schedule_invariants(&request, &response);

    assert_eq!(response.assignments.len(), 1);
    let a = &response.assignments[0];
    assert_eq!(a.start, hm(8, 0));
    assert_eq!(a.end, hm(8, 30));
    assert_eq!(a.resource, "Fill-1");
    assert_eq!(a.op, "fill");

    assert_eq!(response.kpis.tardiness_minutes, 0);
    assert_eq!(response.kpis.changeovers, 0);
    assert_eq!(response.kpis.makespan_minutes, 30);
    assert_eq!(response.kpis.utilization["Fill-1"], 6);
}

#[test]
fn break_splits_calendar() {
    // Six 45-minute fills against [08:00,12:00) + [12:30,16:00): five
    // fit before the break, the sixth must wait until 12:30. No
    // operation may straddle [12:00, 12:30).
    let resource = Resource::new("Fill-1")
        .with_capability("fill")
        .with_window(hm(8, 0), hm(12, 0))
        .with_window(hm(12, 30), hm(16, 0));
    let products: Vec<Product> = (0..6)
        .map(|i| {
            Product::new(format!("P{i}"), "standard", hm(16, 0))
                .with_operation(Operation::new("fill", 45))
        })
        .collect();
    let request = ScheduleRequest::new(day_horizon(), vec![resource], products);

    let response = solve_schedule(&request).unwrap();
    assert_schedule_invariants(&request, &response);

    assert_eq!(response.assignments.len(), 6);
    for a in &response.assignments {
        let before_break = a.start >= hm(8, 0) && a.end <= hm(12, 0);
        let after_break = a.start >= hm(12, 30) && a.end <= hm(16, 0);
        assert!(before_break || after_break, "straddles the break");
    }
    assert!(response.assignments.iter().any(|a| a.start >= hm(12, 30)));
}

#[test]
fn precedence_chain() {
    let request = ScheduleRequest::new(
        day_horizon(),
        vec![
            full_day("Fill-1", "fill"),
            full_day("Label-1", "label"),
            full_day("Pack-1", "pack"),
        ],
        vec![Product::new("P1", "standard", hm(10, 0))
            .with_operation(Operation::new("fill", 30))
            .with_operation(Operation::new("label", 20))
            .with_operation(Operation::new("pack", 15))],
    );

    let response = solve_schedule(&request).unwrap();
    assert_schedule_invariants(&request, &response);

    let mut ops = response.assignments.clone();
    ops.sort_by_key(|a| a.start);
    assert_eq!(ops[0].op, "fill");
    assert_eq!(ops[1].op, "label");
    assert_eq!(ops[2].op, "pack");
    assert!(ops[0].end <= ops[1].start);
    assert!(ops[1].end <= ops[2].start);

    // 65 minutes of chained work against a 10:00 due: finishes 09:05.
    assert_eq!(response.kpis.tardiness_minutes, 0);
    assert_eq!(response.kpis.makespan_minutes, 65);
}

#[test]
fn two_products_same_family_shared_resource() {
    let request = ScheduleRequest::new(
        day_horizon(),
        vec![full_day("Fill-1", "fill")],
        vec![
            Product::new("P1", "standard", hm(12, 0))
                .with_operation(Operation::new("fill", 30)),
            Product::new("P2", "standard", hm(12, 0))
                .with_operation(Operation::new("fill", 30)),
        ],
    );

    let response = solve_schedule(&request).unwrap();
    assert_schedule_invariants(&request, &response);

    assert_eq!(response.assignments.len(), 2);
    assert_eq!(response.kpis.changeovers, 0);
    assert_eq!(response.kpis.tardiness_minutes, 0);
}

#[test]
fn changeover_across_families() {
    let request = ScheduleRequest::new(
        day_horizon(),
        vec![full_day("Fill-1", "fill")],
        vec![
            Product::new("P1", "standard", hm(12, 0))
                .with_operation(Operation::new("fill", 30)),
            Product::new("P2", "premium", hm(12, 0))
                .with_operation(Operation::new("fill", 30)),
        ],
    )
    .with_changeover_matrix(ChangeoverMatrix::new().with_transition("standard", "premium", 20));

    let response = solve_schedule(&request).unwrap();
    assert_schedule_invariants(&request, &response);

    assert_eq!(response.assignments.len(), 2);
    assert_eq!(response.kpis.changeovers, 1);
}

#[test]
fn infeasible_capability_is_invalid_request() {
    let request = ScheduleRequest::new(
        day_horizon(),
        vec![full_day("Fill-1", "fill")],
        vec![Product::new("P-101", "standard", hm(12, 0))
            .with_operation(Operation::new("seal", 30))],
    );

    let error = solve_schedule(&request).unwrap_err();
    assert_eq!(error.error, ErrorCode::InvalidRequest);
    assert!(error
        .why
        .iter()
        .any(|w| w.contains("P-101") && w.contains("seal")));
}

#[test]
fn empty_product_list() {
    let request = ScheduleRequest::new(
        day_horizon(),
        vec![full_day("Fill-1", "fill"), full_day("Label-1", "label")],
        vec![],
    );

    let response = solve_schedule(&request).unwrap();
    assert!(response.assignments.is_empty());
    assert_eq!(response.kpis.tardiness_minutes, 0);
    assert_eq!(response.kpis.changeovers, 0);
    assert_eq!(response.kpis.makespan_minutes, 0);
    assert_eq!(response.kpis.utilization["Fill-1"], 0);
    assert_eq!(response.kpis.utilization["Label-1"], 0);
}

#[test]
fn oversized_operation_is_infeasible() {
    let request = ScheduleRequest::new(
        day_horizon(),
        vec![Resource::new("Fill-1")
            .with_capability("fill")
            .with_window(hm(8, 0), hm(12, 0))
            .with_window(hm(12, 30), hm(16, 0))],
        vec![Product::new("P1", "standard", hm(16, 0))
            .with_operation(Operation::new("fill", 300))],
    );

    let error = solve_schedule(&request).unwrap_err();
    assert_eq!(error.error, ErrorCode::Infeasible);
    assert!(!error.why.is_empty());
}

#[test]
fn zero_time_limit_never_schedules() {
    let request = ScheduleRequest::new(
        day_horizon(),
        vec![full_day("Fill-1", "fill")],
        vec![Product::new("P1", "standard", hm(12, 0))
            .with_operation(Operation::new("fill", 30))],
    )
    .with_settings(Settings {
        time_limit_seconds: 0,
    });

    let error = solve_schedule(&request).unwrap_err();
    assert!(matches!(
        error.error,
        ErrorCode::TimeoutUnknown | ErrorCode::Infeasible
    ));
}

#[test]
fn repeated_solves_report_identical_kpis() {
    let request = ScheduleRequest::new(
        day_horizon(),
        vec![full_day("Fill-1", "fill"), full_day("Fill-2", "fill")],
        vec![
            Product::new("P1", "standard", hm(9, 0))
                .with_operation(Operation::new("fill", 45)),
            Product::new("P2", "premium", hm(9, 30))
                .with_operation(Operation::new("fill", 45)),
            Product::new("P3", "standard", hm(10, 0))
                .with_operation(Operation::new("fill", 60)),
        ],
    )
    .with_changeover_matrix(ChangeoverMatrix::new().with_transition("standard", "premium", 20));

    let first = solve_schedule(&request).unwrap();
    let second = solve_schedule(&request).unwrap();

    assert_eq!(first.kpis.tardiness_minutes, second.kpis.tardiness_minutes);
    assert_eq!(first.kpis.changeovers, second.kpis.changeovers);
    assert_eq!(first.kpis.makespan_minutes, second.kpis.makespan_minutes);
    assert_eq!(first.assignments, second.assignments);
}

#[test]
fn mixed_routes_compete_for_resources() {
    // Two products sharing fill and label stations with staggered dues.
    let request = ScheduleRequest::new(
        day_horizon(),
        vec![full_day("Fill-1", "fill"), full_day("Label-1", "label")],
        vec![
            Product::new("P1", "standard", hm(9, 30))
                .with_operation(Operation::new("fill", 30))
                .with_operation(Operation::new("label", 20)),
            Product::new("P2", "premium", hm(10, 0))
                .with_operation(Operation::new("fill", 45))
                .with_operation(Operation::new("label", 25)),
        ],
    );

    let response = solve_schedule(&request).unwrap();
    assert_schedule_invariants(&request, &response);
    assert_eq!(response.assignments.len(), 4);
    // Both products can be on time: P1 fill first.
    assert_eq!(response.kpis.tardiness_minutes, 0);
}

#[test]
fn canonical_json_round_trip() {
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
        "changeover_matrix_minutes": { "values": {} },
        "settings": { "time_limit_seconds": 10 }
    }"#;

    let request: ScheduleRequest = serde_json::from_str(json).unwrap();
    let response = solve_schedule(&request).unwrap();

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["assignments"][0]["product"], "P1");
    assert_eq!(value["assignments"][0]["op"], "fill");
    assert_eq!(value["assignments"][0]["resource"], "Fill-1");
    assert_eq!(value["assignments"][0]["start"], "2025-11-03T08:00:00Z");
    assert_eq!(value["assignments"][0]["end"], "2025-11-03T08:30:00Z");
    assert_eq!(value["kpis"]["tardiness_minutes"], 0);
    assert_eq!(value["kpis"]["changeovers"], 0);
    assert_eq!(value["kpis"]["makespan_minutes"], 30);
    assert_eq!(value["kpis"]["utilization"]["Fill-1"], 6);
}

#[test]
fn failure_wire_shape() {
    let request = ScheduleRequest::new(
        day_horizon(),
        vec![full_day("Fill-1", "fill")],
        vec![Product::new("P-101", "standard", hm(12, 0))
            .with_operation(Operation::new("seal", 30))],
    );

    let error = solve_schedule(&request).unwrap_err();
    let value = serde_json::to_value(&error).unwrap();
    assert_eq!(value["error"], "invalid_request");
    assert!(value["why"].as_array().unwrap()[0]
        .as_str()
        .unwrap()
        .contains("P-101"));
}
