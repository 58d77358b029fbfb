//! Scheduling pipeline: model construction, search, validation, KPIs.
//!
//! [`solve_schedule`] is the single entry point. The stages run strictly
//! sequentially in the caller's thread; the search call is the only
//! long-running stage and is bounded by the request's time limit. The
//! pipeline holds no process-wide state — concurrent solves share
//! nothing — and persists nothing.
//!
//! Outcome mapping:
//!
//! | Stage result | Response |
//! |--------------|----------|
//! | Build errors | `invalid_request` |
//! | Search proved infeasible | `infeasible` (with per-entity hints) |
//! | Budget expired, no incumbent | `timeout_unknown` |
//! | Validator rejected the engine's output | `internal_validation_failed` |
//! | Validated schedule | assignments + KPIs |

mod model;
mod search;

pub use model::{CpModel, ModelBuilder, OpVar};
pub use search::{Outcome, Placement, SearchEngine};

use std::time::Duration;

use tracing::{debug, info};

use crate::error::ScheduleError;
use crate::kpi::{compute_kpis, planned_changeover_minutes};
use crate::models::{Assignment, ScheduleRequest, ScheduleResponse};
use crate::time::{to_instant, to_minutes};
use crate::validation::validate_schedule;

/// Solves a canonical schedule request end to end.
///
/// Builds the constraint model, searches under the configured budget,
/// independently re-validates the result, and computes KPIs. On any
/// failure the canonical error response is returned; a partial schedule
/// is never emitted.
pub fn solve_schedule(request: &ScheduleRequest) -> Result<ScheduleResponse, ScheduleError> {
    let model = ModelBuilder::new(request)
        .build()
        .map_err(ScheduleError::from)?;
    info!(
        operations = model.ops.len(),
        resources = model.windows.len(),
        horizon_minutes = model.horizon_minutes,
        "constraint model built"
    );

    let placements = if model.ops.is_empty() {
        Vec::new()
    } else {
        let budget = Duration::from_secs(request.settings.time_limit_seconds as u64);
        match SearchEngine::new().solve(&model, budget) {
            Outcome::Optimal {
                assignments,
                objective,
            } => {
                debug!(objective, proved_optimal = true, "search completed");
                assignments
            }
            Outcome::Feasible {
                assignments,
                objective,
            } => {
                debug!(objective, proved_optimal = false, "budget expired with incumbent");
                assignments
            }
            Outcome::Infeasible => {
                return Err(ScheduleError::infeasible(infeasibility_reasons(request)));
            }
            Outcome::Unknown => {
                return Err(ScheduleError::timeout_unknown(vec![format!(
                    "Search budget of {}s expired before any feasible solution was found",
                    request.settings.time_limit_seconds
                )]));
            }
        }
    };

    let assignments = to_assignments(request, &model, &placements);
    validate_schedule(request, &assignments).map_err(|errors| {
        ScheduleError::internal_validation_failed(
            errors.into_iter().map(|e| e.message).collect(),
        )
    })?;

    let kpis = compute_kpis(request, &assignments);
    info!(
        tardiness_minutes = kpis.tardiness_minutes,
        changeovers = kpis.changeovers,
        changeover_minutes = planned_changeover_minutes(request, &assignments),
        makespan_minutes = kpis.makespan_minutes,
        "schedule validated"
    );
    Ok(ScheduleResponse { assignments, kpis })
}

/// Converts minute-domain placements to wire assignments, in route order
/// per product (placements arrive sorted by operation id).
fn to_assignments(
    request: &ScheduleRequest,
    model: &CpModel,
    placements: &[Placement],
) -> Vec<Assignment> {
    let reference = request.horizon.start;
    placements
        .iter()
        .map(|p| {
            let op = &model.ops[p.op];
            let product = &request.products[op.product];
            Assignment::new(
                &product.id,
                &product.route[op.op_index].capability,
                &request.resources[p.resource].id,
                to_instant(p.start, reference),
                to_instant(p.end, reference),
            )
        })
        .collect()
}

/// Builds the `why` list for a proved-infeasible request, pointing at
/// the entities that make it unsatisfiable where that can be read off
/// the request directly.
fn infeasibility_reasons(request: &ScheduleRequest) -> Vec<String> {
    let reference = request.horizon.start;
    let mut reasons = vec!["No feasible schedule exists given the constraints".to_string()];

    for product in &request.products {
        let total = product.total_duration_minutes();
        let until_due = to_minutes(product.due, reference);
        if total > until_due {
            reasons.push(format!(
                "Product {}: minimum duration ({total}min) exceeds time until due date ({until_due}min)",
                product.id
            ));
        }

        for operation in &product.route {
            let fits_somewhere = request
                .resources
                .iter()
                .filter(|r| r.has_capability(&operation.capability))
                .flat_map(|r| r.calendar.iter())
                .any(|&(open, close)| (close - open).num_minutes() >= operation.duration_minutes);
            if !fits_somewhere {
                reasons.push(format!(
                    "Product {}: operation '{}' ({}min) exceeds every calendar window of its eligible resources",
                    product.id, operation.capability, operation.duration_minutes
                ));
            }
        }
    }
    reasons
}
