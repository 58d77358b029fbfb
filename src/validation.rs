//! Independent schedule validation.
//!
//! Re-checks every hard constraint on a returned schedule using only the
//! original request and the assignment list — never the engine's
//! internal state. A failure here means the engine violated its
//! contract; the pipeline turns it into a fatal
//! `internal_validation_failed` response instead of a schedule.
//!
//! Checks:
//! - Exactly one assignment per (product, route position)
//! - Durations match the route
//! - Route precedence within each product
//! - No two assignments overlap on the same resource
//! - Each assignment lies inside one calendar window of its resource
//! - The assigned resource provides the required capability
//! - All times lie within the horizon

use std::collections::HashMap;

use crate::models::{Assignment, ScheduleRequest};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A detected contract violation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Violation category.
    pub kind: ValidationErrorKind,
    /// Human-readable description naming the entities involved.
    pub message: String,
}

/// Categories of contract violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// An assignment references a product not in the request.
    UnknownProduct,
    /// An assignment references a resource not in the request.
    UnknownResource,
    /// A product's assignment count differs from its route length.
    AssignmentCountMismatch,
    /// An assignment's operation does not match its route position.
    OperationMismatch,
    /// An assignment's length differs from the route duration.
    DurationMismatch,
    /// An operation starts before its route predecessor ends.
    PrecedenceViolation,
    /// Two assignments intersect on the same resource.
    Overlap,
    /// An assignment does not fit inside any calendar window.
    CalendarViolation,
    /// The assigned resource lacks the required capability.
    CapabilityMismatch,
    /// An assignment lies outside the horizon.
    HorizonViolation,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Runs all checks on a schedule.
///
/// Returns `Ok(())` when every hard constraint holds, `Err(errors)`
/// with all detected violations otherwise.
pub fn validate_schedule(request: &ScheduleRequest, assignments: &[Assignment]) -> ValidationResult {
    let mut errors = Vec::new();

    check_routes(request, assignments, &mut errors);
    check_no_overlap(assignments, &mut errors);
    check_calendar_compliance(request, assignments, &mut errors);
    check_capabilities(request, assignments, &mut errors);
    check_horizon_bounds(request, assignments, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Completeness, duration, and precedence per product.
///
/// Assignments of a product are matched to route positions by start
/// order, which also handles routes that repeat a capability.
fn check_routes(
    request: &ScheduleRequest,
    assignments: &[Assignment],
    errors: &mut Vec<ValidationError>,
) {
    let mut by_product: HashMap<&str, Vec<&Assignment>> = HashMap::new();
    for a in assignments {
        by_product.entry(a.product.as_str()).or_default().push(a);
    }

    for (product_id, _) in by_product.iter() {
        if request.product(product_id).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownProduct,
                format!("Assignment references unknown product '{product_id}'"),
            ));
        }
    }

    for product in &request.products {
        let mut ops = by_product.remove(product.id.as_str()).unwrap_or_default();
        if ops.len() != product.route.len() {
            errors.push(ValidationError::new(
                ValidationErrorKind::AssignmentCountMismatch,
                format!(
                    "Product {} has {} assignments for {} route operations",
                    product.id,
                    ops.len(),
                    product.route.len()
                ),
            ));
            continue;
        }
        ops.sort_by_key(|a| a.start);

        for (position, (assignment, operation)) in ops.iter().zip(&product.route).enumerate() {
            if assignment.op != operation.capability {
                errors.push(ValidationError::new(
                    ValidationErrorKind::OperationMismatch,
                    format!(
                        "Product {} operation {} is '{}' but the assignment realizes '{}'",
                        product.id, position, operation.capability, assignment.op
                    ),
                ));
            }
            if assignment.duration_minutes() != operation.duration_minutes {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DurationMismatch,
                    format!(
                        "Product {}/{} lasts {} minutes, route requires {}",
                        product.id,
                        assignment.op,
                        assignment.duration_minutes(),
                        operation.duration_minutes
                    ),
                ));
            }
        }

        for pair in ops.windows(2) {
            if pair[0].end > pair[1].start {
                errors.push(ValidationError::new(
                    ValidationErrorKind::PrecedenceViolation,
                    format!(
                        "Precedence violation in {}: {} ends at {} but {} starts at {}",
                        product.id, pair[0].op, pair[0].end, pair[1].op, pair[1].start
                    ),
                ));
            }
        }
    }
}

/// No two assignments on the same resource may intersect.
fn check_no_overlap(assignments: &[Assignment], errors: &mut Vec<ValidationError>) {
    let mut by_resource: HashMap<&str, Vec<&Assignment>> = HashMap::new();
    for a in assignments {
        by_resource.entry(a.resource.as_str()).or_default().push(a);
    }

    let mut resources: Vec<_> = by_resource.into_iter().collect();
    resources.sort_by_key(|(id, _)| *id);

    for (resource_id, ops) in resources {
        for i in 0..ops.len() {
            for j in (i + 1)..ops.len() {
                let (a, b) = (ops[i], ops[j]);
                // Half-open intervals: touching endpoints do not overlap.
                if a.start < b.end && b.start < a.end {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::Overlap,
                        format!(
                            "Overlap on {resource_id}: {}/{} [{} - {}] intersects {}/{} [{} - {}]",
                            a.product, a.op, a.start, a.end, b.product, b.op, b.start, b.end
                        ),
                    ));
                }
            }
        }
    }
}

/// Each assignment must fit entirely inside one window of its resource.
fn check_calendar_compliance(
    request: &ScheduleRequest,
    assignments: &[Assignment],
    errors: &mut Vec<ValidationError>,
) {
    for a in assignments {
        let Some(resource) = request.resource(&a.resource) else {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownResource,
                format!("Assignment references unknown resource '{}'", a.resource),
            ));
            continue;
        };

        let fits = resource
            .calendar
            .iter()
            .any(|&(open, close)| a.start >= open && a.end <= close);
        if !fits {
            errors.push(ValidationError::new(
                ValidationErrorKind::CalendarViolation,
                format!(
                    "Calendar violation: {}/{} on {} [{} - {}] not within working windows",
                    a.product, a.op, a.resource, a.start, a.end
                ),
            ));
        }
    }
}

/// The assigned resource must provide the operation's capability.
fn check_capabilities(
    request: &ScheduleRequest,
    assignments: &[Assignment],
    errors: &mut Vec<ValidationError>,
) {
    for a in assignments {
        if let Some(resource) = request.resource(&a.resource) {
            if !resource.has_capability(&a.op) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::CapabilityMismatch,
                    format!(
                        "Resource {} lacks capability '{}' required by {}",
                        a.resource, a.op, a.product
                    ),
                ));
            }
        }
    }
}

/// All assignment times must lie within the horizon.
fn check_horizon_bounds(
    request: &ScheduleRequest,
    assignments: &[Assignment],
    errors: &mut Vec<ValidationError>,
) {
    for a in assignments {
        if a.start < request.horizon.start || a.end > request.horizon.end {
            errors.push(ValidationError::new(
                ValidationErrorKind::HorizonViolation,
                format!(
                    "Horizon violation: {}/{} [{} - {}] outside [{} - {}]",
                    a.product, a.op, a.start, a.end, request.horizon.start, request.horizon.end
                ),
            ));
        }
    }
}
