//! Constraint model construction.
//!
//! Translates a canonical request into the minute-domain model the
//! search engine consumes: one variable bundle per route operation with
//! a fixed duration, tightened start bounds, and the eligible resource
//! set; per-product due offsets and precedence chains; per-resource
//! calendar windows.
//!
//! Structural and semantic request defects are detected here and
//! reported exhaustively as build errors — search never runs on a
//! malformed request. Infeasibility that needs search to prove (e.g. an
//! operation longer than every window of every eligible resource) is
//! deliberately *not* a build error.
//!
//! # Reference
//! Baptiste et al. (2001), "Constraint-Based Scheduling"

use std::collections::{HashMap, HashSet};

use crate::error::BuildError;
use crate::models::{ScheduleRequest, TimeWindow};
use crate::time::{is_minute_aligned, to_minutes};

/// Decision variable bundle for one route operation.
#[derive(Debug, Clone)]
pub struct OpVar {
    /// Index of the owning product in the request.
    pub product: usize,
    /// Position in the owning product's route.
    pub op_index: usize,
    /// Fixed processing time in minutes; `end = start + duration`.
    pub duration: i64,
    /// Indices of resources providing the required capability, ascending.
    pub eligible: Vec<usize>,
    /// Earliest start: sum of predecessor durations in the route.
    pub est: i64,
    /// Latest start leaving room for this operation and all successors
    /// before the horizon end (calendar gaps can only push it earlier).
    pub lst: i64,
}

/// Compiled minute-domain constraint model.
///
/// Owned exclusively by the search engine for the duration of a solve
/// and discarded afterwards. Semantics carried by the model: duration
/// linking, exactly-one resource per operation, capability eligibility
/// by construction, route precedence, per-resource no-overlap, and
/// whole-operation containment in a single calendar window.
#[derive(Debug, Clone)]
pub struct CpModel {
    /// Horizon length in minutes.
    pub horizon_minutes: i64,
    /// All operations, grouped by product and ordered by route position.
    pub ops: Vec<OpVar>,
    /// Per product: operation ids in route order.
    pub product_ops: Vec<Vec<usize>>,
    /// Per product: due offset in minutes from horizon start.
    pub due: Vec<i64>,
    /// Per resource: calendar windows in minutes, sorted and disjoint.
    pub windows: Vec<Vec<TimeWindow>>,
}

/// Builds a [`CpModel`] from a borrowed request.
pub struct ModelBuilder<'a> {
    request: &'a ScheduleRequest,
}

impl<'a> ModelBuilder<'a> {
    /// Creates a builder borrowing the request.
    pub fn new(request: &'a ScheduleRequest) -> Self {
        Self { request }
    }

    /// Builds the constraint model, collecting every defect found.
    pub fn build(&self) -> Result<CpModel, Vec<BuildError>> {
        let mut errors = Vec::new();

        // The horizon anchors every minute conversion; nothing else can
        // be checked meaningfully if it is broken.
        self.check_horizon(&mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }

        let reference = self.request.horizon.start;
        let horizon_minutes = to_minutes(self.request.horizon.end, reference);

        let windows = self.convert_calendars(horizon_minutes, &mut errors);
        let capability_map = self.check_resources(&mut errors);
        let (ops, product_ops, due) =
            self.build_ops(horizon_minutes, &capability_map, &windows, &mut errors);
        self.check_changeovers(&mut errors);

        if self.request.settings.time_limit_seconds < 0 {
            errors.push(BuildError::NegativeTimeLimit {
                seconds: self.request.settings.time_limit_seconds,
            });
        }

        if errors.is_empty() {
            Ok(CpModel {
                horizon_minutes,
                ops,
                product_ops,
                due,
                windows,
            })
        } else {
            Err(errors)
        }
    }

    fn check_horizon(&self, errors: &mut Vec<BuildError>) {
        let horizon = &self.request.horizon;
        for (context, instant) in [("Horizon start", horizon.start), ("Horizon end", horizon.end)] {
            if !is_minute_aligned(instant) {
                errors.push(BuildError::MisalignedInstant {
                    context: context.to_string(),
                    instant,
                });
            }
        }
        if horizon.end <= horizon.start {
            errors.push(BuildError::HorizonOrder {
                start: horizon.start,
                end: horizon.end,
            });
        }
    }

    /// Converts each resource calendar to minute windows, checking
    /// alignment, ordering, monotonicity, and horizon containment.
    fn convert_calendars(
        &self,
        horizon_minutes: i64,
        errors: &mut Vec<BuildError>,
    ) -> Vec<Vec<TimeWindow>> {
        let reference = self.request.horizon.start;
        let mut windows = Vec::with_capacity(self.request.resources.len());

        for resource in &self.request.resources {
            let mut converted = Vec::with_capacity(resource.calendar.len());
            let mut previous_close = i64::MIN;

            for &(open, close) in &resource.calendar {
                for instant in [open, close] {
                    if !is_minute_aligned(instant) {
                        errors.push(BuildError::MisalignedInstant {
                            context: format!("Resource {} calendar", resource.id),
                            instant,
                        });
                    }
                }
                if close <= open {
                    errors.push(BuildError::WindowOrder {
                        resource: resource.id.clone(),
                        open,
                        close,
                    });
                    continue;
                }

                let open_min = to_minutes(open, reference);
                let close_min = to_minutes(close, reference);
                if open_min < 0 || close_min > horizon_minutes {
                    errors.push(BuildError::WindowOutsideHorizon {
                        resource: resource.id.clone(),
                        open,
                        close,
                    });
                }
                if open_min < previous_close {
                    errors.push(BuildError::CalendarNotMonotonic {
                        resource: resource.id.clone(),
                        open,
                    });
                }
                previous_close = close_min;
                converted.push(TimeWindow::new(open_min, close_min));
            }
            windows.push(converted);
        }
        windows
    }

    /// Checks resource ids and capability sets, returning the
    /// capability → resource-indices map (indices ascending).
    fn check_resources(&self, errors: &mut Vec<BuildError>) -> HashMap<&'a str, Vec<usize>> {
        let mut seen = HashSet::new();
        let mut capability_map: HashMap<&str, Vec<usize>> = HashMap::new();

        for (idx, resource) in self.request.resources.iter().enumerate() {
            if !seen.insert(resource.id.as_str()) {
                errors.push(BuildError::DuplicateResource {
                    id: resource.id.clone(),
                });
            }
            if resource.capabilities.is_empty() {
                errors.push(BuildError::EmptyCapabilities {
                    resource: resource.id.clone(),
                });
            }
            for capability in &resource.capabilities {
                capability_map.entry(capability.as_str()).or_default().push(idx);
            }
        }
        capability_map
    }

    fn build_ops(
        &self,
        horizon_minutes: i64,
        capability_map: &HashMap<&str, Vec<usize>>,
        windows: &[Vec<TimeWindow>],
        errors: &mut Vec<BuildError>,
    ) -> (Vec<OpVar>, Vec<Vec<usize>>, Vec<i64>) {
        let reference = self.request.horizon.start;
        let mut ops = Vec::new();
        let mut product_ops = Vec::with_capacity(self.request.products.len());
        let mut due = Vec::with_capacity(self.request.products.len());
        let mut seen_products = HashSet::new();
        let mut missing_caps = HashSet::new();

        for (product_idx, product) in self.request.products.iter().enumerate() {
            if !seen_products.insert(product.id.as_str()) {
                errors.push(BuildError::DuplicateProduct {
                    id: product.id.clone(),
                });
            }
            if product.route.is_empty() {
                errors.push(BuildError::EmptyRoute {
                    product: product.id.clone(),
                });
            }
            if !is_minute_aligned(product.due) {
                errors.push(BuildError::MisalignedInstant {
                    context: format!("Product {} due", product.id),
                    instant: product.due,
                });
            }
            if !self.request.horizon.contains(product.due) {
                errors.push(BuildError::DueOutsideHorizon {
                    product: product.id.clone(),
                    due: product.due,
                });
            }
            due.push(to_minutes(product.due, reference));

            let total: i64 = product.total_duration_minutes();
            let mut prefix = 0i64;
            let mut op_ids = Vec::with_capacity(product.route.len());

            for (op_index, operation) in product.route.iter().enumerate() {
                if operation.duration_minutes <= 0 {
                    errors.push(BuildError::NonPositiveDuration {
                        product: product.id.clone(),
                        op_index,
                        capability: operation.capability.clone(),
                        duration: operation.duration_minutes,
                    });
                }

                let mut eligible = capability_map
                    .get(operation.capability.as_str())
                    .cloned()
                    .unwrap_or_default();
                // A resource repeating a capability must not yield
                // duplicate candidates.
                eligible.dedup();
                if eligible.is_empty() {
                    if missing_caps.insert((product_idx, operation.capability.clone())) {
                        errors.push(BuildError::MissingCapability {
                            product: product.id.clone(),
                            capability: operation.capability.clone(),
                        });
                    }
                } else if eligible.len() == 1 && windows[eligible[0]].is_empty() {
                    errors.push(BuildError::SoleResourceWithoutCalendar {
                        product: product.id.clone(),
                        op_index,
                        capability: operation.capability.clone(),
                        resource: self.request.resources[eligible[0]].id.clone(),
                    });
                }

                let suffix = total - prefix;
                op_ids.push(ops.len());
                ops.push(OpVar {
                    product: product_idx,
                    op_index,
                    duration: operation.duration_minutes,
                    eligible,
                    est: prefix,
                    lst: horizon_minutes - suffix,
                });
                prefix += operation.duration_minutes;
            }
            product_ops.push(op_ids);
        }
        (ops, product_ops, due)
    }

    fn check_changeovers(&self, errors: &mut Vec<BuildError>) {
        // Sorted for a deterministic `why` order.
        let mut entries: Vec<_> = self.request.changeover_matrix.values.iter().collect();
        entries.sort();

        for (key, &minutes) in entries {
            if !key.contains(crate::models::KEY_SEPARATOR) {
                errors.push(BuildError::MalformedChangeoverKey { key: key.clone() });
            }
            if minutes < 0 {
                errors.push(BuildError::NegativeChangeover {
                    key: key.clone(),
                    minutes,
                });
            }
        }
    }
}
