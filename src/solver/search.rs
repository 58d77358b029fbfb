//! Deterministic branch-and-bound search over the constraint model.
//!
//! # Algorithm
//!
//! Depth-first dispatch search. Each node schedules one ready operation
//! (route order makes exactly one operation per product ready) onto one
//! eligible resource, appended after the resource's committed intervals
//! at the earliest start that fits entirely inside a calendar window.
//! This enumerates exactly the semi-active schedules; total tardiness is
//! a regular objective, so an optimal schedule is among them.
//!
//! Pruning:
//! - **Bound**: accrued tardiness of finished products plus, per
//!   unfinished product, `max(0, ready + remaining − due)`. A node whose
//!   bound reaches the incumbent objective cannot improve on it.
//! - **Dead node**: resource frontiers only advance, so a ready
//!   operation with no feasible placement now will never have one.
//! - **Canonical order**: dispatches must be non-decreasing in
//!   `(start, product index)`. Every semi-active schedule survives via
//!   its sorted dispatch sequence; permutation duplicates do not.
//!
//! Exploration order is fixed, so a given model and budget always yield
//! the same outcome and the same assignments. The first incumbent among
//! ties is kept.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3.4

use std::time::{Duration, Instant};

use tracing::debug;

use super::model::CpModel;
use crate::models::earliest_fit;

/// A scheduled operation in the minute domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Operation id (index into `CpModel::ops`).
    pub op: usize,
    /// Resource index.
    pub resource: usize,
    /// Start minute.
    pub start: i64,
    /// End minute (`start + duration`).
    pub end: i64,
}

/// Result of a solve, per the engine contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Search completed and proved the objective minimal.
    Optimal {
        assignments: Vec<Placement>,
        objective: i64,
    },
    /// The budget expired after at least one feasible solution was found.
    Feasible {
        assignments: Vec<Placement>,
        objective: i64,
    },
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The budget expired before any feasible solution was found.
    Unknown,
}

/// The search engine. Holds no state between solves; two concurrent
/// solves share nothing.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine;

impl SearchEngine {
    /// Creates a new engine.
    pub fn new() -> Self {
        Self
    }

    /// Solves the model within the wall-clock budget.
    pub fn solve(&self, model: &CpModel, time_limit: Duration) -> Outcome {
        let deadline = Instant::now() + time_limit;
        let products = model.product_ops.len();

        let mut search = Search {
            model,
            deadline,
            frontier: vec![0; model.windows.len()],
            next_op: vec![0; products],
            ready: vec![0; products],
            remaining: model
                .product_ops
                .iter()
                .map(|ops| ops.iter().map(|&id| model.ops[id].duration).sum())
                .collect(),
            accrued: 0,
            scheduled: 0,
            trail: Vec::with_capacity(model.ops.len()),
            incumbent: None,
            nodes: 0,
            timed_out: false,
        };

        search.dfs(i64::MIN, 0);
        debug!(
            nodes = search.nodes,
            timed_out = search.timed_out,
            "search finished"
        );

        match (search.incumbent, search.timed_out) {
            (Some((objective, assignments)), false) => Outcome::Optimal {
                assignments,
                objective,
            },
            (Some((objective, assignments)), true) => Outcome::Feasible {
                assignments,
                objective,
            },
            (None, false) => Outcome::Infeasible,
            (None, true) => Outcome::Unknown,
        }
    }
}

struct Search<'a> {
    model: &'a CpModel,
    deadline: Instant,
    /// Per resource: end of the last committed interval.
    frontier: Vec<i64>,
    /// Per product: next route position to dispatch.
    next_op: Vec<usize>,
    /// Per product: end of the last dispatched operation.
    ready: Vec<i64>,
    /// Per product: total duration of undispatched operations.
    remaining: Vec<i64>,
    /// Tardiness accrued by finished products.
    accrued: i64,
    scheduled: usize,
    trail: Vec<Placement>,
    incumbent: Option<(i64, Vec<Placement>)>,
    nodes: u64,
    timed_out: bool,
}

impl Search<'_> {
    fn dfs(&mut self, last_start: i64, last_product: usize) {
        if self.timed_out {
            return;
        }
        self.nodes += 1;
        if Instant::now() >= self.deadline {
            self.timed_out = true;
            return;
        }

        if self.scheduled == self.model.ops.len() {
            let objective = self.accrued;
            let improves = self
                .incumbent
                .as_ref()
                .map_or(true, |(best, _)| objective < *best);
            if improves {
                let mut assignments = self.trail.clone();
                assignments.sort_by_key(|p| p.op);
                self.incumbent = Some((objective, assignments));
            }
            return;
        }

        if let Some((best, _)) = &self.incumbent {
            if self.lower_bound() >= *best {
                return;
            }
        }

        // (start, product, resource) per candidate dispatch.
        let mut candidates: Vec<(i64, usize, usize)> = Vec::new();
        for product in 0..self.model.product_ops.len() {
            let position = self.next_op[product];
            if position >= self.model.product_ops[product].len() {
                continue;
            }
            let op = &self.model.ops[self.model.product_ops[product][position]];

            let mut placeable = false;
            for &resource in &op.eligible {
                let from = self.ready[product].max(self.frontier[resource]);
                let Some(start) = earliest_fit(&self.model.windows[resource], from, op.duration)
                else {
                    continue;
                };
                if start > op.lst {
                    // No room left for the route tail within the horizon.
                    continue;
                }
                placeable = true;
                if (start, product) >= (last_start, last_product) {
                    candidates.push((start, product, resource));
                }
            }
            if !placeable {
                // Frontiers only advance; this product can never finish.
                return;
            }
        }

        candidates.sort_unstable();

        for (start, product, resource) in candidates {
            let position = self.next_op[product];
            let op_id = self.model.product_ops[product][position];
            let duration = self.model.ops[op_id].duration;
            let end = start + duration;
            let finishes_product = position + 1 == self.model.product_ops[product].len();

            let saved_frontier = self.frontier[resource];
            let saved_ready = self.ready[product];
            self.frontier[resource] = end;
            self.ready[product] = end;
            self.remaining[product] -= duration;
            self.next_op[product] += 1;
            self.scheduled += 1;
            if finishes_product {
                self.accrued += (end - self.model.due[product]).max(0);
            }
            self.trail.push(Placement {
                op: op_id,
                resource,
                start,
                end,
            });

            self.dfs(start, product);

            self.trail.pop();
            if finishes_product {
                self.accrued -= (end - self.model.due[product]).max(0);
            }
            self.scheduled -= 1;
            self.next_op[product] -= 1;
            self.remaining[product] += duration;
            self.ready[product] = saved_ready;
            self.frontier[resource] = saved_frontier;

            if self.timed_out {
                return;
            }
        }
    }

    /// Tardiness lower bound for the current partial schedule.
    fn lower_bound(&self) -> i64 {
        let mut bound = self.accrued;
        for product in 0..self.model.product_ops.len() {
            if self.next_op[product] < self.model.product_ops[product].len() {
                let completion = self.ready[product] + self.remaining[product];
                bound += (completion - self.model.due[product]).max(0);
            }
        }
        bound
    }
}
