//! Deterministic production scheduling core.
//!
//! Given a time horizon, capability-gated resources with working
//! calendars, and products whose routes are ordered operations, the
//! crate assigns every operation to an eligible resource and a time
//! interval such that all hard constraints hold and total tardiness is
//! minimized.
//!
//! # Modules
//!
//! - **`models`**: Canonical request/response types — `ScheduleRequest`,
//!   `Resource`, `Product`, `Operation`, `ChangeoverMatrix`,
//!   `ScheduleResponse`
//! - **`time`**: Minute quantization relative to the horizon start
//! - **`solver`**: Model construction and the branch-and-bound search;
//!   [`solve_schedule`] runs the whole pipeline
//! - **`validation`**: Independent re-verification of returned schedules
//! - **`kpi`**: Tardiness, changeover, makespan, and utilization metrics
//! - **`error`**: The canonical failure taxonomy
//!
//! # Architecture
//!
//! Four stages in a strict pipeline: quantize, build, search, validate.
//! Everything outside this crate (HTTP endpoints, client-format
//! adapters, persistence) is an external collaborator that feeds the
//! core one canonical request shape and consumes one canonical response.
//!
//! ```no_run
//! use harmony_scheduler::{solve_schedule, ScheduleRequest};
//!
//! let request: ScheduleRequest = serde_json::from_str("...").unwrap();
//! match solve_schedule(&request) {
//!     Ok(response) => println!("{} assignments", response.assignments.len()),
//!     Err(error) => eprintln!("{}: {:?}", error.error, error.why),
//! }
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Baptiste et al. (2001), "Constraint-Based Scheduling"

pub mod error;
pub mod kpi;
pub mod models;
pub mod solver;
pub mod time;
pub mod validation;

pub use error::{ErrorCode, ScheduleError};
pub use models::{ScheduleRequest, ScheduleResponse};
pub use solver::solve_schedule;
