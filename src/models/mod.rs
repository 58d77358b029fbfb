//! Scheduling domain models.
//!
//! Canonical request and response types plus the minute-domain calendar
//! windows shared by the solver and validator. All entities are
//! immutable after a request is accepted; the pipeline produces new
//! values rather than mutating inputs.
//!
//! | Type | Role |
//! |------|------|
//! | `ScheduleRequest` | Canonical input: horizon, resources, products, changeovers, settings |
//! | `Resource` | Capability-gated machine with a working calendar |
//! | `Product` | Job with a family, a due instant, and an ordered route |
//! | `Operation` | One route step: required capability + duration |
//! | `ChangeoverMatrix` | Family-pair changeover minutes (KPI accounting) |
//! | `TimeWindow` | Half-open [open, close) window in minutes |
//! | `ScheduleResponse` | Canonical output: assignments + KPIs |

mod calendar;
mod changeover;
mod product;
mod request;
mod resource;
mod schedule;

pub use calendar::{earliest_fit, total_minutes, TimeWindow};
pub use changeover::{ChangeoverMatrix, KEY_SEPARATOR};
pub use product::{Operation, Product};
pub use request::{Horizon, ScheduleRequest, Settings};
pub use resource::Resource;
pub use schedule::{Assignment, Kpis, ScheduleResponse};
