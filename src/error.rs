//! Error taxonomy.
//!
//! Failures are the only non-schedule output: the core never returns a
//! partial schedule. Build-time problems surface as `invalid_request`
//! before search; proved infeasibility and expired budgets come from the
//! search engine; a validator rejection of the engine's own output is a
//! fatal engine bug reported as `internal_validation_failed`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable short code in the canonical failure response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Structural or semantic problem in the request.
    InvalidRequest,
    /// The engine proved no assignment satisfies the constraints.
    Infeasible,
    /// The budget expired before any feasible solution was found.
    TimeoutUnknown,
    /// The engine produced an assignment the validator rejected.
    InternalValidationFailed,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::InvalidRequest => "invalid_request",
            Self::Infeasible => "infeasible",
            Self::TimeoutUnknown => "timeout_unknown",
            Self::InternalValidationFailed => "internal_validation_failed",
        };
        f.write_str(code)
    }
}

/// Canonical failure response: a short code plus human-readable reasons,
/// each tied to a specific entity id where possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{error}: {}", .why.join("; "))]
pub struct ScheduleError {
    /// Error category.
    pub error: ErrorCode,
    /// Human-readable reasons.
    pub why: Vec<String>,
}

impl ScheduleError {
    /// A structural or semantic request error.
    pub fn invalid_request(why: Vec<String>) -> Self {
        Self {
            error: ErrorCode::InvalidRequest,
            why,
        }
    }

    /// Proved infeasibility.
    pub fn infeasible(why: Vec<String>) -> Self {
        Self {
            error: ErrorCode::Infeasible,
            why,
        }
    }

    /// Budget expired with no feasible solution found.
    pub fn timeout_unknown(why: Vec<String>) -> Self {
        Self {
            error: ErrorCode::TimeoutUnknown,
            why,
        }
    }

    /// The engine violated its own contract.
    pub fn internal_validation_failed(why: Vec<String>) -> Self {
        Self {
            error: ErrorCode::InternalValidationFailed,
            why,
        }
    }
}

/// A defect detected while translating a request into a constraint model.
///
/// Build errors are collected exhaustively (not fail-fast) so a caller
/// can fix the whole request in one round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Horizon end {end} is not after start {start}")]
    HorizonOrder {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("{context}: instant {instant} is not minute-aligned")]
    MisalignedInstant {
        context: String,
        instant: DateTime<Utc>,
    },

    #[error("Duplicate resource id '{id}'")]
    DuplicateResource { id: String },

    #[error("Duplicate product id '{id}'")]
    DuplicateProduct { id: String },

    #[error("Resource {resource} declares no capabilities")]
    EmptyCapabilities { resource: String },

    #[error("Resource {resource} calendar window [{open} - {close}] ends at or before it opens")]
    WindowOrder {
        resource: String,
        open: DateTime<Utc>,
        close: DateTime<Utc>,
    },

    #[error("Resource {resource} calendar is not monotonic: window starting {open} overlaps or precedes the previous window")]
    CalendarNotMonotonic {
        resource: String,
        open: DateTime<Utc>,
    },

    #[error("Resource {resource} calendar window [{open} - {close}] lies outside the horizon")]
    WindowOutsideHorizon {
        resource: String,
        open: DateTime<Utc>,
        close: DateTime<Utc>,
    },

    #[error("Product {product} has an empty route")]
    EmptyRoute { product: String },

    #[error("Product {product} operation {op_index} ('{capability}') has non-positive duration {duration}")]
    NonPositiveDuration {
        product: String,
        op_index: usize,
        capability: String,
        duration: i64,
    },

    #[error("Product {product} requires capability '{capability}' not provided by any resource")]
    MissingCapability { product: String, capability: String },

    #[error("Product {product} due {due} lies outside the horizon")]
    DueOutsideHorizon {
        product: String,
        due: DateTime<Utc>,
    },

    #[error("Product {product} operation {op_index} ('{capability}') is only eligible on resource {resource}, which has no calendar windows")]
    SoleResourceWithoutCalendar {
        product: String,
        op_index: usize,
        capability: String,
        resource: String,
    },

    #[error("Changeover key '{key}' is not of the form 'fromFamily->toFamily'")]
    MalformedChangeoverKey { key: String },

    #[error("Changeover entry '{key}' has negative minutes {minutes}")]
    NegativeChangeover { key: String, minutes: i64 },

    #[error("Settings time_limit_seconds {seconds} is negative")]
    NegativeTimeLimit { seconds: i64 },
}

impl From<Vec<BuildError>> for ScheduleError {
    fn from(errors: Vec<BuildError>) -> Self {
        Self::invalid_request(errors.iter().map(ToString::to_string).collect())
    }
}
