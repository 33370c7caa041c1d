// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job-terminal error taxonomy shared by every crate in the workspace.
//!
//! [`ErrorKind`] is the tag recorded on a [`crate::job::JobRecord`] once a job
//! reaches `FAILED`. It deliberately carries no payload of its own — the
//! human-readable detail lives alongside it in `JobRecord::error_detail` — so
//! that it stays cheap to compare, log, and serialize on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Job-terminal error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Media could not be decoded or sampled.
    SamplingError,
    /// An inspector declared `fatalOnFailure` failed.
    InspectorFatal,
    /// Fusion produced an invalid output (internal bug).
    FusionError,
    /// Temp I/O failure.
    WorkspaceError,
    /// External cancel or per-job timeout.
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::SamplingError => "SamplingError",
            ErrorKind::InspectorFatal => "InspectorFatal",
            ErrorKind::FusionError => "FusionError",
            ErrorKind::WorkspaceError => "WorkspaceError",
            ErrorKind::Cancelled => "Cancelled",
        };
        write!(f, "{s}")
    }
}

/// Errors surfaced synchronously to a caller of the submission or observation
/// primitives. Never recorded on a [`crate::job::JobRecord`] — these happen
/// before or outside a job's lifecycle.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RequestError {
    #[error("submission rejected: {0}")]
    Rejected(#[from] RejectedReason),
    #[error("job not found: {0}")]
    NotFound(String),
    #[error("job not ready: status is {0}")]
    NotReady(crate::job::JobStatus),
    #[error("job failed: {kind} ({detail})")]
    Failed { kind: ErrorKind, detail: String },
}

/// Why a submission was rejected.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RejectedReason {
    #[error("upload of {actual} bytes exceeds limit of {limit} bytes")]
    TooLarge { actual: u64, limit: u64 },
    #[error("unsupported media type: {0}")]
    UnsupportedMimeType(String),
    #[error("admission queue is full ({capacity} pending)")]
    QueueFull { capacity: usize },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
