// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier, status, and the job record data model.

use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id! {
    /// Opaque, globally unique, printable identifier assigned at submission.
    #[derive(Default)]
    pub struct JobId;
}

/// Lifecycle status of a job. Monotonic: once terminal, never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// `COMPLETED` and `FAILED` are terminal; status never changes after.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Processing => "PROCESSING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
        };
        write!(f, "{s}")
    }
}

/// The finer-grained phase the orchestrator is in while `status ==
/// PROCESSING`. Not part of the wire-stable `statusOf` payload (only
/// PENDING/PROCESSING/COMPLETED/FAILED are promised there) but useful for
/// diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    Pending,
    Sampling,
    Inspecting,
    Fusing,
    Completed,
    Failed,
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobPhase::Pending => "PENDING",
            JobPhase::Sampling => "SAMPLING",
            JobPhase::Inspecting => "INSPECTING",
            JobPhase::Fusing => "FUSING",
            JobPhase::Completed => "COMPLETED",
            JobPhase::Failed => "FAILED",
        };
        write!(f, "{s}")
    }
}

/// A durable (process-lifetime) record of one job's lifecycle.
///
/// Invariants enforced by construction/mutation helpers, never by the caller
/// poking fields directly:
/// - `started_at_ms` is `Some` iff `phase` has advanced past `Pending` at
///   least once.
/// - `completed_at_ms` is `Some` iff `status` is terminal.
/// - `result_ref` is `Some` iff `status == Completed`.
/// - `error_kind` is `Some` iff `status == Failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub status: JobStatus,
    pub phase: JobPhase,
    pub created_at_ms: u64,
    pub started_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,
    /// In `[0, 1]`.
    pub progress: f64,
    /// Present iff `status == Completed`.
    pub result_ref: Option<JobId>,
    pub error_kind: Option<ErrorKind>,
    pub error_detail: Option<String>,
    /// Inspectors that have returned an outcome so far, for the metrics
    /// snapshot surfaced alongside `statusOf`. Zero until INSPECTING begins.
    pub inspectors_finished: usize,
    pub inspectors_total: usize,
}

impl JobRecord {
    /// Create a freshly-submitted record in `PENDING`.
    pub fn new(id: JobId, created_at_ms: u64) -> Self {
        Self {
            id: id.clone(),
            status: JobStatus::Pending,
            phase: JobPhase::Pending,
            created_at_ms,
            started_at_ms: None,
            completed_at_ms: None,
            progress: 0.0,
            result_ref: None,
            error_kind: None,
            error_detail: None,
            inspectors_finished: 0,
            inspectors_total: 0,
        }
    }

    /// Transition PENDING -> SAMPLING. Sets `startedAt` and `status =
    /// Processing`.
    pub fn begin_sampling(&mut self, now_ms: u64) {
        debug_assert_eq!(self.phase, JobPhase::Pending);
        self.phase = JobPhase::Sampling;
        self.status = JobStatus::Processing;
        self.started_at_ms = Some(now_ms);
    }

    /// SAMPLING -> INSPECTING with progress := 0.10.
    pub fn begin_inspecting(&mut self) {
        debug_assert_eq!(self.phase, JobPhase::Sampling);
        self.phase = JobPhase::Inspecting;
        self.progress = 0.10;
    }

    /// Update progress while INSPECTING: `0.10 + 0.80 * finished/total`.
    pub fn update_inspection_progress(&mut self, finished: usize, total: usize) {
        debug_assert_eq!(self.phase, JobPhase::Inspecting);
        self.inspectors_finished = finished;
        self.inspectors_total = total;
        if total == 0 {
            self.progress = 0.90;
            return;
        }
        self.progress = 0.10 + 0.80 * (finished as f64 / total as f64);
    }

    /// INSPECTING -> FUSING with progress := 0.90.
    pub fn begin_fusing(&mut self) {
        debug_assert_eq!(self.phase, JobPhase::Inspecting);
        self.phase = JobPhase::Fusing;
        self.progress = 0.90;
    }

    /// FUSING -> COMPLETED. `result_ref` is written *before* status flips to
    /// `Completed`, satisfying the Job Store visibility rule: any reader
    /// observing `status == Completed` in the same snapshot also sees
    /// `result_ref`.
    pub fn complete(&mut self, now_ms: u64) {
        debug_assert_eq!(self.phase, JobPhase::Fusing);
        self.result_ref = Some(self.id.clone());
        self.progress = 1.0;
        self.completed_at_ms = Some(now_ms);
        self.phase = JobPhase::Completed;
        self.status = JobStatus::Completed;
    }

    /// Any phase -> FAILED. `error_kind`/`error_detail` are written before
    /// `status` flips to `Failed`, mirroring [`Self::complete`]'s ordering
    /// guarantee for the symmetric FAILED/errorKind rule.
    pub fn fail(&mut self, kind: ErrorKind, detail: impl Into<String>, now_ms: u64) {
        self.error_kind = Some(kind);
        self.error_detail = Some(detail.into());
        self.completed_at_ms = Some(now_ms);
        self.phase = JobPhase::Failed;
        self.status = JobStatus::Failed;
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
