// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `VideoAnalysisService` facade: the one entry point a transport layer
//! (the daemon's listener, a test harness) talks to. Wires admission
//! control, the job store, and the orchestrator together and owns the
//! spawned per-job task lifecycle.

use crate::admission::AdmissionScheduler;
use crate::orchestrator::PipelineOrchestrator;
use crate::store::JobStore;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vscan_core::{
    AnalysisResult, AnomalyEvent, Clock, EngineConfig, IdGen, JobId, JobPhase, JobRecord, JobStatus, RejectedReason,
    RequestError,
};

const SUPPORTED_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "avi"];

/// Lightweight point-in-time view returned by `statusOf`.
#[derive(Debug, Clone)]
pub struct JobStatusView {
    pub status: JobStatus,
    pub phase: JobPhase,
    pub progress: f64,
    pub created_at_ms: u64,
    pub started_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,
    pub error_kind: Option<vscan_core::ErrorKind>,
}

/// Read-only point-in-time metrics snapshot, additive to `statusOf`. Never
/// changes the documented `statusOf` fields above.
#[derive(Debug, Clone)]
pub struct JobMetricsSnapshot {
    pub elapsed_ms: u64,
    pub inspectors_finished: usize,
    pub inspectors_total: usize,
}

pub struct VideoAnalysisService {
    config: EngineConfig,
    store: Arc<JobStore>,
    admission: AdmissionScheduler,
    orchestrator: Arc<PipelineOrchestrator>,
    clock: Arc<dyn Clock>,
    id_gen: Box<dyn Fn() -> String + Send + Sync>,
    cancellations: Arc<Mutex<HashMap<JobId, CancellationToken>>>,
}

impl VideoAnalysisService {
    /// `IdGen` is `Clone`, hence not object-safe — it's captured in a
    /// boxed closure rather than stored as `Arc<dyn IdGen>`.
    pub fn new(
        config: EngineConfig,
        store: Arc<JobStore>,
        admission: AdmissionScheduler,
        orchestrator: Arc<PipelineOrchestrator>,
        clock: Arc<dyn Clock>,
        id_gen: impl IdGen + 'static,
    ) -> Self {
        Self {
            config,
            store,
            admission,
            orchestrator,
            clock,
            id_gen: Box::new(move || id_gen.next()),
            cancellations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Validates and admits a submission, then spawns the orchestrator run
    /// in the background. Returns as soon as the job is accepted — the
    /// caller polls `statusOf`/`resultOf` afterwards.
    pub async fn submit(
        &self,
        input_path: PathBuf,
        filename: &str,
        size_bytes: u64,
    ) -> Result<JobId, RequestError> {
        if size_bytes > self.config.max_upload_bytes {
            return Err(RejectedReason::TooLarge {
                actual: size_bytes,
                limit: self.config.max_upload_bytes,
            }
            .into());
        }
        if !has_supported_extension(filename) {
            return Err(RejectedReason::UnsupportedMimeType(filename.to_string()).into());
        }
        let ticket = self.admission.reserve()?;

        let job_id = JobId::new((self.id_gen)());
        let record = JobRecord::new(job_id.clone(), self.clock.epoch_ms());
        if let Err(err) = self.store.insert(record) {
            tracing::error!(job = %job_id, error = %err, "job id collision on submit");
        }

        let token = CancellationToken::new();
        self.cancellations.lock().insert(job_id.clone(), token.clone());

        let orchestrator = self.orchestrator.clone();
        let admission = self.admission.clone();
        let cancellations = self.cancellations.clone();
        let spawned_id = job_id.clone();
        tokio::spawn(async move {
            let _ticket = ticket;
            let _run_slot = admission.run_slot().await;
            orchestrator.run(spawned_id.clone(), input_path, token).await;
            cancellations.lock().remove(&spawned_id);
        });

        Ok(job_id)
    }

    pub fn status_of(&self, job_id: &JobId) -> Result<JobStatusView, RequestError> {
        let record = self
            .store
            .read(job_id)
            .ok_or_else(|| RequestError::NotFound(job_id.to_string()))?;
        Ok(JobStatusView {
            status: record.status,
            phase: record.phase,
            progress: record.progress,
            created_at_ms: record.created_at_ms,
            started_at_ms: record.started_at_ms,
            completed_at_ms: record.completed_at_ms,
            error_kind: record.error_kind,
        })
    }

    pub fn result_of(&self, job_id: &JobId) -> Result<Arc<AnalysisResult>, RequestError> {
        let record = self
            .store
            .read(job_id)
            .ok_or_else(|| RequestError::NotFound(job_id.to_string()))?;
        match record.status {
            JobStatus::Completed => self
                .store
                .read_result(job_id)
                .ok_or_else(|| RequestError::NotFound(job_id.to_string())),
            JobStatus::Failed => Err(RequestError::Failed {
                kind: record.error_kind.unwrap_or(vscan_core::ErrorKind::Cancelled),
                detail: record.error_detail.unwrap_or_default(),
            }),
            other => Err(RequestError::NotReady(other)),
        }
    }

    pub fn events_of(&self, job_id: &JobId) -> Result<Vec<AnomalyEvent>, RequestError> {
        self.result_of(job_id).map(|result| result.events.clone())
    }

    pub fn metrics_of(&self, job_id: &JobId) -> Result<JobMetricsSnapshot, RequestError> {
        let record = self
            .store
            .read(job_id)
            .ok_or_else(|| RequestError::NotFound(job_id.to_string()))?;
        let elapsed_ms = match (record.started_at_ms, record.completed_at_ms) {
            (Some(started), Some(completed)) => completed.saturating_sub(started),
            (Some(started), None) => self.clock.epoch_ms().saturating_sub(started),
            (None, _) => 0,
        };
        Ok(JobMetricsSnapshot {
            elapsed_ms,
            inspectors_finished: record.inspectors_finished,
            inspectors_total: record.inspectors_total,
        })
    }

    /// Cancels an in-flight job cooperatively. A no-op (returns `false`) if
    /// the job is already terminal or unknown.
    pub fn cancel(&self, job_id: &JobId) -> bool {
        match self.cancellations.lock().get(job_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Waits until every admitted job has drained, up to `timeout` — used by
    /// the daemon during graceful shutdown.
    pub async fn drain(&self, timeout: Duration) {
        let deadline = tokio::time::Instant::now() + timeout;
        while self.admission.pending_count() > 0 && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }
}

fn has_supported_extension(filename: &str) -> bool {
    filename
        .rsplit('.')
        .next()
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
