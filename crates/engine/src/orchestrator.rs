// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Pipeline Orchestrator: drives one job through PENDING -> SAMPLING ->
//! INSPECTING -> FUSING -> COMPLETED|FAILED, wiring together every other
//! engine component.

use crate::error::OrchestratorError;
use crate::runner::InspectorRunner;
use crate::sampler::MediaSampler;
use crate::store::JobStore;
use crate::workspace::WorkspaceManager;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vscan_adapters::{Inspector, InspectorContext};
use vscan_core::{
    AnalysisResult, Clock, DerivedArtifacts, DerivedSummary, EngineConfig, InspectorRegistry, JobId,
};

/// Everything the orchestrator needs to run a job, independent of how many
/// jobs share the process (that's [`crate::admission::AdmissionScheduler`]'s
/// job).
pub struct PipelineOrchestrator {
    workspace: WorkspaceManager,
    sampler: Arc<dyn MediaSampler>,
    registry: InspectorRegistry,
    inspectors: HashMap<String, Arc<dyn Inspector>>,
    store: Arc<JobStore>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl PipelineOrchestrator {
    pub fn new(
        workspace: WorkspaceManager,
        sampler: Arc<dyn MediaSampler>,
        registry: InspectorRegistry,
        inspectors: HashMap<String, Arc<dyn Inspector>>,
        store: Arc<JobStore>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            workspace,
            sampler,
            registry,
            inspectors,
            store,
            clock,
            config,
        }
    }

    /// Runs `job_id` to a terminal state. The caller (the service facade)
    /// is responsible for having already inserted a PENDING [`vscan_core::JobRecord`]
    /// into the store.
    #[tracing::instrument(skip(self, cancellation), fields(job = %job_id))]
    pub async fn run(&self, job_id: JobId, input_path: PathBuf, cancellation: CancellationToken) {
        // Enforces `perJobTimeoutSec` as an overall budget on top of the
        // per-inspector timeouts: cancelling the same token `run_inner`
        // already checks at each phase boundary, rather than racing a
        // second, differently-shaped timeout against the whole future.
        let budget_cancellation = cancellation.clone();
        let budget = Duration::from_secs(self.config.per_job_timeout_sec);
        let watchdog = tokio::spawn(async move {
            tokio::time::sleep(budget).await;
            budget_cancellation.cancel();
        });

        let outcome = self.run_inner(&job_id, &input_path, &cancellation).await;
        watchdog.abort();

        if let Err(err) = outcome {
            tracing::warn!(job = %job_id, error = %err, "job failed");
            self.store.update(&job_id, |record| {
                record.fail(err.kind(), err.to_string(), self.clock.epoch_ms());
            });
        }
    }

    async fn run_inner(
        &self,
        job_id: &JobId,
        input_path: &std::path::Path,
        cancellation: &CancellationToken,
    ) -> Result<(), OrchestratorError> {
        self.store.update(job_id, |record| record.begin_sampling(self.clock.epoch_ms()));

        let workspace = self.workspace.acquire(job_id).await?;
        let sample_result = self
            .sampler
            .sample(
                input_path,
                &workspace,
                self.config.target_fps,
                self.config.max_duration_sec,
            )
            .await;

        let bundle = match sample_result {
            Ok(bundle) => Arc::new(bundle),
            Err(err) => {
                self.workspace.release(workspace).await;
                return Err(err.into());
            }
        };

        if cancellation.is_cancelled() {
            self.workspace.release(workspace).await;
            return Err(OrchestratorError::Cancelled);
        }

        self.store.update(job_id, |record| record.begin_inspecting());

        let inspection = self.run_inspection(job_id, &bundle, cancellation).await;
        self.workspace.release(workspace).await;
        let (scores, events, derived, fatal) = inspection?;

        if let Some((name, detail)) = fatal {
            return Err(OrchestratorError::InspectorFatal { name, detail });
        }

        // A cancellation that arrived mid-inspection degrades whichever
        // inspectors were in flight to a neutral score rather than aborting
        // them outright; the job itself still must not complete.
        if cancellation.is_cancelled() {
            return Err(OrchestratorError::Cancelled);
        }

        self.store.update(job_id, |record| record.begin_fusing());

        let weights: HashMap<String, f64> = self
            .registry
            .descriptors()
            .iter()
            .filter(|d| d.contributes_score())
            .map(|d| (d.name.clone(), d.weight))
            .collect();
        let fusion = vscan_core::fuse(&scores, &weights);
        let aggregated_events = crate::aggregator::aggregate(events, bundle.effective_duration_sec());

        let now_ms = self.clock.epoch_ms();
        let processing_time_sec = self
            .store
            .read(job_id)
            .and_then(|record| record.started_at_ms)
            .map(|started| (now_ms.saturating_sub(started)) as f64 / 1000.0)
            .unwrap_or(0.0);
        let visual_score = scores.get("visual_clip").copied().unwrap_or(0.0);

        let result = AnalysisResult {
            job_id: job_id.clone(),
            label: fusion.label,
            confidence: fusion.confidence,
            per_inspector_scores: scores.into_iter().collect(),
            events: aggregated_events,
            derived: DerivedSummary {
                visual_score,
                video_length_sec: bundle.effective_duration_sec(),
                original_video_length_sec: bundle.original_duration_sec(),
                transcript_snippet: derived.get("transcript").to_string(),
                processing_time_sec,
                pipeline_version: self.config.pipeline_version.clone(),
            },
            processed_at_ms: now_ms,
        };

        self.store.put_result(job_id.clone(), result);
        self.store.update(job_id, |record| record.complete(self.clock.epoch_ms()));
        Ok(())
    }

    /// Runs the independent inspectors (including `transcript`) concurrently,
    /// publishes `transcript`'s artifact, then runs the transcript-dependent
    /// inspectors concurrently.
    async fn run_inspection(
        &self,
        job_id: &JobId,
        bundle: &Arc<vscan_core::SampledMedia>,
        cancellation: &CancellationToken,
    ) -> Result<
        (
            HashMap<String, f64>,
            Vec<vscan_core::AnomalyEvent>,
            DerivedArtifacts,
            Option<(String, String)>,
        ),
        OrchestratorError,
    > {
        let runner = InspectorRunner::new(self.config.max_concurrent_inspectors_per_job);
        let total = self.registry.descriptors().len();
        let finished = Arc::new(AtomicUsize::new(0));
        let derived = Arc::new(DerivedArtifacts::new());

        let independent: Vec<_> = self
            .registry
            .independent_inspectors()
            .into_iter()
            .chain(self.registry.transcript_inspector())
            .cloned()
            .collect();

        let first_batch = self
            .run_batch(job_id, bundle, derived.clone(), cancellation, &runner, &independent, &finished, total)
            .await;

        let mut scores = HashMap::new();
        let mut events = Vec::new();
        let mut fatal = None;
        let mut derived_next = DerivedArtifacts::new();
        for outcome in first_batch {
            if outcome.name == "transcript" {
                if let Some(artifact) = &outcome.artifact {
                    derived_next.insert("transcript", artifact.clone());
                }
            }
            self.fold_outcome(outcome, &self.registry, &mut scores, &mut events, &mut fatal);
        }
        if fatal.is_some() {
            return Ok((scores, events, derived_next, fatal));
        }

        let dependents: Vec<_> = self.registry.transcript_dependents().into_iter().cloned().collect();
        let derived_arc = Arc::new(derived_next);
        let second_batch = self
            .run_batch(job_id, bundle, derived_arc.clone(), cancellation, &runner, &dependents, &finished, total)
            .await;
        for outcome in second_batch {
            self.fold_outcome(outcome, &self.registry, &mut scores, &mut events, &mut fatal);
        }

        Ok((scores, events, Arc::try_unwrap(derived_arc).unwrap_or_default(), fatal))
    }

    async fn run_batch(
        &self,
        job_id: &JobId,
        bundle: &Arc<vscan_core::SampledMedia>,
        derived: Arc<DerivedArtifacts>,
        cancellation: &CancellationToken,
        runner: &InspectorRunner,
        descriptors: &[vscan_core::InspectorDescriptor],
        finished: &Arc<AtomicUsize>,
        total: usize,
    ) -> Vec<crate::runner::RunnerOutcome> {
        let futures = descriptors.iter().filter_map(|descriptor| {
            let inspector = self.inspectors.get(&descriptor.name)?.clone();
            let ctx = InspectorContext::new(job_id.clone(), cancellation.clone());
            let bundle = bundle.clone();
            let derived = derived.clone();
            let finished = finished.clone();
            let job_id = job_id.clone();
            Some(async move {
                let outcome = runner.run(inspector, descriptor, ctx, bundle, derived).await;
                let done = finished.fetch_add(1, Ordering::SeqCst) + 1;
                self.store.update(&job_id, |record| record.update_inspection_progress(done, total));
                outcome
            })
        });
        futures::future::join_all(futures).await
    }

    fn fold_outcome(
        &self,
        outcome: crate::runner::RunnerOutcome,
        registry: &InspectorRegistry,
        scores: &mut HashMap<String, f64>,
        events: &mut Vec<vscan_core::AnomalyEvent>,
        fatal: &mut Option<(String, String)>,
    ) {
        if let Some(descriptor) = registry.get(&outcome.name) {
            if descriptor.contributes_score() {
                scores.insert(outcome.name.clone(), outcome.score);
            }
        }
        events.extend(outcome.events);
        if let Some(detail) = outcome.fatal_error {
            *fatal = Some((outcome.name, detail));
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
