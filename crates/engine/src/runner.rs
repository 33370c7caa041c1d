// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inspector Runner: executes one inspector under a hard timeout, isolating
//! its failure into a neutral score plus diagnostic event rather than ever
//! letting it fail the job (unless `fatalOnFailure`).

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use vscan_adapters::Inspector;
use vscan_adapters::InspectorContext;
use vscan_core::{
    inspector_failed_event, AnomalyEvent, DerivedArtifacts, InspectorDescriptor, InspectorOutcome, SampledMedia,
};

pub const NEUTRAL_SCORE: f64 = 0.5;

/// One inspector's terminal outcome, already degraded per policy — the
/// orchestrator never sees a raw [`vscan_adapters::InspectorError`].
#[derive(Debug, Clone)]
pub struct RunnerOutcome {
    pub name: String,
    pub score: f64,
    pub events: Vec<AnomalyEvent>,
    pub artifact: Option<String>,
    pub fatal_error: Option<String>,
}

/// Runs inspectors under a per-job concurrency cap
/// (`maxConcurrentInspectorsPerJob`).
pub struct InspectorRunner {
    semaphore: Arc<Semaphore>,
}

impl InspectorRunner {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Runs one inspector to a degraded-but-always-Ok outcome. Acquires a
    /// concurrency permit first, so callers can simply `join_all` a batch
    /// and still respect the cap.
    ///
    /// The inspector runs on its own task rather than being awaited inline:
    /// with the workspace's release profile set to `panic = "abort"`, a
    /// panic awaited directly here would abort the whole daemon instead of
    /// just this job. Spawning turns a panic into a `JoinError` this
    /// function can degrade like any other inspector failure.
    pub async fn run(
        &self,
        inspector: Arc<dyn Inspector>,
        descriptor: &InspectorDescriptor,
        ctx: InspectorContext,
        bundle: Arc<SampledMedia>,
        derived: Arc<DerivedArtifacts>,
    ) -> RunnerOutcome {
        let _permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore is never closed");

        let timeout = Duration::from_secs(descriptor.timeout_sec);
        let cancellation = ctx.cancellation.clone();
        let name = descriptor.name.clone();
        let effective_duration_sec = bundle.effective_duration_sec();

        let mut task = tokio::spawn(async move { inspector.run(&ctx, &bundle, &derived).await });

        let (outcome, artifact) = tokio::select! {
            result = tokio::time::timeout(timeout, &mut task) => match result {
                Ok(Ok(Ok((score, events, artifact)))) => (InspectorOutcome::Success { score, events }, artifact),
                Ok(Ok(Err(err))) => (InspectorOutcome::Error { detail: err.to_string() }, None),
                Ok(Err(join_err)) if join_err.is_panic() => {
                    (InspectorOutcome::Error { detail: "panicked".to_string() }, None)
                }
                Ok(Err(_cancelled)) => (InspectorOutcome::Error { detail: "cancelled".to_string() }, None),
                Err(_elapsed) => {
                    task.abort();
                    (InspectorOutcome::Timeout, None)
                }
            },
            _ = cancellation.cancelled() => {
                task.abort();
                (InspectorOutcome::Error { detail: "cancelled".to_string() }, None)
            }
        };

        self.finish(&name, descriptor, effective_duration_sec, outcome, artifact)
    }

    /// Folds the inspector's terminal [`InspectorOutcome`] into a
    /// [`RunnerOutcome`], applying score clamping on success and the
    /// `fatalOnFailure` policy otherwise.
    fn finish(
        &self,
        name: &str,
        descriptor: &InspectorDescriptor,
        effective_duration_sec: f64,
        outcome: InspectorOutcome,
        artifact: Option<String>,
    ) -> RunnerOutcome {
        match outcome {
            InspectorOutcome::Success { score, mut events } => {
                let clamped_score = score.clamp(0.0, 1.0);
                if clamped_score != score {
                    events.push(
                        AnomalyEvent::new(name, "score_clamped", 0.0, 0.0)
                            .with_metadata("raw_score", serde_json::json!(score)),
                    );
                }
                RunnerOutcome {
                    name: name.to_string(),
                    score: clamped_score,
                    events,
                    artifact,
                    fatal_error: None,
                }
            }
            InspectorOutcome::Timeout => self.degrade(name, descriptor, effective_duration_sec, "timeout".to_string()),
            InspectorOutcome::Error { detail } => self.degrade(name, descriptor, effective_duration_sec, detail),
        }
    }

    fn degrade(
        &self,
        name: &str,
        descriptor: &InspectorDescriptor,
        effective_duration_sec: f64,
        reason: String,
    ) -> RunnerOutcome {
        let event = inspector_failed_event(name, effective_duration_sec, reason.clone());
        if descriptor.fatal_on_failure {
            return RunnerOutcome {
                name: name.to_string(),
                score: NEUTRAL_SCORE,
                events: vec![event],
                artifact: None,
                fatal_error: Some(reason),
            };
        }
        RunnerOutcome {
            name: name.to_string(),
            score: NEUTRAL_SCORE,
            events: vec![event],
            artifact: None,
            fatal_error: None,
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
