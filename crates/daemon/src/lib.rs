// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Video analysis daemon library surface.
//!
//! Exposes the construction of a fully-wired [`vscan_engine::VideoAnalysisService`]
//! so the binary entry point (`main.rs`) and integration tests share one
//! assembly path.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::collections::HashMap;
use std::sync::Arc;

use vscan_adapters::{inspector::reference::builtin_inspectors, Inspector, ModelCacheHandle};
use vscan_core::{EngineConfig, InspectorRegistry, SystemClock, UuidIdGen};
use vscan_engine::{
    AdmissionScheduler, FfmpegSampler, JobStore, PipelineOrchestrator, VideoAnalysisService,
    WorkspaceManager,
};

/// Everything `main` needs to hold for the life of the process: the service
/// facade plus the model-cache handle it doesn't own but must stop on
/// shutdown.
pub struct Daemon {
    pub service: Arc<VideoAnalysisService>,
    pub model_cache: ModelCacheHandle,
}

/// Wires every engine component together exactly once, following
/// `config`. Mirrors the construction each orchestrator test performs by
/// hand, but with the production `FfmpegSampler` and reference inspectors.
pub fn build(config: EngineConfig) -> Daemon {
    let model_cache = ModelCacheHandle::start(&config);
    let registry = InspectorRegistry::builtin();

    let inspectors: HashMap<String, Arc<dyn Inspector>> = builtin_inspectors()
        .into_iter()
        .map(|inspector| (inspector.name().to_string(), Arc::from(inspector)))
        .collect();

    let store = Arc::new(JobStore::new());
    let clock = Arc::new(SystemClock);
    let workspace = WorkspaceManager::new(config.workspace_base_path.clone());
    let sampler = Arc::new(FfmpegSampler::default());

    let orchestrator = Arc::new(PipelineOrchestrator::new(
        workspace,
        sampler,
        registry,
        inspectors,
        store.clone(),
        clock.clone(),
        config.clone(),
    ));
    let admission = AdmissionScheduler::new(config.max_concurrent_jobs, config.admission_queue_capacity);

    let service = Arc::new(VideoAnalysisService::new(
        config,
        store,
        admission,
        orchestrator,
        clock,
        UuidIdGen,
    ));

    Daemon { service, model_cache }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
