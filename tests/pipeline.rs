// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenarios driving the full assembly (Workspace Manager,
//! Media Sampler, Inspector Runner, Fusion Engine, Event Aggregator, Job
//! Store, Pipeline Orchestrator) through its public surface.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use vscan_adapters::{FakeInspector, Inspector};
use vscan_core::{
    AnomalyEvent, EngineConfig, FakeClock, InspectorRegistry, JobId, JobRecord, JobStatus, Label,
};
use vscan_engine::{
    AdmissionScheduler, FakeSampler, JobStore, MediaSampler, PipelineOrchestrator, WorkspaceManager,
};

fn new_orchestrator(
    sampler: Arc<dyn MediaSampler>,
    inspectors: HashMap<String, Arc<dyn Inspector>>,
    base: &std::path::Path,
) -> (PipelineOrchestrator, Arc<JobStore>) {
    let store = Arc::new(JobStore::new());
    let orchestrator = PipelineOrchestrator::new(
        WorkspaceManager::new(base.to_path_buf()),
        sampler,
        InspectorRegistry::builtin(),
        inspectors,
        store.clone(),
        Arc::new(FakeClock::new(1_000)),
        EngineConfig::default(),
    );
    (orchestrator, store)
}

fn flat_inspectors(score: f64) -> HashMap<String, Arc<dyn Inspector>> {
    InspectorRegistry::builtin()
        .descriptors()
        .iter()
        .map(|d| {
            let inspector: Arc<dyn Inspector> = Arc::new(FakeInspector::returning(d.name.clone(), score));
            (d.name.clone(), inspector)
        })
        .collect()
}

#[tokio::test]
async fn s1_happy_path_is_likely_real() {
    let base = tempfile::tempdir().unwrap();
    let job_id = JobId::new("s1");
    let sampler: Arc<dyn MediaSampler> = Arc::new(FakeSampler::returning(FakeSampler::short_bundle(15, 1.0)));
    let (orchestrator, store) = new_orchestrator(sampler, flat_inspectors(0.1), base.path());

    store.insert(JobRecord::new(job_id.clone(), 0)).unwrap();
    orchestrator.run(job_id.clone(), PathBuf::from("/tmp/in.mp4"), CancellationToken::new()).await;

    let record = store.read(&job_id).unwrap();
    assert_eq!(record.status, JobStatus::Completed);
    let result = store.read_result(&job_id).unwrap();
    assert!((result.confidence - 0.9).abs() < 1e-9);
    assert_eq!(result.label, Label::LikelyReal);
    assert!(result.events.is_empty());
    assert_eq!(result.derived.video_length_sec, 15.0);
    assert_eq!(result.derived.original_video_length_sec, 15.0);
}

#[tokio::test]
async fn s2_weighted_scores_are_likely_fake_with_sorted_events() {
    let base = tempfile::tempdir().unwrap();
    let job_id = JobId::new("s2");
    let sampler: Arc<dyn MediaSampler> = Arc::new(FakeSampler::returning(FakeSampler::short_bundle(15, 1.0)));

    let scored: &[(&str, f64, Option<(&str, f64)>)] = &[
        ("visual_clip", 0.9, None),
        ("visual_artifacts", 0.85, Some(("visual_artifact", 4.25))),
        ("lipsync", 0.8, Some(("lipsync_mismatch", 2.0))),
        ("blink", 0.7, Some(("abnormal_blink", 6.0))),
        ("ocr_gibberish", 0.6, None),
        ("motion_flow", 0.75, Some(("flow_spike", 1.1))),
        ("audio_loop", 0.5, None),
        ("lighting", 0.8, Some(("light_change", 7.5))),
    ];
    let mut inspectors: HashMap<String, Arc<dyn Inspector>> = HashMap::new();
    for (name, score, event) in scored {
        let events = match event {
            Some((tag, ts)) => vec![AnomalyEvent::new(*name, *tag, *ts, 0.0)],
            None => Vec::new(),
        };
        inspectors.insert(
            (*name).to_string(),
            Arc::new(FakeInspector::returning_with_events(*name, *score, events)),
        );
    }
    inspectors.insert(
        "transcript".to_string(),
        Arc::new(FakeInspector::returning("transcript", 0.0)),
    );

    let (orchestrator, store) = new_orchestrator(sampler, inspectors, base.path());
    store.insert(JobRecord::new(job_id.clone(), 0)).unwrap();
    orchestrator.run(job_id.clone(), PathBuf::from("/tmp/in.mp4"), CancellationToken::new()).await;

    let result = store.read_result(&job_id).unwrap();
    // weighted mean of the 8 scoring inspectors' weights (0.85 total, excluding
    // transcript's 0.0) against their reported scores above.
    assert!((result.confidence - 0.21470588235294119).abs() < 1e-9, "got {}", result.confidence);
    assert_eq!(result.label, Label::LikelyFake);
    assert_eq!(result.events.len(), 5);
    for pair in result.events.windows(2) {
        let key = |e: &AnomalyEvent| (e.timestamp_sec, e.module.clone(), e.event_tag.clone());
        assert!(key(&pair[0]) <= key(&pair[1]));
    }
}

#[tokio::test(start_paused = true)]
async fn s3_inspector_timeout_neutralizes_to_half() {
    let base = tempfile::tempdir().unwrap();
    let job_id = JobId::new("s3");
    let sampler: Arc<dyn MediaSampler> = Arc::new(FakeSampler::returning(FakeSampler::short_bundle(15, 1.0)));

    let mut inspectors = flat_inspectors(0.2);
    inspectors.insert("lipsync".to_string(), Arc::new(FakeInspector::hanging("lipsync")));

    let (orchestrator, store) = new_orchestrator(sampler, inspectors, base.path());
    store.insert(JobRecord::new(job_id.clone(), 0)).unwrap();

    let run = orchestrator.run(job_id.clone(), PathBuf::from("/tmp/in.mp4"), CancellationToken::new());
    tokio::time::timeout(Duration::from_secs(300), run).await.unwrap();

    let record = store.read(&job_id).unwrap();
    assert_eq!(record.status, JobStatus::Completed);
    let result = store.read_result(&job_id).unwrap();
    assert_eq!(result.per_inspector_scores.get("lipsync").copied(), Some(0.5));
    assert!(result.events.iter().any(|e| e.event_tag == "inspector_failed" && e.module == "lipsync"));
}

#[tokio::test]
async fn s4_rejects_oversized_uploads_before_any_workspace_allocation() {
    let base = tempfile::tempdir().unwrap();
    let store = Arc::new(JobStore::new());
    let clock = Arc::new(FakeClock::new(0));
    let sampler: Arc<dyn MediaSampler> = Arc::new(FakeSampler::returning(FakeSampler::short_bundle(15, 1.0)));
    let config = EngineConfig {
        max_upload_bytes: 1_000,
        workspace_base_path: base.path().to_path_buf(),
        ..EngineConfig::default()
    };
    let orchestrator = Arc::new(PipelineOrchestrator::new(
        WorkspaceManager::new(base.path().to_path_buf()),
        sampler,
        InspectorRegistry::builtin(),
        flat_inspectors(0.1),
        store.clone(),
        clock.clone(),
        config.clone(),
    ));
    let admission = AdmissionScheduler::new(config.max_concurrent_jobs, config.admission_queue_capacity);
    let service = vscan_engine::VideoAnalysisService::new(
        config,
        store.clone(),
        admission,
        orchestrator,
        clock,
        vscan_core::SequentialIdGen::new("s4"),
    );

    let err = service
        .submit(PathBuf::from("/tmp/huge.mp4"), "huge.mp4", 2_000)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        vscan_core::RequestError::Rejected(vscan_core::RejectedReason::TooLarge { .. })
    ));
    assert!(store.is_empty());
}

#[tokio::test]
async fn s5_cancellation_mid_inspection_fails_the_job_and_cleans_up() {
    let base = tempfile::tempdir().unwrap();
    let job_id = JobId::new("s5");
    let sampler: Arc<dyn MediaSampler> = Arc::new(FakeSampler::returning(FakeSampler::short_bundle(15, 1.0)));

    let mut inspectors = flat_inspectors(0.1);
    inspectors.insert("visual_clip".to_string(), Arc::new(FakeInspector::hanging("visual_clip")));

    let (orchestrator, store) = new_orchestrator(sampler, inspectors, base.path());
    store.insert(JobRecord::new(job_id.clone(), 0)).unwrap();

    let token = CancellationToken::new();
    let cancel_token = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        cancel_token.cancel();
    });

    orchestrator.run(job_id.clone(), PathBuf::from("/tmp/in.mp4"), token).await;

    let record = store.read(&job_id).unwrap();
    assert_eq!(record.status, JobStatus::Failed);
    assert_eq!(record.error_kind, Some(vscan_core::ErrorKind::Cancelled));
    assert!(!base.path().join(job_id.as_str()).exists());
}

#[tokio::test(start_paused = true)]
async fn s7_overall_budget_expiry_cancels_a_job_stuck_inspecting() {
    let base = tempfile::tempdir().unwrap();
    let job_id = JobId::new("s7");
    let sampler: Arc<dyn MediaSampler> = Arc::new(FakeSampler::returning(FakeSampler::short_bundle(15, 1.0)));

    let mut inspectors = flat_inspectors(0.1);
    inspectors.insert("visual_clip".to_string(), Arc::new(FakeInspector::hanging("visual_clip")));

    let store = Arc::new(JobStore::new());
    let config = EngineConfig {
        per_job_timeout_sec: 5,
        workspace_base_path: base.path().to_path_buf(),
        ..EngineConfig::default()
    };
    let orchestrator = PipelineOrchestrator::new(
        WorkspaceManager::new(base.path().to_path_buf()),
        sampler,
        InspectorRegistry::builtin(),
        inspectors,
        store.clone(),
        Arc::new(FakeClock::new(1_000)),
        config,
    );
    store.insert(JobRecord::new(job_id.clone(), 0)).unwrap();

    let run = orchestrator.run(job_id.clone(), PathBuf::from("/tmp/in.mp4"), CancellationToken::new());
    tokio::time::timeout(Duration::from_secs(300), run).await.unwrap();

    let record = store.read(&job_id).unwrap();
    assert_eq!(record.status, JobStatus::Failed);
    assert_eq!(record.error_kind, Some(vscan_core::ErrorKind::Cancelled));
    assert!(!base.path().join(job_id.as_str()).exists());
}

#[tokio::test]
async fn s6_duplicate_events_collapse_into_one() {
    let base = tempfile::tempdir().unwrap();
    let job_id = JobId::new("s6");
    let sampler: Arc<dyn MediaSampler> = Arc::new(FakeSampler::returning(FakeSampler::short_bundle(15, 1.0)));

    let mut inspectors = flat_inspectors(0.1);
    inspectors.insert(
        "visual_artifacts".to_string(),
        Arc::new(FakeInspector::returning_with_events(
            "visual_artifacts",
            0.1,
            vec![AnomalyEvent::new("visual_artifacts", "visual_artifact", 3.00, 0.50)
                .with_metadata("source", serde_json::json!("a"))],
        )),
    );
    inspectors.insert(
        "blink".to_string(),
        Arc::new(FakeInspector::returning_with_events(
            "blink",
            0.1,
            vec![AnomalyEvent::new("visual_artifacts", "visual_artifact", 3.00, 0.50)
                .with_metadata("source", serde_json::json!("b"))],
        )),
    );

    let (orchestrator, store) = new_orchestrator(sampler, inspectors, base.path());
    store.insert(JobRecord::new(job_id.clone(), 0)).unwrap();
    orchestrator.run(job_id.clone(), PathBuf::from("/tmp/in.mp4"), CancellationToken::new()).await;

    let result = store.read_result(&job_id).unwrap();
    let matching: Vec<_> = result
        .events
        .iter()
        .filter(|e| e.module == "visual_artifacts" && e.event_tag == "visual_artifact")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].metadata.get("source").unwrap(), "b");
}
