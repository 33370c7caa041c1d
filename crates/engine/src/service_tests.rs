// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::sampler::FakeSampler;
use std::collections::HashMap;
use vscan_core::{FakeClock, InspectorRegistry, SequentialIdGen};
use vscan_adapters::{FakeInspector, Inspector};

fn service(base: &std::path::Path, max_concurrent_jobs: usize) -> VideoAnalysisService {
    let inspectors: HashMap<String, Arc<dyn Inspector>> = InspectorRegistry::builtin()
        .descriptors()
        .iter()
        .map(|d| {
            let inspector: Arc<dyn Inspector> = Arc::new(FakeInspector::returning(d.name.clone(), 0.1));
            (d.name.clone(), inspector)
        })
        .collect();

    let config = EngineConfig {
        max_concurrent_jobs,
        max_upload_bytes: 1_000,
        workspace_base_path: base.to_path_buf(),
        ..EngineConfig::default()
    };
    let store = Arc::new(JobStore::new());
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new(1_000));
    let orchestrator = Arc::new(PipelineOrchestrator::new(
        crate::workspace::WorkspaceManager::new(base.to_path_buf()),
        Arc::new(FakeSampler::returning(FakeSampler::short_bundle(4, 8.0))),
        InspectorRegistry::builtin(),
        inspectors,
        store.clone(),
        clock.clone(),
        config.clone(),
    ));
    let admission = AdmissionScheduler::new(config.max_concurrent_jobs, config.admission_queue_capacity);
    VideoAnalysisService::new(config, store, admission, orchestrator, clock, SequentialIdGen::new("job"))
}

#[tokio::test]
async fn submit_rejects_oversized_uploads() {
    let base = tempfile::tempdir().unwrap();
    let svc = service(base.path(), 2);
    let err = svc
        .submit(PathBuf::from("/tmp/in.mp4"), "clip.mp4", 2_000)
        .await
        .unwrap_err();
    assert!(matches!(err, RequestError::Rejected(RejectedReason::TooLarge { .. })));
}

#[tokio::test]
async fn submit_rejects_unsupported_extension() {
    let base = tempfile::tempdir().unwrap();
    let svc = service(base.path(), 2);
    let err = svc
        .submit(PathBuf::from("/tmp/in.exe"), "payload.exe", 10)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RequestError::Rejected(RejectedReason::UnsupportedMimeType(_))
    ));
}

#[tokio::test]
async fn submit_rejects_mkv_as_unsupported() {
    let base = tempfile::tempdir().unwrap();
    let svc = service(base.path(), 2);
    let err = svc
        .submit(PathBuf::from("/tmp/clip.mkv"), "clip.mkv", 10)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RequestError::Rejected(RejectedReason::UnsupportedMimeType(_))
    ));
}

#[tokio::test]
async fn status_of_unknown_job_is_not_found() {
    let base = tempfile::tempdir().unwrap();
    let svc = service(base.path(), 2);
    let err = svc.status_of(&JobId::new("nope")).unwrap_err();
    assert!(matches!(err, RequestError::NotFound(_)));
}

#[tokio::test]
async fn submitted_job_eventually_completes() {
    let base = tempfile::tempdir().unwrap();
    let svc = service(base.path(), 2);
    let job_id = svc.submit(PathBuf::from("/tmp/in.mp4"), "clip.mp4", 10).await.unwrap();

    let mut status = svc.status_of(&job_id).unwrap();
    for _ in 0..200 {
        if status.status.is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        status = svc.status_of(&job_id).unwrap();
    }
    assert_eq!(status.status, JobStatus::Completed);
    let result = svc.result_of(&job_id).unwrap();
    assert_eq!(result.job_id, job_id);
    assert!(svc.events_of(&job_id).is_ok());
}

#[tokio::test]
async fn status_of_reports_timestamps_and_error_kind_across_a_job_lifecycle() {
    let base = tempfile::tempdir().unwrap();
    let svc = service(base.path(), 2);
    let job_id = svc.submit(PathBuf::from("/tmp/in.mp4"), "clip.mp4", 10).await.unwrap();

    let mut status = svc.status_of(&job_id).unwrap();
    assert!(status.created_at_ms > 0);
    assert!(status.error_kind.is_none());

    for _ in 0..200 {
        if status.status.is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        status = svc.status_of(&job_id).unwrap();
    }

    assert_eq!(status.status, JobStatus::Completed);
    assert!(status.started_at_ms.is_some());
    assert!(status.completed_at_ms.is_some());
    assert!(status.started_at_ms.unwrap() <= status.completed_at_ms.unwrap());
    assert!(status.error_kind.is_none());
}

#[tokio::test]
async fn metrics_of_pending_job_is_zero_elapsed() {
    let base = tempfile::tempdir().unwrap();
    let svc = service(base.path(), 2);
    let job_id = JobId::new("job-pending");
    svc.store.insert(vscan_core::JobRecord::new(job_id.clone(), 0)).unwrap();

    let metrics = svc.metrics_of(&job_id).unwrap();
    assert_eq!(metrics.elapsed_ms, 0);
    assert_eq!(metrics.inspectors_finished, 0);
    assert_eq!(metrics.inspectors_total, 0);
}

#[tokio::test]
async fn metrics_of_completed_job_reports_inspector_counts() {
    let base = tempfile::tempdir().unwrap();
    let svc = service(base.path(), 2);
    let job_id = svc.submit(PathBuf::from("/tmp/in.mp4"), "clip.mp4", 10).await.unwrap();

    let mut status = svc.status_of(&job_id).unwrap();
    for _ in 0..200 {
        if status.status.is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        status = svc.status_of(&job_id).unwrap();
    }
    let metrics = svc.metrics_of(&job_id).unwrap();
    assert_eq!(metrics.inspectors_total, InspectorRegistry::builtin().descriptors().len());
    assert_eq!(metrics.inspectors_finished, metrics.inspectors_total);
}

#[tokio::test]
async fn result_of_pending_job_is_not_ready() {
    let base = tempfile::tempdir().unwrap();
    let svc = service(base.path(), 2);
    let job_id = JobId::new("job-pending");
    svc.store.insert(vscan_core::JobRecord::new(job_id.clone(), 0)).unwrap();

    let err = svc.result_of(&job_id).unwrap_err();
    assert!(matches!(err, RequestError::NotReady(JobStatus::Pending)));
}
