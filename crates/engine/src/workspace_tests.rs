// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vscan_core::JobId;

#[tokio::test]
async fn acquire_creates_job_directory() {
    let base = tempfile::tempdir().unwrap();
    let manager = WorkspaceManager::new(base.path().to_path_buf());
    let job_id = JobId::new("job-1");

    let handle = manager.acquire(&job_id).await.unwrap();
    assert!(handle.path().is_dir());
    assert!(manager.exists(&job_id));
}

#[tokio::test]
async fn release_removes_the_directory() {
    let base = tempfile::tempdir().unwrap();
    let manager = WorkspaceManager::new(base.path().to_path_buf());
    let job_id = JobId::new("job-1");

    let handle = manager.acquire(&job_id).await.unwrap();
    manager.release(handle).await;
    assert!(!manager.exists(&job_id));
}

#[tokio::test]
async fn release_is_idempotent_on_missing_directory() {
    let base = tempfile::tempdir().unwrap();
    let manager = WorkspaceManager::new(base.path().to_path_buf());
    let job_id = JobId::new("job-1");

    let handle = manager.acquire(&job_id).await.unwrap();
    manager.release(handle).await;

    let handle = manager.acquire(&job_id).await.unwrap();
    manager.release(handle).await;
    manager.release(WorkspaceHandle {
        root: base.path().join(job_id.as_str()),
    })
    .await;
}

#[tokio::test]
async fn distinct_jobs_get_disjoint_directories() {
    let base = tempfile::tempdir().unwrap();
    let manager = WorkspaceManager::new(base.path().to_path_buf());
    let a = manager.acquire(&JobId::new("job-a")).await.unwrap();
    let b = manager.acquire(&JobId::new("job-b")).await.unwrap();
    assert_ne!(a.path(), b.path());
}
