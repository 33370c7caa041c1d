// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job scratch directory lifecycle.

use crate::error::WorkspaceError;
use std::path::{Path, PathBuf};
use vscan_core::JobId;

/// A job's private directory. `release` is idempotent and is the only way
/// the directory is removed — nothing else in the engine unlinks it.
pub struct WorkspaceHandle {
    root: PathBuf,
}

impl WorkspaceHandle {
    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn audio_path(&self) -> PathBuf {
        self.root.join("audio.pcm")
    }
}

#[derive(Clone)]
pub struct WorkspaceManager {
    base_path: PathBuf,
}

impl WorkspaceManager {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Creates `base_path/<jobId>`. Failure is always fatal for the job
    /// (`errorKind = WorkspaceError`).
    pub async fn acquire(&self, job_id: &JobId) -> Result<WorkspaceHandle, WorkspaceError> {
        let root = self.base_path.join(job_id.as_str());
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|source| WorkspaceError::Create {
                path: root.clone(),
                source,
            })?;
        Ok(WorkspaceHandle { root })
    }

    /// Deletes the directory recursively. Idempotent: a missing directory
    /// is not an error. Failure is logged by the caller, never propagated.
    pub async fn release(&self, handle: WorkspaceHandle) {
        if let Err(err) = tokio::fs::remove_dir_all(&handle.root).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %handle.root.display(), error = %err, "workspace release failed");
            }
        }
    }

    pub fn exists(&self, job_id: &JobId) -> bool {
        self.base_path.join(job_id.as_str()).exists()
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
