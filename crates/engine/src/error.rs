// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine's internal stages. None of these cross the
//! submission/observation boundary directly — the orchestrator folds them
//! into a [`vscan_core::ErrorKind`] plus operator-facing detail string on
//! the job record.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace directory {path}: {source}")]
    Create {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("input media could not be probed: {0}")]
    Unprobeable(String),
    #[error("input media decoded to zero frames")]
    ZeroFrames,
    #[error("workspace I/O failure during sampling: {0}")]
    Workspace(#[from] WorkspaceError),
}

#[derive(Debug, Error)]
pub enum FusionError {
    #[error("fusion produced confidence outside [0,1]: {0}")]
    OutOfRange(f64),
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Rejected(#[from] vscan_core::RejectedReason),
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("sampling failed: {0}")]
    Sampling(#[from] SamplingError),
    #[error("inspector {name} declared fatalOnFailure and failed: {detail}")]
    InspectorFatal { name: String, detail: String },
    #[error("fusion failed: {0}")]
    Fusion(#[from] FusionError),
    #[error("workspace failure: {0}")]
    Workspace(#[from] WorkspaceError),
    #[error("job cancelled or timed out")]
    Cancelled,
}

impl OrchestratorError {
    pub fn kind(&self) -> vscan_core::ErrorKind {
        use vscan_core::ErrorKind;
        match self {
            OrchestratorError::Sampling(_) => ErrorKind::SamplingError,
            OrchestratorError::InspectorFatal { .. } => ErrorKind::InspectorFatal,
            OrchestratorError::Fusion(_) => ErrorKind::FusionError,
            OrchestratorError::Workspace(_) => ErrorKind::WorkspaceError,
            OrchestratorError::Cancelled => ErrorKind::Cancelled,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
