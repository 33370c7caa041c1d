// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The inspector contract consumed by `vscan-engine`'s Inspector Runner:
//! `(ctx, bundle, derived) -> (score, events) | error`.
//!
//! Inspector implementations are, per the system's scope, external
//! black boxes — only this interface is part of the core. [`reference`]
//! ships deterministic stand-ins for the nine catalogued inspectors so the
//! pipeline is exercisable end-to-end without a real ML backend.

pub mod reference;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeInspector, InspectorCall};

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use vscan_core::{AnomalyEvent, DerivedArtifacts, JobId, SampledMedia};

/// Error surfaced by an inspector's `run`. Timeouts are enforced by the
/// caller wrapping `run` in `tokio::time::timeout`, not reported here.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct InspectorError(pub String);

impl InspectorError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

/// Per-invocation context handed to an inspector.
#[derive(Clone)]
pub struct InspectorContext {
    pub job_id: JobId,
    pub cancellation: CancellationToken,
}

impl InspectorContext {
    pub fn new(job_id: JobId, cancellation: CancellationToken) -> Self {
        Self {
            job_id,
            cancellation,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

/// One analysis module. `name()` must match an [`vscan_core::InspectorDescriptor`]
/// name in the registry the runner was constructed with.
#[async_trait]
pub trait Inspector: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Runs the inspector to completion. The caller is responsible for
    /// timeout enforcement and for classifying an `Err` into the
    /// Timeout/Error outcome split.
    ///
    /// The third element of a successful return is the inspector's published
    /// artifact, if it produces one (only `transcript` does today) — the
    /// runner inserts it into the job's [`DerivedArtifacts`] bag keyed by
    /// this inspector's name before scheduling any dependent inspector.
    async fn run(
        &self,
        ctx: &InspectorContext,
        bundle: &SampledMedia,
        derived: &DerivedArtifacts,
    ) -> Result<(f64, Vec<AnomalyEvent>, Option<String>), InspectorError>;
}

#[cfg(test)]
#[path = "inspector_tests.rs"]
mod tests;
