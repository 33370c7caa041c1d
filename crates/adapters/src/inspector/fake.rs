// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fully controllable inspector double for engine/daemon tests.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Inspector, InspectorContext, InspectorError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use vscan_core::{AnomalyEvent, DerivedArtifacts, JobId, SampledMedia};

/// Recorded call to a [`FakeInspector`].
#[derive(Debug, Clone)]
pub struct InspectorCall {
    pub job_id: JobId,
}

enum Behavior {
    Return {
        score: f64,
        events: Vec<AnomalyEvent>,
        artifact: Option<String>,
    },
    Error(String),
    /// Sleeps forever (until cancelled) — used to exercise timeout handling.
    Hang,
    /// Panics on the first call — used to exercise panic isolation.
    Panic,
}

struct FakeInspectorState {
    behavior: Behavior,
    calls: Vec<InspectorCall>,
}

/// A test double implementing [`Inspector`] with a caller-controlled
/// outcome.
#[derive(Clone)]
pub struct FakeInspector {
    name: String,
    inner: Arc<Mutex<FakeInspectorState>>,
}

impl FakeInspector {
    pub fn returning(name: impl Into<String>, score: f64) -> Self {
        Self::new(
            name,
            Behavior::Return {
                score,
                events: Vec::new(),
                artifact: None,
            },
        )
    }

    pub fn returning_with_events(
        name: impl Into<String>,
        score: f64,
        events: Vec<AnomalyEvent>,
    ) -> Self {
        Self::new(
            name,
            Behavior::Return {
                score,
                events,
                artifact: None,
            },
        )
    }

    pub fn returning_artifact(name: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self::new(
            name,
            Behavior::Return {
                score: 0.0,
                events: Vec::new(),
                artifact: Some(artifact.into()),
            },
        )
    }

    pub fn failing(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, Behavior::Error(detail.into()))
    }

    pub fn hanging(name: impl Into<String>) -> Self {
        Self::new(name, Behavior::Hang)
    }

    pub fn panicking(name: impl Into<String>) -> Self {
        Self::new(name, Behavior::Panic)
    }

    fn new(name: impl Into<String>, behavior: Behavior) -> Self {
        Self {
            name: name.into(),
            inner: Arc::new(Mutex::new(FakeInspectorState {
                behavior,
                calls: Vec::new(),
            })),
        }
    }

    pub fn calls(&self) -> Vec<InspectorCall> {
        self.inner.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().calls.len()
    }
}

#[async_trait]
impl Inspector for FakeInspector {
    fn name(&self) -> &str {
        &self.name
    }

    #[allow(clippy::panic)]
    async fn run(
        &self,
        ctx: &InspectorContext,
        _bundle: &SampledMedia,
        _derived: &DerivedArtifacts,
    ) -> Result<(f64, Vec<AnomalyEvent>, Option<String>), InspectorError> {
        self.inner.lock().calls.push(InspectorCall {
            job_id: ctx.job_id.clone(),
        });

        let snapshot = {
            let inner = self.inner.lock();
            match &inner.behavior {
                Behavior::Return {
                    score,
                    events,
                    artifact,
                } => Some((*score, events.clone(), artifact.clone())),
                Behavior::Error(detail) => return Err(InspectorError::new(detail.clone())),
                Behavior::Hang => None,
                Behavior::Panic => panic!("FakeInspector configured to panic"),
            }
        };

        match snapshot {
            Some(result) => Ok(result),
            None => loop {
                if ctx.is_cancelled() {
                    return Err(InspectorError::new("cancelled while hanging"));
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            },
        }
    }
}
