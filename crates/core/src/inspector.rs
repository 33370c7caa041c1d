// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inspector descriptors, outcomes, and anomaly events.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// An input kind an inspector declares it needs from the sampled-media
/// bundle or from an earlier inspector's derived artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectorRequirement {
    Frames,
    Audio,
    Transcript,
}

/// Static catalogue entry for one inspector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectorDescriptor {
    pub name: String,
    pub requires: HashSet<InspectorRequirement>,
    /// In `[0, 1]`. The registry does not require weights to sum to 1 across
    /// enabled inspectors.
    pub weight: f64,
    pub timeout_sec: u64,
    pub may_emit_events: HashSet<String>,
    /// Only `true` for inspectors whose failure must fail the whole job;
    /// none of the nine built-in inspectors are fatal.
    pub fatal_on_failure: bool,
}

impl InspectorDescriptor {
    /// An inspector "produces a score" iff its weight is non-zero — the
    /// `transcript` inspector has weight 0.0 and contributes no score, only
    /// a derived artifact.
    pub fn contributes_score(&self) -> bool {
        self.weight > 0.0
    }

    pub fn depends_on_transcript(&self) -> bool {
        self.name != "transcript" && self.requires.contains(&InspectorRequirement::Transcript)
    }
}

/// Tagged outcome of running one inspector.
#[derive(Debug, Clone)]
pub enum InspectorOutcome {
    Success {
        score: f64,
        events: Vec<AnomalyEvent>,
    },
    Timeout,
    Error {
        detail: String,
    },
}

impl InspectorOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InspectorOutcome::Success { .. })
    }
}

/// A timestamped anomaly attributed to one inspector. Field names on the
/// wire are abbreviated (`event`, `ts`, `dur`, `meta`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyEvent {
    pub module: String,
    #[serde(rename = "event")]
    pub event_tag: String,
    #[serde(rename = "ts")]
    pub timestamp_sec: f64,
    #[serde(rename = "dur")]
    pub duration_sec: f64,
    #[serde(rename = "meta")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl AnomalyEvent {
    pub fn new(module: impl Into<String>, event_tag: impl Into<String>, ts: f64, dur: f64) -> Self {
        Self {
            module: module.into(),
            event_tag: event_tag.into(),
            timestamp_sec: ts,
            duration_sec: dur,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Build the `inspector_failed` diagnostic event for a non-`Success`
/// outcome.
pub fn inspector_failed_event(
    module: &str,
    effective_duration_sec: f64,
    reason: impl Into<String>,
) -> AnomalyEvent {
    AnomalyEvent::new(module, "inspector_failed", 0.0, effective_duration_sec)
        .with_metadata("reason", serde_json::Value::String(reason.into()))
}

/// Read-only bag of non-score artifacts produced by earlier inspectors,
/// keyed by producer name.
#[derive(Debug, Clone, Default)]
pub struct DerivedArtifacts {
    values: HashMap<String, String>,
}

impl DerivedArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, producer: impl Into<String>, value: impl Into<String>) {
        self.values.insert(producer.into(), value.into());
    }

    /// Returns `""` for a producer that has not published yet — this is how
    /// a failed `transcript` inspector self-neutralizes dependents.
    pub fn get(&self, producer: &str) -> &str {
        self.values.get(producer).map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
#[path = "inspector_tests.rs"]
mod tests;
