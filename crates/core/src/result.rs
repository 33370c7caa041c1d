// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The wire-stable result payload returned from `resultOf`.

use crate::fusion::Label;
use crate::inspector::AnomalyEvent;
use crate::job::JobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn processed_at_iso8601<S>(epoch_ms: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let dt = DateTime::<Utc>::from_timestamp_millis(*epoch_ms as i64).unwrap_or_else(Utc::now);
    serializer.serialize_str(&dt.to_rfc3339())
}

fn processed_at_from_iso8601<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.timestamp_millis() as u64)
        .map_err(serde::de::Error::custom)
}

/// Non-score artifacts folded into the result payload's `derived` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSummary {
    pub visual_score: f64,
    #[serde(rename = "videoLength")]
    pub video_length_sec: f64,
    #[serde(rename = "originalVideoLength")]
    pub original_video_length_sec: f64,
    pub transcript_snippet: String,
    pub processing_time_sec: f64,
    pub pipeline_version: String,
}

/// The complete analysis result for one completed job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub job_id: JobId,
    pub label: Label,
    pub confidence: f64,
    /// Sorted by name for stable serialization; a `BTreeMap` keeps this
    /// deterministic without a separate sort step.
    pub per_inspector_scores: BTreeMap<String, f64>,
    /// Ordered by `(timestampSec ascending, module ascending, tag
    /// ascending)`.
    pub events: Vec<AnomalyEvent>,
    pub derived: DerivedSummary,
    #[serde(
        rename = "processedAt",
        serialize_with = "processed_at_iso8601",
        deserialize_with = "processed_at_from_iso8601"
    )]
    pub processed_at_ms: u64,
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
