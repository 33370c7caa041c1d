// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic reference inspectors. Each stands in for the real ML/
//! heuristic backend the system's inspector contract treats as an external
//! black box — good enough to drive the orchestrator end-to-end and to give
//! the daemon's demo loop something real to run.

use super::{Inspector, InspectorContext, InspectorError};
use async_trait::async_trait;
use vscan_core::{AnomalyEvent, DerivedArtifacts, SampledMedia};

fn mean_luma(bundle: &SampledMedia) -> f64 {
    if bundle.frames.is_empty() {
        return 0.0;
    }
    let mut total = 0u64;
    let mut count = 0u64;
    for frame in &bundle.frames {
        for &byte in frame.pixels.iter() {
            total += byte as u64;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64 / 255.0
    }
}

fn frame_to_frame_delta(bundle: &SampledMedia) -> f64 {
    if bundle.frames.len() < 2 {
        return 0.0;
    }
    let mut deltas = Vec::with_capacity(bundle.frames.len() - 1);
    for pair in bundle.frames.windows(2) {
        let a = &pair[0].pixels;
        let b = &pair[1].pixels;
        let n = a.len().min(b.len());
        if n == 0 {
            deltas.push(0.0);
            continue;
        }
        let sum: i64 = a[..n]
            .iter()
            .zip(&b[..n])
            .map(|(x, y)| (*x as i64 - *y as i64).abs())
            .sum();
        deltas.push(sum as f64 / n as f64 / 255.0);
    }
    deltas.iter().sum::<f64>() / deltas.len() as f64
}

/// `visual_clip` (requires frames, weight 0.20). Scores on overall
/// brightness uniformity as a crude generative-artifact proxy.
pub struct VisualClipInspector;

#[async_trait]
impl Inspector for VisualClipInspector {
    fn name(&self) -> &str {
        "visual_clip"
    }

    async fn run(
        &self,
        _ctx: &InspectorContext,
        bundle: &SampledMedia,
        _derived: &DerivedArtifacts,
    ) -> Result<(f64, Vec<AnomalyEvent>, Option<String>), InspectorError> {
        Ok((mean_luma(bundle).clamp(0.0, 1.0), Vec::new(), None))
    }
}

/// `visual_artifacts` (requires frames, weight 0.15). Flags frames whose
/// delta from the previous frame spikes well above the clip's average.
pub struct VisualArtifactsInspector;

#[async_trait]
impl Inspector for VisualArtifactsInspector {
    fn name(&self) -> &str {
        "visual_artifacts"
    }

    async fn run(
        &self,
        _ctx: &InspectorContext,
        bundle: &SampledMedia,
        _derived: &DerivedArtifacts,
    ) -> Result<(f64, Vec<AnomalyEvent>, Option<String>), InspectorError> {
        let avg = frame_to_frame_delta(bundle);
        let mut events = Vec::new();
        for pair in bundle.frames.windows(2) {
            let a = &pair[0].pixels;
            let b = &pair[1].pixels;
            let n = a.len().min(b.len());
            if n == 0 {
                continue;
            }
            let sum: i64 = a[..n]
                .iter()
                .zip(&b[..n])
                .map(|(x, y)| (*x as i64 - *y as i64).abs())
                .sum();
            let delta = sum as f64 / n as f64 / 255.0;
            if delta > avg * 3.0 + 0.05 {
                events.push(AnomalyEvent::new(
                    "visual_artifacts",
                    "visual_artifact",
                    pair[1].timestamp_sec,
                    0.0,
                ));
            }
        }
        Ok((avg.clamp(0.0, 1.0), events, None))
    }
}

/// `lipsync` (requires frames, audio, transcript, weight 0.15). Consumes
/// the `transcript` artifact; an empty transcript neutralizes the score at
/// 0.5 rather than failing.
pub struct LipsyncInspector;

#[async_trait]
impl Inspector for LipsyncInspector {
    fn name(&self) -> &str {
        "lipsync"
    }

    async fn run(
        &self,
        _ctx: &InspectorContext,
        bundle: &SampledMedia,
        derived: &DerivedArtifacts,
    ) -> Result<(f64, Vec<AnomalyEvent>, Option<String>), InspectorError> {
        let transcript = derived.get("transcript");
        if transcript.is_empty() {
            return Ok((0.5, Vec::new(), None));
        }
        let score = (frame_to_frame_delta(bundle) * 0.5).clamp(0.0, 1.0);
        Ok((score, Vec::new(), None))
    }
}

/// `blink` (requires frames, weight 0.10).
pub struct BlinkInspector;

#[async_trait]
impl Inspector for BlinkInspector {
    fn name(&self) -> &str {
        "blink"
    }

    async fn run(
        &self,
        _ctx: &InspectorContext,
        bundle: &SampledMedia,
        _derived: &DerivedArtifacts,
    ) -> Result<(f64, Vec<AnomalyEvent>, Option<String>), InspectorError> {
        let score = (1.0 - mean_luma(bundle)).clamp(0.0, 1.0) * 0.3;
        Ok((score, Vec::new(), None))
    }
}

/// `ocr_gibberish` (requires frames, weight 0.05).
pub struct OcrGibberishInspector;

#[async_trait]
impl Inspector for OcrGibberishInspector {
    fn name(&self) -> &str {
        "ocr_gibberish"
    }

    async fn run(
        &self,
        _ctx: &InspectorContext,
        _bundle: &SampledMedia,
        _derived: &DerivedArtifacts,
    ) -> Result<(f64, Vec<AnomalyEvent>, Option<String>), InspectorError> {
        Ok((0.0, Vec::new(), None))
    }
}

/// `motion_flow` (requires frames, weight 0.10).
pub struct MotionFlowInspector;

#[async_trait]
impl Inspector for MotionFlowInspector {
    fn name(&self) -> &str {
        "motion_flow"
    }

    async fn run(
        &self,
        _ctx: &InspectorContext,
        bundle: &SampledMedia,
        _derived: &DerivedArtifacts,
    ) -> Result<(f64, Vec<AnomalyEvent>, Option<String>), InspectorError> {
        let avg = frame_to_frame_delta(bundle);
        let mut events = Vec::new();
        if let Some(last) = bundle.frames.last() {
            if avg > 0.3 {
                events.push(AnomalyEvent::new(
                    "motion_flow",
                    "flow_spike",
                    last.timestamp_sec,
                    0.0,
                ));
            }
        }
        Ok((avg.clamp(0.0, 1.0), events, None))
    }
}

/// `audio_loop` (requires audio, weight 0.05). Flags a suspiciously short
/// audio track relative to the clip's effective duration.
pub struct AudioLoopInspector;

#[async_trait]
impl Inspector for AudioLoopInspector {
    fn name(&self) -> &str {
        "audio_loop"
    }

    async fn run(
        &self,
        _ctx: &InspectorContext,
        bundle: &SampledMedia,
        _derived: &DerivedArtifacts,
    ) -> Result<(f64, Vec<AnomalyEvent>, Option<String>), InspectorError> {
        if !bundle.has_audio() {
            return Ok((0.0, Vec::new(), None));
        }
        let size = tokio::fs::metadata(&bundle.audio_path)
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        let expected_bytes = (bundle.effective_duration_sec() * 16_000.0 * 2.0) as u64;
        if expected_bytes == 0 {
            return Ok((0.0, Vec::new(), None));
        }
        let ratio = size as f64 / expected_bytes as f64;
        let score = (1.0 - ratio).clamp(0.0, 1.0);
        Ok((score, Vec::new(), None))
    }
}

/// `lighting` (requires frames, weight 0.05).
pub struct LightingInspector;

#[async_trait]
impl Inspector for LightingInspector {
    fn name(&self) -> &str {
        "lighting"
    }

    async fn run(
        &self,
        _ctx: &InspectorContext,
        bundle: &SampledMedia,
        _derived: &DerivedArtifacts,
    ) -> Result<(f64, Vec<AnomalyEvent>, Option<String>), InspectorError> {
        Ok((frame_to_frame_delta(bundle).clamp(0.0, 1.0) * 0.2, Vec::new(), None))
    }
}

/// `transcript` (requires audio, weight 0.00). Contributes no score, only
/// the `transcript` derived artifact that `lipsync` reads.
pub struct TranscriptInspector;

#[async_trait]
impl Inspector for TranscriptInspector {
    fn name(&self) -> &str {
        "transcript"
    }

    async fn run(
        &self,
        _ctx: &InspectorContext,
        _bundle: &SampledMedia,
        _derived: &DerivedArtifacts,
    ) -> Result<(f64, Vec<AnomalyEvent>, Option<String>), InspectorError> {
        Ok((0.0, Vec::new(), Some(String::new())))
    }
}

/// The nine reference inspectors, in registry order.
pub fn builtin_inspectors() -> Vec<Box<dyn Inspector>> {
    vec![
        Box::new(VisualClipInspector),
        Box::new(VisualArtifactsInspector),
        Box::new(LipsyncInspector),
        Box::new(BlinkInspector),
        Box::new(OcrGibberishInspector),
        Box::new(MotionFlowInspector),
        Box::new(AudioLoopInspector),
        Box::new(LightingInspector),
        Box::new(TranscriptInspector),
    ]
}

#[cfg(test)]
#[path = "reference_tests.rs"]
mod tests;
