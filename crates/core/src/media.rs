// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The canonical sampled-media bundle consumed by every inspector.

use std::path::PathBuf;

/// One decoded video frame at a known timestamp.
///
/// `pixels` is kept opaque (a raw buffer) — the core and the orchestrator
/// never interpret frame contents; only inspectors do.
#[derive(Debug, Clone)]
pub struct Frame {
    pub timestamp_sec: f64,
    pub pixels: std::sync::Arc<[u8]>,
    pub width: u32,
    pub height: u32,
}

/// Metadata describing how a [`SampledMedia`] bundle was produced.
#[derive(Debug, Clone)]
pub struct MediaMetadata {
    pub original_duration_sec: f64,
    pub effective_duration_sec: f64,
    pub target_fps: f64,
    pub has_audio: bool,
}

/// The canonical intermediate representation produced by the Media Sampler
/// and consumed by all inspectors.
#[derive(Debug, Clone)]
pub struct SampledMedia {
    /// Strictly increasing by `timestamp_sec`.
    pub frames: Vec<Frame>,
    /// Mono, 16 kHz, little-endian PCM, truncated to `effective_duration_sec`.
    /// Lives inside the job's workspace.
    pub audio_path: PathBuf,
    pub metadata: MediaMetadata,
}

impl SampledMedia {
    pub fn original_duration_sec(&self) -> f64 {
        self.metadata.original_duration_sec
    }

    pub fn effective_duration_sec(&self) -> f64 {
        self.metadata.effective_duration_sec
    }

    pub fn target_fps(&self) -> f64 {
        self.metadata.target_fps
    }

    pub fn has_audio(&self) -> bool {
        self.metadata.has_audio
    }

    /// Checks the frame-ordering and duration invariants a `SampledMedia`
    /// bundle must hold. Used by sampler tests and as a defensive assertion
    /// before a bundle is handed to inspectors.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.metadata.effective_duration_sec > self.metadata.original_duration_sec + 1e-6 {
            return Err("effective duration exceeds original duration".into());
        }
        let mut last: Option<f64> = None;
        for frame in &self.frames {
            if let Some(prev) = last {
                if frame.timestamp_sec <= prev {
                    return Err("frame timestamps are not strictly increasing".into());
                }
            }
            last = Some(frame.timestamp_sec);
        }
        if let Some(last_ts) = last {
            let expected_end = last_ts + 1.0 / self.metadata.target_fps;
            let tolerance = 1.0 / self.metadata.target_fps;
            if (expected_end - self.metadata.effective_duration_sec).abs() > tolerance {
                return Err("effective duration inconsistent with last frame timestamp".into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "media_tests.rs"]
mod tests;
