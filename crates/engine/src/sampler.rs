// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Media Sampler: converts an uploaded file into a [`SampledMedia`] bundle.
//! The real backend shells out to `ffprobe`/`ffmpeg`; [`FakeSampler`] stands
//! in for tests.

use crate::error::SamplingError;
use crate::workspace::WorkspaceHandle;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use vscan_core::{Frame, MediaMetadata, SampledMedia};

#[async_trait]
pub trait MediaSampler: Send + Sync + 'static {
    async fn sample(
        &self,
        input_path: &Path,
        workspace: &WorkspaceHandle,
        target_fps: f64,
        max_duration_sec: f64,
    ) -> Result<SampledMedia, SamplingError>;
}

/// Shells out to `ffprobe` for duration and `ffmpeg` for frame/audio
/// extraction.
pub struct FfmpegSampler {
    ffprobe_path: String,
    ffmpeg_path: String,
}

impl Default for FfmpegSampler {
    fn default() -> Self {
        Self {
            ffprobe_path: "ffprobe".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }
}

impl FfmpegSampler {
    pub fn new(ffprobe_path: impl Into<String>, ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    async fn probe_duration_sec(&self, input_path: &Path) -> Result<f64, SamplingError> {
        let output = tokio::process::Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=nw=1:nk=1",
            ])
            .arg(input_path)
            .output()
            .await
            .map_err(|e| SamplingError::Unprobeable(e.to_string()))?;

        if !output.status.success() {
            return Err(SamplingError::Unprobeable(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .ok_or_else(|| SamplingError::Unprobeable("no duration in ffprobe output".into()))
    }

    async fn probe_has_audio(&self, input_path: &Path) -> bool {
        let output = tokio::process::Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-select_streams",
                "a",
                "-show_entries",
                "stream=index",
                "-of",
                "csv=p=0",
            ])
            .arg(input_path)
            .output()
            .await;
        matches!(output, Ok(o) if o.status.success() && !o.stdout.is_empty())
    }
}

#[async_trait]
impl MediaSampler for FfmpegSampler {
    async fn sample(
        &self,
        input_path: &Path,
        workspace: &WorkspaceHandle,
        target_fps: f64,
        max_duration_sec: f64,
    ) -> Result<SampledMedia, SamplingError> {
        let original_duration_sec = self.probe_duration_sec(input_path).await?;
        let effective_duration_sec = original_duration_sec.min(max_duration_sec);
        let has_audio = self.probe_has_audio(input_path).await;

        let frame_count = (effective_duration_sec * target_fps).floor() as usize;
        if frame_count == 0 {
            return Err(SamplingError::ZeroFrames);
        }

        let frame_glob = workspace.path().join("frame-%06d.rgb");
        let status = tokio::process::Command::new(&self.ffmpeg_path)
            .args(["-y", "-i"])
            .arg(input_path)
            .args([
                "-t",
                &format!("{effective_duration_sec}"),
                "-vf",
                &format!("fps={target_fps}"),
                "-pix_fmt",
                "gray",
                "-f",
                "image2",
            ])
            .arg(&frame_glob)
            .status()
            .await
            .map_err(|e| SamplingError::Unprobeable(e.to_string()))?;
        if !status.success() {
            return Err(SamplingError::Unprobeable(
                "ffmpeg frame extraction failed".into(),
            ));
        }

        let audio_path = workspace.audio_path();
        if has_audio {
            let status = tokio::process::Command::new(&self.ffmpeg_path)
                .args(["-y", "-i"])
                .arg(input_path)
                .args([
                    "-t",
                    &format!("{effective_duration_sec}"),
                    "-ac",
                    "1",
                    "-ar",
                    "16000",
                    "-f",
                    "s16le",
                ])
                .arg(&audio_path)
                .status()
                .await
                .map_err(|e| SamplingError::Unprobeable(e.to_string()))?;
            if !status.success() {
                return Err(SamplingError::Unprobeable(
                    "ffmpeg audio extraction failed".into(),
                ));
            }
        } else {
            tokio::fs::write(&audio_path, [])
                .await
                .map_err(|e| crate::error::WorkspaceError::Create {
                    path: audio_path.clone(),
                    source: e,
                })?;
        }

        let mut frames = Vec::with_capacity(frame_count);
        for i in 0..frame_count {
            let frame_path = workspace.path().join(format!("frame-{:06}.rgb", i + 1));
            let pixels = tokio::fs::read(&frame_path).await.unwrap_or_default();
            frames.push(Frame {
                timestamp_sec: i as f64 / target_fps,
                pixels: Arc::from(pixels),
                width: 0,
                height: 0,
            });
        }

        Ok(SampledMedia {
            frames,
            audio_path,
            metadata: MediaMetadata {
                original_duration_sec,
                effective_duration_sec,
                target_fps,
                has_audio,
            },
        })
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSampler;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc as StdArc;

    enum Behavior {
        Return(SampledMedia),
        Fail(SamplingError),
    }

    /// Deterministic, fully controllable [`MediaSampler`] for tests.
    pub struct FakeSampler {
        behavior: Mutex<Option<Behavior>>,
    }

    impl FakeSampler {
        pub fn returning(media: SampledMedia) -> Self {
            Self {
                behavior: Mutex::new(Some(Behavior::Return(media))),
            }
        }

        pub fn failing(err: SamplingError) -> Self {
            Self {
                behavior: Mutex::new(Some(Behavior::Fail(err))),
            }
        }

        /// A short bundle with `frame_count` frames at `fps`, no audio
        /// content but `has_audio = true`, useful for happy-path tests.
        pub fn short_bundle(frame_count: usize, fps: f64) -> SampledMedia {
            let frames = (0..frame_count)
                .map(|i| Frame {
                    timestamp_sec: i as f64 / fps,
                    pixels: StdArc::from(vec![128u8; 16]),
                    width: 4,
                    height: 4,
                })
                .collect();
            let effective = frame_count as f64 / fps;
            SampledMedia {
                frames,
                audio_path: std::path::PathBuf::from("/dev/null"),
                metadata: MediaMetadata {
                    original_duration_sec: effective,
                    effective_duration_sec: effective,
                    target_fps: fps,
                    has_audio: true,
                },
            }
        }
    }

    #[async_trait]
    impl MediaSampler for FakeSampler {
        async fn sample(
            &self,
            _input_path: &Path,
            _workspace: &WorkspaceHandle,
            _target_fps: f64,
            _max_duration_sec: f64,
        ) -> Result<SampledMedia, SamplingError> {
            match self.behavior.lock().take() {
                Some(Behavior::Return(media)) => Ok(media),
                Some(Behavior::Fail(err)) => Err(err),
                None => Err(SamplingError::ZeroFrames),
            }
        }
    }
}

#[cfg(test)]
#[path = "sampler_tests.rs"]
mod tests;
