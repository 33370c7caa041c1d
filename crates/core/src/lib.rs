// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vscan-core: shared types for the video-analysis job service — job
//! records, the inspector catalogue, fusion, and the wire-stable result
//! payload. No I/O lives here; orchestration is in `vscan-engine`.

pub mod clock;
pub mod config;
pub mod error;
pub mod fusion;
pub mod id;
pub mod inspector;
pub mod job;
pub mod media;
pub mod registry;
pub mod result;
pub mod time_fmt;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, EngineConfig};
pub use error::{ErrorKind, RejectedReason, RequestError};
pub use fusion::{fuse, FusionOutcome, Label};
pub use id::{IdGen, SequentialIdGen, ShortId, UuidIdGen};
pub use inspector::{
    inspector_failed_event, AnomalyEvent, DerivedArtifacts, InspectorDescriptor,
    InspectorOutcome, InspectorRequirement,
};
pub use job::{JobId, JobPhase, JobRecord, JobStatus};
pub use media::{Frame, MediaMetadata, SampledMedia};
pub use registry::{builtin_descriptors, InspectorRegistry};
pub use result::{AnalysisResult, DerivedSummary};
pub use time_fmt::{format_elapsed, format_elapsed_ms};
