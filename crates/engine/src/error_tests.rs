// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vscan_core::ErrorKind;

#[test]
fn sampling_error_maps_to_sampling_error_kind() {
    let err = OrchestratorError::Sampling(SamplingError::ZeroFrames);
    assert_eq!(err.kind(), ErrorKind::SamplingError);
}

#[test]
fn inspector_fatal_maps_to_inspector_fatal_kind() {
    let err = OrchestratorError::InspectorFatal {
        name: "sample_stage".into(),
        detail: "boom".into(),
    };
    assert_eq!(err.kind(), ErrorKind::InspectorFatal);
}

#[test]
fn cancelled_maps_to_cancelled_kind() {
    assert_eq!(OrchestratorError::Cancelled.kind(), ErrorKind::Cancelled);
}

#[test]
fn workspace_failure_maps_to_workspace_error_kind() {
    let err = OrchestratorError::Workspace(WorkspaceError::Create {
        path: "/tmp/x".into(),
        source: std::io::Error::other("disk full"),
    });
    assert_eq!(err.kind(), ErrorKind::WorkspaceError);
}
