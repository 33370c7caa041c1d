// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn descriptor(name: &str, weight: f64, requires: &[InspectorRequirement]) -> InspectorDescriptor {
    InspectorDescriptor {
        name: name.to_string(),
        requires: requires.iter().copied().collect(),
        weight,
        timeout_sec: 5,
        may_emit_events: HashSet::new(),
        fatal_on_failure: false,
    }
}

#[test]
fn zero_weight_inspector_does_not_contribute_score() {
    let transcript = descriptor("transcript", 0.0, &[InspectorRequirement::Audio]);
    assert!(!transcript.contributes_score());
}

#[test]
fn weighted_inspector_contributes_score() {
    let blink = descriptor("blink", 0.1, &[InspectorRequirement::Frames]);
    assert!(blink.contributes_score());
}

#[test]
fn depends_on_transcript_excludes_transcript_itself() {
    let transcript = descriptor("transcript", 0.0, &[InspectorRequirement::Transcript]);
    assert!(!transcript.depends_on_transcript());

    let ocr = descriptor(
        "ocr_gibberish",
        0.1,
        &[InspectorRequirement::Frames, InspectorRequirement::Transcript],
    );
    assert!(ocr.depends_on_transcript());
}

#[test]
fn outcome_is_success_only_for_success_variant() {
    assert!(InspectorOutcome::Success {
        score: 0.5,
        events: Vec::new(),
    }
    .is_success());
    assert!(!InspectorOutcome::Timeout.is_success());
    assert!(!InspectorOutcome::Error {
        detail: "boom".into()
    }
    .is_success());
}

#[test]
fn inspector_failed_event_carries_reason_metadata() {
    let event = inspector_failed_event("blink", 12.5, "timeout");
    assert_eq!(event.module, "blink");
    assert_eq!(event.event_tag, "inspector_failed");
    assert_eq!(event.duration_sec, 12.5);
    assert_eq!(
        event.metadata.get("reason"),
        Some(&serde_json::Value::String("timeout".into()))
    );
}

#[test]
fn derived_artifacts_returns_empty_string_for_missing_producer() {
    let artifacts = DerivedArtifacts::new();
    assert_eq!(artifacts.get("transcript"), "");
}

#[test]
fn derived_artifacts_round_trips_inserted_value() {
    let mut artifacts = DerivedArtifacts::new();
    artifacts.insert("transcript", "hello world");
    assert_eq!(artifacts.get("transcript"), "hello world");
}
