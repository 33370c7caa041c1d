// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static inspector catalogue.

use crate::inspector::{InspectorDescriptor, InspectorRequirement};
use std::collections::HashSet;

fn reqs(kinds: &[InspectorRequirement]) -> HashSet<InspectorRequirement> {
    kinds.iter().copied().collect()
}

fn tags(names: &[&str]) -> HashSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// The frozen, built-in set of nine inspectors. Order is fixed; callers that
/// need a deterministic iteration order should rely on this slice rather
/// than re-sorting by name.
pub fn builtin_descriptors() -> Vec<InspectorDescriptor> {
    use InspectorRequirement::{Audio, Frames, Transcript};

    vec![
        InspectorDescriptor {
            name: "visual_clip".into(),
            requires: reqs(&[Frames]),
            weight: 0.20,
            timeout_sec: 60,
            may_emit_events: tags(&[]),
            fatal_on_failure: false,
        },
        InspectorDescriptor {
            name: "visual_artifacts".into(),
            requires: reqs(&[Frames]),
            weight: 0.15,
            timeout_sec: 120,
            may_emit_events: tags(&["visual_artifact"]),
            fatal_on_failure: false,
        },
        InspectorDescriptor {
            name: "lipsync".into(),
            requires: reqs(&[Frames, Audio, Transcript]),
            weight: 0.15,
            timeout_sec: 120,
            may_emit_events: tags(&["lipsync_mismatch"]),
            fatal_on_failure: false,
        },
        InspectorDescriptor {
            name: "blink".into(),
            requires: reqs(&[Frames]),
            weight: 0.10,
            timeout_sec: 90,
            may_emit_events: tags(&["abnormal_blink"]),
            fatal_on_failure: false,
        },
        InspectorDescriptor {
            name: "ocr_gibberish".into(),
            requires: reqs(&[Frames]),
            weight: 0.05,
            timeout_sec: 60,
            may_emit_events: tags(&["gibberish_text"]),
            fatal_on_failure: false,
        },
        InspectorDescriptor {
            name: "motion_flow".into(),
            requires: reqs(&[Frames]),
            weight: 0.10,
            timeout_sec: 60,
            may_emit_events: tags(&["flow_spike"]),
            fatal_on_failure: false,
        },
        InspectorDescriptor {
            name: "audio_loop".into(),
            requires: reqs(&[Audio]),
            weight: 0.05,
            timeout_sec: 30,
            may_emit_events: tags(&["audio_loop"]),
            fatal_on_failure: false,
        },
        InspectorDescriptor {
            name: "lighting".into(),
            requires: reqs(&[Frames]),
            weight: 0.05,
            timeout_sec: 30,
            may_emit_events: tags(&["light_change"]),
            fatal_on_failure: false,
        },
        InspectorDescriptor {
            name: "transcript".into(),
            requires: reqs(&[Audio]),
            weight: 0.00,
            timeout_sec: 60,
            may_emit_events: tags(&[]),
            fatal_on_failure: false,
        },
    ]
}

/// An inspector-name lookup over a registry's descriptors.
pub struct InspectorRegistry {
    descriptors: Vec<InspectorDescriptor>,
}

impl InspectorRegistry {
    pub fn new(descriptors: Vec<InspectorDescriptor>) -> Self {
        Self { descriptors }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_descriptors())
    }

    pub fn descriptors(&self) -> &[InspectorDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, name: &str) -> Option<&InspectorDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Inspectors with `requires` containing `Transcript`, excluding the
    /// `transcript` inspector itself — the dependent set that must wait for
    /// `transcript` to publish.
    pub fn transcript_dependents(&self) -> Vec<&InspectorDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| d.depends_on_transcript())
            .collect()
    }

    pub fn independent_inspectors(&self) -> Vec<&InspectorDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| d.name != "transcript" && !d.depends_on_transcript())
            .collect()
    }

    pub fn transcript_inspector(&self) -> Option<&InspectorDescriptor> {
        self.get("transcript")
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
