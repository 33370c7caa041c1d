// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The deterministic weighted score combiner.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Categorical verdict produced by fusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    LikelyReal,
    Uncertain,
    LikelyFake,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Label::LikelyReal => "LIKELY_REAL",
            Label::Uncertain => "UNCERTAIN",
            Label::LikelyFake => "LIKELY_FAKE",
        };
        f.write_str(s)
    }
}

impl Label {
    /// Maps confidence to a label — inclusive on the lower bound of each
    /// bucket.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.70 {
            Label::LikelyReal
        } else if confidence >= 0.40 {
            Label::Uncertain
        } else {
            Label::LikelyFake
        }
    }
}

/// Result of running the Fusion Engine over one job's score map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionOutcome {
    pub confidence: f64,
    pub label: Label,
}

/// Pure weighted-mean fusion. `scores` maps inspector name to its reported
/// `[0,1]` signal (already clamped and already on the
/// higher-is-more-synthetic convention); `weights` is keyed the same way.
/// Only names present in both maps contribute to the denominator.
pub fn fuse(scores: &HashMap<String, f64>, weights: &HashMap<String, f64>) -> FusionOutcome {
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (name, score) in scores {
        let Some(&weight) = weights.get(name) else {
            continue;
        };
        if weight <= 0.0 {
            continue;
        }
        weighted_sum += weight * score;
        weight_total += weight;
    }

    if weight_total <= 0.0 {
        return FusionOutcome {
            confidence: 0.50,
            label: Label::Uncertain,
        };
    }

    let fake_score = weighted_sum / weight_total;
    let confidence = (1.0 - fake_score).clamp(0.0, 1.0);
    FusionOutcome {
        confidence,
        label: Label::from_confidence(confidence),
    }
}

#[cfg(test)]
#[path = "fusion_tests.rs"]
mod tests;
