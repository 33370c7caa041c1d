// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event Aggregator: merges every inspector's raw event list into the
//! single ordered, deduplicated, duration-clamped list that ships in
//! [`vscan_core::AnalysisResult`].

use std::collections::HashMap;
use vscan_core::AnomalyEvent;

/// Rounds to the nearest 0.01s — the dedup key's time granularity.
fn round_cs(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

#[derive(Hash, PartialEq, Eq)]
struct DedupKey {
    module: String,
    event_tag: String,
    ts_cs: i64,
    dur_cs: i64,
}

fn key_for(event: &AnomalyEvent) -> DedupKey {
    DedupKey {
        module: event.module.clone(),
        event_tag: event.event_tag.clone(),
        ts_cs: round_cs(event.timestamp_sec),
        dur_cs: round_cs(event.duration_sec),
    }
}

/// Merges the raw per-inspector event lists into the final ordered set via
/// a three-step pass: clamp, dedup-with-merge, sort.
pub fn aggregate(raw: Vec<AnomalyEvent>, effective_duration_sec: f64) -> Vec<AnomalyEvent> {
    let mut merged: HashMap<DedupKey, AnomalyEvent> = HashMap::new();
    let mut order: Vec<DedupKey> = Vec::new();

    for mut event in raw {
        clamp_to_duration(&mut event, effective_duration_sec);
        let key = key_for(&event);
        match merged.get_mut(&key) {
            Some(existing) => {
                for (k, v) in event.metadata {
                    existing.metadata.insert(k, v);
                }
            }
            None => {
                order.push(key_for(&event));
                merged.insert(key_for(&event), event);
            }
        }
    }

    let mut events: Vec<AnomalyEvent> = order
        .into_iter()
        .filter_map(|key| merged.remove(&key))
        .collect();

    events.sort_by(|a, b| {
        a.timestamp_sec
            .partial_cmp(&b.timestamp_sec)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.module.cmp(&b.module))
            .then_with(|| a.event_tag.cmp(&b.event_tag))
    });

    events
}

fn clamp_to_duration(event: &mut AnomalyEvent, effective_duration_sec: f64) {
    let end = event.timestamp_sec + event.duration_sec;
    if end > effective_duration_sec {
        event.duration_sec = (effective_duration_sec - event.timestamp_sec).max(0.0);
        event
            .metadata
            .insert("clamped".to_string(), serde_json::Value::Bool(true));
    }
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
