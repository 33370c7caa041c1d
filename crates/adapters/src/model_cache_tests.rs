// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn get_or_init_returns_same_handle_for_same_name() {
    let cache = ModelCacheHandle::start(&EngineConfig::default());
    let a = cache.get_or_init("visual_clip_weights");
    let b = cache.get_or_init("visual_clip_weights");
    assert_eq!(a.label(), b.label());
    assert_eq!(cache.loaded_count(), 1);
}

#[test]
fn distinct_names_produce_distinct_handles() {
    let cache = ModelCacheHandle::start(&EngineConfig::default());
    cache.get_or_init("a");
    cache.get_or_init("b");
    assert_eq!(cache.loaded_count(), 2);
}

#[test]
fn stop_clears_all_handles() {
    let cache = ModelCacheHandle::start(&EngineConfig::default());
    cache.get_or_init("a");
    let inspectable = cache.clone();
    cache.stop();
    assert_eq!(inspectable.loaded_count(), 0);
}
