// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide handle lifecycle for the expensive resources an inspector
//! may hold — model weights, network clients. The reference inspectors in
//! [`crate::inspector::reference`] don't hold any such handle today; this
//! exists so a real inspector backend has somewhere to acquire one without
//! threading process-global state through the orchestrator.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use vscan_core::EngineConfig;

/// An opaque, cloneable handle to a lazily-initialized process-wide
/// resource. Its own internal synchronization is its responsibility — the
/// engine never serializes access across jobs.
#[derive(Clone)]
pub struct ModelHandle(Arc<str>);

impl ModelHandle {
    pub fn label(&self) -> &str {
        &self.0
    }
}

/// Holds every model handle acquired so far, keyed by name. Acquired at
/// process start per `start`, or lazily on first `get_or_init`.
#[derive(Clone)]
pub struct ModelCacheHandle {
    handles: Arc<RwLock<HashMap<String, ModelHandle>>>,
}

impl ModelCacheHandle {
    /// Eagerly initializes nothing — the reference backend has no real
    /// model weights to load — but is the hook a production backend would
    /// extend to warm its caches from `config` at process start.
    pub fn start(_config: &EngineConfig) -> Self {
        Self {
            handles: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn get_or_init(&self, name: &str) -> ModelHandle {
        if let Some(handle) = self.handles.read().get(name) {
            return handle.clone();
        }
        let mut handles = self.handles.write();
        handles
            .entry(name.to_string())
            .or_insert_with(|| ModelHandle(Arc::from(name)))
            .clone()
    }

    pub fn loaded_count(&self) -> usize {
        self.handles.read().len()
    }

    /// Releases every handle. Errors from an individual backend's teardown
    /// are its own responsibility to log; this never fails.
    pub fn stop(self) {
        self.handles.write().clear();
    }
}

#[cfg(test)]
#[path = "model_cache_tests.rs"]
mod tests;
