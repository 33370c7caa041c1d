// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job Store: the single source of truth for job records and their terminal
//! results, with the write-before-flip visibility rule enforced by
//! [`vscan_core::JobRecord`] itself — the store only needs to publish a
//! whole record atomically.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use vscan_core::{AnalysisResult, JobId, JobRecord};

#[derive(Debug, Error)]
#[error("job {0} already exists")]
pub struct DuplicateJobError(pub JobId);

/// In-process job ledger. Reads never block writers of *other* jobs and
/// vice versa — `RwLock` over the whole map is coarse but the workload
/// (a `maxConcurrentJobs` default of 2) never makes it a bottleneck.
#[derive(Default)]
pub struct JobStore {
    records: RwLock<HashMap<JobId, JobRecord>>,
    results: RwLock<HashMap<JobId, Arc<AnalysisResult>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: JobRecord) -> Result<(), DuplicateJobError> {
        let mut records = self.records.write();
        if records.contains_key(&record.id) {
            return Err(DuplicateJobError(record.id));
        }
        records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Applies `mutate` to the stored record under the write lock, so a
    /// caller's multi-field transition (e.g. [`JobRecord::complete`]) is
    /// published as one atomic snapshot to readers.
    pub fn update(&self, id: &JobId, mutate: impl FnOnce(&mut JobRecord)) -> bool {
        let mut records = self.records.write();
        match records.get_mut(id) {
            Some(record) => {
                mutate(record);
                true
            }
            None => false,
        }
    }

    pub fn read(&self, id: &JobId) -> Option<JobRecord> {
        self.records.read().get(id).cloned()
    }

    pub fn put_result(&self, id: JobId, result: AnalysisResult) {
        self.results.write().insert(id, Arc::new(result));
    }

    pub fn read_result(&self, id: &JobId) -> Option<Arc<AnalysisResult>> {
        self.results.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
