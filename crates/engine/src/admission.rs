// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission control: bounds how many jobs are accepted at all
//! (`admissionQueueCapacity`) and how many run concurrently
//! (`maxConcurrentJobs`), rejecting over-capacity submissions before a
//! [`vscan_core::JobRecord`] is ever created.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use vscan_core::RejectedReason;

/// A reserved slot in the admission queue. Holding one means the job has
/// been accepted and counted against `admissionQueueCapacity`; dropping it
/// without calling [`AdmissionScheduler::run_slot`] still frees the slot.
#[derive(Debug)]
pub struct AdmissionTicket {
    scheduler: AdmissionScheduler,
}

impl Drop for AdmissionTicket {
    fn drop(&mut self) {
        self.scheduler.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Shared admission gate for one [`crate::service::VideoAnalysisService`].
#[derive(Clone, Debug)]
pub struct AdmissionScheduler {
    run_permits: Arc<Semaphore>,
    pending: Arc<AtomicUsize>,
    queue_capacity: usize,
}

impl AdmissionScheduler {
    pub fn new(max_concurrent_jobs: usize, admission_queue_capacity: usize) -> Self {
        Self {
            run_permits: Arc::new(Semaphore::new(max_concurrent_jobs.max(1))),
            pending: Arc::new(AtomicUsize::new(0)),
            queue_capacity: admission_queue_capacity,
        }
    }

    /// Reserves a queue slot synchronously. This is the admission check a
    /// caller's `submit` must pass before a job record is created: reject,
    /// don't enqueue, when the queue is full.
    pub fn reserve(&self) -> Result<AdmissionTicket, RejectedReason> {
        loop {
            let current = self.pending.load(Ordering::SeqCst);
            if current >= self.queue_capacity {
                return Err(RejectedReason::QueueFull {
                    capacity: self.queue_capacity,
                });
            }
            if self
                .pending
                .compare_exchange(current, current + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return Ok(AdmissionTicket {
                    scheduler: self.clone(),
                });
            }
        }
    }

    /// Waits for a concurrent-execution slot (`maxConcurrentJobs`). Called
    /// once a ticket has been reserved, right before the orchestrator starts
    /// sampling.
    pub async fn run_slot(&self) -> OwnedSemaphorePermit {
        self.run_permits
            .clone()
            .acquire_owned()
            .await
            .expect("run-slot semaphore is never closed")
    }

    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "admission_tests.rs"]
mod tests;
