// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the inspector contract and the reference
//! inspector backend that implements it.

pub mod inspector;
pub mod model_cache;

pub use inspector::{Inspector, InspectorContext, InspectorError};
pub use model_cache::{ModelCacheHandle, ModelHandle};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use inspector::{FakeInspector, InspectorCall};
