//! Reconciliation primitives.
//!
//! This library computes what has to change for a job's allocations to
//! converge on the job's desired state. Key concepts:
//!
//! - **Required**: the instance names a job asks for, produced by
//!   [`materialize_task_groups`].
//! - **Existing**: the allocations currently bound to nodes.
//! - **Diff**: the classification of required ∪ existing into place,
//!   update, migrate, evict and ignore, produced by [`diff_allocs`].
//!
//! # Invariants
//!
//! - Every name in required ∪ existing lands in exactly one diff set
//! - Decisions are deterministic given the same inputs (as sets, not order)
//! - Nothing here performs I/O or mutates its inputs

mod diff;
mod materialize;
mod retry;

pub use diff::{diff_allocs, AllocAction, AllocTuple, DiffResult};
pub use materialize::{alloc_name, materialize_task_groups};
pub use retry::{retry_max, MaxAttemptsReached};
