//! # convoy-structs
//!
//! Data model shared by the scheduler: jobs and their task groups, the
//! allocations that bind task-group instances to nodes, cluster nodes, and
//! the evaluations and plans that move the cluster toward a job's desired
//! state.
//!
//! Everything here is a read-only snapshot for the duration of one
//! evaluation. Snapshots are shared through `Arc` so an allocation can keep
//! the exact job it was created against.

mod alloc;
mod eval;
mod job;
mod node;

pub use alloc::{AllocDesiredStatus, Allocation};
pub use eval::{Evaluation, FailedPlacement, Plan, PlanResult, TriggerReason};
pub use job::{Job, TaskGroup};
pub use node::{should_drain_node, Node, NodeStatus};
