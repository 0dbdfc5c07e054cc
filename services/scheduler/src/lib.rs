//! convoy scheduler.
//!
//! Drives one evaluation of a job: reads the job, its allocations and the
//! nodes they sit on from cluster state, reconciles them with
//! `convoy-reconcile`, and turns the result into a [`Plan`] for an external
//! planner to commit.
//!
//! Node selection and plan commit are collaborators supplied by the caller
//! through the [`Placer`] and [`Planner`] traits.
//!
//! [`Plan`]: convoy_structs::Plan

pub mod config;
pub mod generic;
pub mod nodes;
pub mod state;

pub use config::SchedulerConfig;
pub use generic::{
    GenericScheduler, Placer, Planner, PlannerError, SchedulerError, SchedulerResult,
};
pub use nodes::{ready_nodes_in_dcs, tainted_nodes};
pub use state::{MemoryState, NodeIter, State, StateError, StateResult};
