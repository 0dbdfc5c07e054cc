//! Cluster state as seen by the scheduler.
//!
//! The scheduler only ever reads state. Reads are blocking and may fail when
//! the backing store is unavailable; such failures abort the evaluation and
//! are never retried here.

mod memory;

use std::sync::Arc;

use convoy_id::NodeId;
use convoy_structs::{Allocation, Job, Node, NodeStatus};
use thiserror::Error;

pub use memory::MemoryState;

/// Result type for state reads.
pub type StateResult<T> = Result<T, StateError>;

/// Errors from the cluster-state backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("state store unavailable: {0}")]
    Unavailable(String),
}

/// A finite node sequence. Each call to
/// [`State::nodes_by_datacenter_status`] starts a fresh one.
pub type NodeIter<'a> = Box<dyn Iterator<Item = Arc<Node>> + 'a>;

/// Read access to cluster state.
pub trait State {
    /// Nodes in `datacenter` whose status is `status`.
    fn nodes_by_datacenter_status(
        &self,
        datacenter: &str,
        status: NodeStatus,
    ) -> StateResult<NodeIter<'_>>;

    /// Look up a node. `Ok(None)` means the node has been deregistered.
    fn node_by_id(&self, id: &NodeId) -> StateResult<Option<Arc<Node>>>;

    fn job_by_name(&self, name: &str) -> StateResult<Option<Arc<Job>>>;

    /// Every allocation of the job, including stopped ones.
    fn allocs_by_job(&self, job: &str) -> StateResult<Vec<Arc<Allocation>>>;
}

impl<T: State + ?Sized> State for Arc<T> {
    fn nodes_by_datacenter_status(
        &self,
        datacenter: &str,
        status: NodeStatus,
    ) -> StateResult<NodeIter<'_>> {
        (**self).nodes_by_datacenter_status(datacenter, status)
    }

    fn node_by_id(&self, id: &NodeId) -> StateResult<Option<Arc<Node>>> {
        (**self).node_by_id(id)
    }

    fn job_by_name(&self, name: &str) -> StateResult<Option<Arc<Job>>> {
        (**self).job_by_name(name)
    }

    fn allocs_by_job(&self, job: &str) -> StateResult<Vec<Arc<Allocation>>> {
        (**self).allocs_by_job(job)
    }
}
