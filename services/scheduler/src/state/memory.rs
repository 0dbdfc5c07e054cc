//! In-memory cluster state.
//!
//! Holds nodes, jobs and allocations behind a single lock. Readers clone
//! `Arc` snapshots out of the lock, so nothing returned to a caller keeps
//! the lock held.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use convoy_id::{AllocId, Index, NodeId};
use convoy_structs::{Allocation, Job, Node, NodeStatus};
use tracing::debug;

use super::{NodeIter, State, StateError, StateResult};

#[derive(Debug, Default)]
struct Inner {
    index: Index,
    unavailable: bool,
    nodes: HashMap<NodeId, Arc<Node>>,
    jobs: HashMap<String, Arc<Job>>,
    allocs: HashMap<AllocId, Arc<Allocation>>,
}

impl Inner {
    fn bump(&mut self) -> Index {
        self.index = self.index.next();
        self.index
    }

    fn check_available(&self) -> StateResult<()> {
        if self.unavailable {
            return Err(StateError::Unavailable("memory state marked unavailable".to_string()));
        }
        Ok(())
    }
}

/// Cluster state kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryState {
    inner: RwLock<Inner>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Index of the most recent write.
    pub fn latest_index(&self) -> Index {
        self.read().index
    }

    /// Make every subsequent read fail, or recover from that.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.write().unavailable = unavailable;
    }

    pub fn upsert_node(&self, node: Node) -> Arc<Node> {
        let mut inner = self.write();
        let index = inner.bump();
        let node = Arc::new(node);
        debug!(node_id = %node.id, status = %node.status, %index, "Upserted node");
        inner.nodes.insert(node.id, Arc::clone(&node));
        node
    }

    /// Change a node's status, returning false if the node is unknown.
    pub fn update_node_status(&self, id: &NodeId, status: NodeStatus) -> bool {
        let mut inner = self.write();
        let Some(existing) = inner.nodes.get(id) else {
            return false;
        };
        let mut node = (**existing).clone();
        node.status = status;
        inner.bump();
        inner.nodes.insert(*id, Arc::new(node));
        true
    }

    pub fn delete_node(&self, id: &NodeId) -> Option<Arc<Node>> {
        let mut inner = self.write();
        inner.bump();
        inner.nodes.remove(id)
    }

    /// Store a job, stamping it with the next index.
    pub fn upsert_job(&self, mut job: Job) -> Arc<Job> {
        let mut inner = self.write();
        job.modify_index = inner.bump();
        let job = Arc::new(job);
        debug!(job = %job.name, modify_index = %job.modify_index, "Upserted job");
        inner.jobs.insert(job.name.clone(), Arc::clone(&job));
        job
    }

    pub fn delete_job(&self, name: &str) -> Option<Arc<Job>> {
        let mut inner = self.write();
        inner.bump();
        inner.jobs.remove(name)
    }

    pub fn upsert_alloc(&self, alloc: Allocation) -> Arc<Allocation> {
        let mut inner = self.write();
        inner.bump();
        let alloc = Arc::new(alloc);
        inner.allocs.insert(alloc.id, Arc::clone(&alloc));
        alloc
    }
}

impl State for MemoryState {
    fn nodes_by_datacenter_status(
        &self,
        datacenter: &str,
        status: NodeStatus,
    ) -> StateResult<NodeIter<'_>> {
        let inner = self.read();
        inner.check_available()?;

        let mut nodes: Vec<Arc<Node>> = inner
            .nodes
            .values()
            .filter(|n| n.datacenter == datacenter && n.status == status)
            .cloned()
            .collect();
        nodes.sort_by_key(|n| n.id);

        Ok(Box::new(nodes.into_iter()))
    }

    fn node_by_id(&self, id: &NodeId) -> StateResult<Option<Arc<Node>>> {
        let inner = self.read();
        inner.check_available()?;
        Ok(inner.nodes.get(id).cloned())
    }

    fn job_by_name(&self, name: &str) -> StateResult<Option<Arc<Job>>> {
        let inner = self.read();
        inner.check_available()?;
        Ok(inner.jobs.get(name).cloned())
    }

    fn allocs_by_job(&self, job: &str) -> StateResult<Vec<Arc<Allocation>>> {
        let inner = self.read();
        inner.check_available()?;
        Ok(inner
            .allocs
            .values()
            .filter(|a| a.job.name == job)
            .cloned()
            .collect())
    }
}
