//! Node health lookups feeding the reconciler and placement.

use std::collections::HashMap;
use std::sync::Arc;

use convoy_id::NodeId;
use convoy_structs::{should_drain_node, Allocation, Node, NodeStatus};
use tracing::debug;

use crate::state::{State, StateResult};

/// Work out which nodes under `allocs` force their allocations to move.
///
/// A node that no longer exists is tainted; otherwise the node's status
/// decides. Each distinct node is looked up once. Any lookup error aborts
/// the whole scan.
pub fn tainted_nodes<S>(
    state: &S,
    allocs: &[Arc<Allocation>],
) -> StateResult<HashMap<NodeId, bool>>
where
    S: State + ?Sized,
{
    let mut out = HashMap::new();
    for alloc in allocs {
        if out.contains_key(&alloc.node_id) {
            continue;
        }

        let tainted = match state.node_by_id(&alloc.node_id)? {
            Some(node) => should_drain_node(node.status),
            None => true,
        };
        if tainted {
            debug!(node_id = %alloc.node_id, "Node is tainted");
        }
        out.insert(alloc.node_id, tainted);
    }
    Ok(out)
}

/// All ready nodes in `datacenters`, in datacenter order.
pub fn ready_nodes_in_dcs<S>(state: &S, datacenters: &[String]) -> StateResult<Vec<Arc<Node>>>
where
    S: State + ?Sized,
{
    let mut out = Vec::new();
    for dc in datacenters {
        out.extend(state.nodes_by_datacenter_status(dc, NodeStatus::Ready)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use convoy_structs::Job;
    use rstest::rstest;

    use super::*;
    use crate::state::{MemoryState, NodeIter, StateError};

    /// Wraps a `MemoryState`, counting node lookups and failing chosen reads.
    struct ProbeState {
        inner: MemoryState,
        lookups: RefCell<Vec<NodeId>>,
        fail_node: Option<NodeId>,
        fail_dc: Option<&'static str>,
    }

    impl ProbeState {
        fn new(inner: MemoryState) -> Self {
            Self {
                inner,
                lookups: RefCell::new(Vec::new()),
                fail_node: None,
                fail_dc: None,
            }
        }
    }

    impl State for ProbeState {
        fn nodes_by_datacenter_status(
            &self,
            datacenter: &str,
            status: NodeStatus,
        ) -> StateResult<NodeIter<'_>> {
            if self.fail_dc == Some(datacenter) {
                return Err(StateError::Unavailable(datacenter.to_string()));
            }
            self.inner.nodes_by_datacenter_status(datacenter, status)
        }

        fn node_by_id(&self, id: &NodeId) -> StateResult<Option<Arc<Node>>> {
            self.lookups.borrow_mut().push(*id);
            if self.fail_node == Some(*id) {
                return Err(StateError::Unavailable(id.to_string()));
            }
            self.inner.node_by_id(id)
        }

        fn job_by_name(&self, name: &str) -> StateResult<Option<Arc<Job>>> {
            self.inner.job_by_name(name)
        }

        fn allocs_by_job(&self, job: &str) -> StateResult<Vec<Arc<Allocation>>> {
            self.inner.allocs_by_job(job)
        }
    }

    fn alloc_on(node_id: NodeId, index: u32) -> Arc<Allocation> {
        let job = Arc::new(Job::new("api", 1).with_group("srv", 4));
        Arc::new(Allocation::new(job, "srv", format!("api.srv[{index}]"), node_id))
    }

    #[rstest]
    #[case(NodeStatus::Init, false)]
    #[case(NodeStatus::Ready, false)]
    #[case(NodeStatus::Draining, true)]
    #[case(NodeStatus::Down, true)]
    fn test_taint_follows_status(#[case] status: NodeStatus, #[case] tainted: bool) {
        let state = MemoryState::new();
        let node = state.upsert_node(Node::new("dc1", status));

        let out = tainted_nodes(&state, &[alloc_on(node.id, 0)]).unwrap();

        assert_eq!(out, HashMap::from([(node.id, tainted)]));
    }

    #[test]
    fn test_missing_node_is_tainted() {
        let state = MemoryState::new();
        let gone = NodeId::new();

        let out = tainted_nodes(&state, &[alloc_on(gone, 0)]).unwrap();

        assert!(out[&gone]);
    }

    #[test]
    fn test_each_node_looked_up_once() {
        let memory = MemoryState::new();
        let ready = memory.upsert_node(Node::new("dc1", NodeStatus::Ready));
        let draining = memory.upsert_node(Node::new("dc1", NodeStatus::Draining));
        let state = ProbeState::new(memory);
        let allocs = vec![
            alloc_on(ready.id, 0),
            alloc_on(draining.id, 1),
            alloc_on(ready.id, 2),
            alloc_on(draining.id, 3),
        ];

        let out = tainted_nodes(&state, &allocs).unwrap();

        assert_eq!(out.len(), 2);
        assert!(!out[&ready.id]);
        assert!(out[&draining.id]);
        assert_eq!(state.lookups.borrow().as_slice(), &[ready.id, draining.id]);
    }

    #[test]
    fn test_lookup_error_aborts() {
        let memory = MemoryState::new();
        let ok = memory.upsert_node(Node::new("dc1", NodeStatus::Ready));
        let bad = memory.upsert_node(Node::new("dc1", NodeStatus::Ready));
        let mut state = ProbeState::new(memory);
        state.fail_node = Some(bad.id);

        let result = tainted_nodes(&state, &[alloc_on(ok.id, 0), alloc_on(bad.id, 1)]);

        assert_eq!(result, Err(StateError::Unavailable(bad.id.to_string())));
    }

    #[test]
    fn test_no_allocs_no_lookups() {
        let state = ProbeState::new(MemoryState::new());
        assert!(tainted_nodes(&state, &[]).unwrap().is_empty());
        assert!(state.lookups.borrow().is_empty());
    }

    #[test]
    fn test_ready_nodes_in_dc_order() {
        let state = MemoryState::new();
        let east = state.upsert_node(Node::new("east", NodeStatus::Ready));
        let west = state.upsert_node(Node::new("west", NodeStatus::Ready));
        state.upsert_node(Node::new("west", NodeStatus::Down));
        state.upsert_node(Node::new("north", NodeStatus::Ready));

        let dcs = vec!["west".to_string(), "east".to_string(), "south".to_string()];
        let nodes = ready_nodes_in_dcs(&state, &dcs).unwrap();

        assert_eq!(nodes, vec![west, east]);
    }

    #[test]
    fn test_ready_nodes_error_discards_partial_results() {
        let memory = MemoryState::new();
        memory.upsert_node(Node::new("east", NodeStatus::Ready));
        let mut state = ProbeState::new(memory);
        state.fail_dc = Some("west");

        let dcs = vec!["east".to_string(), "west".to_string()];
        let result = ready_nodes_in_dcs(&state, &dcs);

        assert_eq!(result, Err(StateError::Unavailable("west".to_string())));
    }
}
