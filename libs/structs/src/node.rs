//! Cluster nodes.

use convoy_id::NodeId;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a cluster node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    /// Registered but not yet heartbeating.
    Init,
    /// Healthy and eligible for placements.
    Ready,
    /// Being emptied by an operator.
    Draining,
    /// Missed heartbeats.
    Down,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Ready => "ready",
            Self::Draining => "draining",
            Self::Down => "down",
        }
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether allocations on a node with this status must be moved elsewhere.
pub fn should_drain_node(status: NodeStatus) -> bool {
    match status {
        NodeStatus::Init | NodeStatus::Ready => false,
        NodeStatus::Draining | NodeStatus::Down => true,
    }
}

/// A cluster member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub datacenter: String,
    pub status: NodeStatus,
}

impl Node {
    pub fn new(datacenter: impl Into<String>, status: NodeStatus) -> Self {
        Self {
            id: NodeId::new(),
            datacenter: datacenter.into(),
            status,
        }
    }
}
