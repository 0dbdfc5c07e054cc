//! Allocations: task-group instances bound to nodes.

use std::sync::Arc;

use convoy_id::{AllocId, NodeId};
use serde::{Deserialize, Serialize};

use crate::Job;

/// What the scheduler wants an allocation to be doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocDesiredStatus {
    #[default]
    Run,
    Stop,
}

impl AllocDesiredStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Stop => "stop",
        }
    }

    /// Returns true if the allocation should no longer be running.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Run)
    }
}

impl std::fmt::Display for AllocDesiredStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete binding of one desired instance to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: AllocId,

    /// Canonical instance name, `<job>.<group>[<index>]`.
    pub name: String,

    pub node_id: NodeId,

    pub task_group: String,

    /// The job exactly as it was when this allocation was created.
    pub job: Arc<Job>,

    pub desired_status: AllocDesiredStatus,

    #[serde(default)]
    pub desired_description: String,
}

impl Allocation {
    /// Create a running allocation with a fresh ID.
    pub fn new(
        job: Arc<Job>,
        task_group: impl Into<String>,
        name: impl Into<String>,
        node_id: NodeId,
    ) -> Self {
        Self {
            id: AllocId::new(),
            name: name.into(),
            node_id,
            task_group: task_group.into(),
            job,
            desired_status: AllocDesiredStatus::Run,
            desired_description: String::new(),
        }
    }
}
