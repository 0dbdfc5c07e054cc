//! Evaluations and the plans they produce.

use std::collections::HashMap;

use convoy_id::{EvalId, Index, NodeId};
use serde::{Deserialize, Serialize};

use crate::{AllocDesiredStatus, Allocation};

/// Why an evaluation was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerReason {
    JobRegister,
    JobDeregister,
    NodeUpdate,
}

/// One reconciliation pass for a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvalId,
    pub job_name: String,
    pub triggered_by: TriggerReason,
}

impl Evaluation {
    pub fn new(job_name: impl Into<String>, triggered_by: TriggerReason) -> Self {
        Self {
            id: EvalId::new(),
            job_name: job_name.into(),
            triggered_by,
        }
    }

    /// Start an empty plan for this evaluation.
    pub fn make_plan(&self) -> Plan {
        Plan::new(self.id)
    }
}

/// An instance no node could take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedPlacement {
    pub name: String,
    pub task_group: String,
    pub reason: String,
}

/// Changes an evaluation wants applied to the cluster.
///
/// `node_update` holds allocations to stop (with their new desired status),
/// `node_allocation` holds new allocations, and `failed_allocs` records
/// instances no node could take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub eval_id: EvalId,
    pub node_update: HashMap<NodeId, Vec<Allocation>>,
    pub node_allocation: HashMap<NodeId, Vec<Allocation>>,
    pub failed_allocs: Vec<FailedPlacement>,
}

impl Plan {
    pub fn new(eval_id: EvalId) -> Self {
        Self {
            eval_id,
            node_update: HashMap::new(),
            node_allocation: HashMap::new(),
            failed_allocs: Vec::new(),
        }
    }

    /// Record that an existing allocation should move to `status`.
    pub fn append_update(
        &mut self,
        alloc: &Allocation,
        status: AllocDesiredStatus,
        description: impl Into<String>,
    ) {
        let mut stopped = alloc.clone();
        stopped.desired_status = status;
        stopped.desired_description = description.into();
        self.node_update
            .entry(alloc.node_id)
            .or_default()
            .push(stopped);
    }

    /// Record a new allocation on its node.
    pub fn append_alloc(&mut self, alloc: Allocation) {
        self.node_allocation
            .entry(alloc.node_id)
            .or_default()
            .push(alloc);
    }

    /// Record an instance that could not be placed.
    pub fn append_failed(
        &mut self,
        name: impl Into<String>,
        task_group: impl Into<String>,
        reason: impl Into<String>,
    ) {
        self.failed_allocs.push(FailedPlacement {
            name: name.into(),
            task_group: task_group.into(),
            reason: reason.into(),
        });
    }

    /// Returns true if submitting the plan would change nothing.
    pub fn is_no_op(&self) -> bool {
        self.node_update.is_empty() && self.node_allocation.is_empty()
    }

    /// Number of allocations being stopped across all nodes.
    pub fn update_count(&self) -> usize {
        self.node_update.values().map(Vec::len).sum()
    }

    /// Number of new allocations across all nodes.
    pub fn alloc_count(&self) -> usize {
        self.node_allocation.values().map(Vec::len).sum()
    }
}

/// What the planner actually committed from a submitted plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResult {
    pub node_update: HashMap<NodeId, Vec<Allocation>>,
    pub node_allocation: HashMap<NodeId, Vec<Allocation>>,

    /// Set when part of the plan was rejected because the scheduler worked
    /// from a stale snapshot; the scheduler must refresh to at least this
    /// index and try again.
    pub refresh_index: Option<Index>,
}

impl PlanResult {
    /// A result that commits every change in `plan`.
    pub fn committed(plan: &Plan) -> Self {
        Self {
            node_update: plan.node_update.clone(),
            node_allocation: plan.node_allocation.clone(),
            refresh_index: None,
        }
    }
}
