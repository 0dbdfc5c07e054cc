//! Jobs and task groups.

use std::sync::Arc;

use convoy_id::Index;
use serde::{Deserialize, Serialize};

/// A named unit of desired work with a replica count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskGroup {
    pub name: String,
    pub count: u32,
}

impl TaskGroup {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Snapshot of a job's desired specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,

    /// Bumped on every write to the job.
    pub modify_index: Index,

    /// Datacenters the job may be placed in. Empty means the scheduler
    /// default.
    #[serde(default)]
    pub datacenters: Vec<String>,

    pub task_groups: Vec<Arc<TaskGroup>>,
}

impl Job {
    /// Create a job with no task groups.
    pub fn new(name: impl Into<String>, modify_index: u64) -> Self {
        Self {
            name: name.into(),
            modify_index: Index::new(modify_index),
            datacenters: Vec::new(),
            task_groups: Vec::new(),
        }
    }

    /// Add a task group.
    #[must_use]
    pub fn with_group(mut self, name: impl Into<String>, count: u32) -> Self {
        self.task_groups.push(Arc::new(TaskGroup::new(name, count)));
        self
    }

    /// Set the datacenters the job may run in.
    #[must_use]
    pub fn with_datacenters<I, S>(mut self, dcs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.datacenters = dcs.into_iter().map(Into::into).collect();
        self
    }

    /// Total number of instances the job asks for.
    pub fn desired_count(&self) -> usize {
        self.task_groups.iter().map(|tg| tg.count as usize).sum()
    }
}
