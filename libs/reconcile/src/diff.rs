//! Set difference between required instances and existing allocations.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use convoy_id::NodeId;
use convoy_structs::{Allocation, Job, TaskGroup};

/// One classified instance.
///
/// `task_group` is unset for evictions and `alloc` is unset for placements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocTuple {
    pub name: String,
    pub task_group: Option<Arc<TaskGroup>>,
    pub alloc: Option<Arc<Allocation>>,
}

/// What has to happen to an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocAction {
    /// Required but no allocation exists.
    Place,
    /// Allocation was created from an older version of the job.
    Update,
    /// Allocation sits on a node that is gone or draining.
    Migrate,
    /// Allocation is no longer required.
    Evict,
    /// Allocation is up to date.
    Ignore,
}

/// The five-way classification of required ∪ existing.
///
/// The order within each set carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    pub place: Vec<AllocTuple>,
    pub update: Vec<AllocTuple>,
    pub migrate: Vec<AllocTuple>,
    pub evict: Vec<AllocTuple>,
    pub ignore: Vec<AllocTuple>,
}

impl DiffResult {
    /// Total number of classified instances.
    pub fn len(&self) -> usize {
        self.place.len()
            + self.update.len()
            + self.migrate.len()
            + self.evict.len()
            + self.ignore.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the tuples tagged with the action they were classified as.
    pub fn iter(&self) -> impl Iterator<Item = (AllocAction, &AllocTuple)> {
        tagged(AllocAction::Place, &self.place)
            .chain(tagged(AllocAction::Update, &self.update))
            .chain(tagged(AllocAction::Migrate, &self.migrate))
            .chain(tagged(AllocAction::Evict, &self.evict))
            .chain(tagged(AllocAction::Ignore, &self.ignore))
    }

    fn push(&mut self, action: AllocAction, tuple: AllocTuple) {
        match action {
            AllocAction::Place => self.place.push(tuple),
            AllocAction::Update => self.update.push(tuple),
            AllocAction::Migrate => self.migrate.push(tuple),
            AllocAction::Evict => self.evict.push(tuple),
            AllocAction::Ignore => self.ignore.push(tuple),
        }
    }
}

fn tagged(
    action: AllocAction,
    set: &[AllocTuple],
) -> impl Iterator<Item = (AllocAction, &AllocTuple)> {
    set.iter().map(move |tuple| (action, tuple))
}

impl std::fmt::Display for DiffResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(place {}) (update {}) (migrate {}) (evict {}) (ignore {})",
            self.place.len(),
            self.update.len(),
            self.migrate.len(),
            self.evict.len(),
            self.ignore.len()
        )
    }
}

/// Classify existing allocations against the required instances of `job`.
///
/// Each existing allocation is checked in order, first match wins:
///
/// 1. its name is not required: evict
/// 2. its node is tainted: migrate
/// 3. it was created from a different `modify_index` of the job: update
/// 4. otherwise: ignore
///
/// Every required name without an allocation is then placed.
///
/// Rule 3 is deliberately coarse. Any change to the job updates every
/// allocation, even when the edit didn't touch that allocation's task group.
pub fn diff_allocs(
    job: &Job,
    tainted_nodes: &HashMap<NodeId, bool>,
    required: &HashMap<String, Arc<TaskGroup>>,
    allocs: &[Arc<Allocation>],
) -> DiffResult {
    let mut result = DiffResult::default();
    let mut existing = HashSet::with_capacity(allocs.len());

    for exist in allocs {
        existing.insert(exist.name.as_str());

        let Some(tg) = required.get(&exist.name) else {
            result.push(
                AllocAction::Evict,
                AllocTuple {
                    name: exist.name.clone(),
                    task_group: None,
                    alloc: Some(Arc::clone(exist)),
                },
            );
            continue;
        };

        let action = if tainted_nodes.get(&exist.node_id).copied().unwrap_or(false) {
            AllocAction::Migrate
        } else if job.modify_index != exist.job.modify_index {
            AllocAction::Update
        } else {
            AllocAction::Ignore
        };

        result.push(
            action,
            AllocTuple {
                name: exist.name.clone(),
                task_group: Some(Arc::clone(tg)),
                alloc: Some(Arc::clone(exist)),
            },
        );
    }

    for (name, tg) in required {
        if !existing.contains(name.as_str()) {
            result.push(
                AllocAction::Place,
                AllocTuple {
                    name: name.clone(),
                    task_group: Some(Arc::clone(tg)),
                    alloc: None,
                },
            );
        }
    }

    result
}
