//! Count expansion of task groups into instance names.

use std::collections::HashMap;
use std::sync::Arc;

use convoy_structs::{Job, TaskGroup};

/// Canonical instance name, `<job>.<group>[<index>]`.
pub fn alloc_name(job: &str, group: &str, index: u32) -> String {
    format!("{job}.{group}[{index}]")
}

/// Expand every task group of `job` into one named instance per count.
///
/// Group names are assumed to be unique within the job.
pub fn materialize_task_groups(job: &Job) -> HashMap<String, Arc<TaskGroup>> {
    let mut out = HashMap::with_capacity(job.desired_count());
    for tg in &job.task_groups {
        for i in 0..tg.count {
            out.insert(alloc_name(&job.name, &tg.name, i), Arc::clone(tg));
        }
    }
    out
}
