//! Generic scheduler for service jobs.
//!
//! The scheduler is responsible for:
//! - Reading the job and its live allocations from cluster state
//! - Reconciling them into place / update / migrate / evict / ignore
//! - Stopping allocations that are unneeded, stale, or on tainted nodes
//! - Asking the placer for a node for every instance that needs one
//! - Submitting the resulting plan, retrying when it hits stale state

use std::sync::Arc;

use convoy_id::NodeId;
use convoy_reconcile::{
    diff_allocs, materialize_task_groups, retry_max, AllocTuple, DiffResult, MaxAttemptsReached,
};
use convoy_structs::{
    AllocDesiredStatus, Allocation, Evaluation, Job, Node, Plan, PlanResult, TaskGroup,
};
use tracing::{debug, info, instrument, warn};

use crate::config::SchedulerConfig;
use crate::nodes::{ready_nodes_in_dcs, tainted_nodes};
use crate::state::{State, StateError};

const ALLOC_NOT_NEEDED: &str = "alloc not needed due to job update";
const ALLOC_UPDATING: &str = "alloc is being updated due to job update";
const ALLOC_MIGRATING: &str = "alloc is being migrated";
const ALLOC_PLACEMENT_FAILED: &str = "failed to find a node for placement";

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Errors that can occur while processing an evaluation.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("planner error: {0}")]
    Planner(#[from] PlannerError),

    #[error(transparent)]
    MaxAttempts(#[from] MaxAttemptsReached),
}

/// Errors a planner reports when it cannot take a plan at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    #[error("plan rejected: {0}")]
    Rejected(String),

    #[error("planner unavailable: {0}")]
    Unavailable(String),
}

/// Commits plans to the replicated store.
pub trait Planner {
    fn submit_plan(&self, plan: &Plan) -> Result<PlanResult, PlannerError>;
}

/// Picks a node for one instance of a task group.
pub trait Placer {
    /// Returns `None` when no node in `nodes` can take the instance.
    fn select_node(&self, nodes: &[Arc<Node>], task_group: &TaskGroup) -> Option<NodeId>;
}

/// Processes evaluations for service jobs.
pub struct GenericScheduler<S, P, L> {
    state: S,
    planner: P,
    placer: L,
    config: SchedulerConfig,
    plan: Option<Plan>,
    diff: Option<DiffResult>,
}

impl<S, P, L> GenericScheduler<S, P, L>
where
    S: State,
    P: Planner,
    L: Placer,
{
    pub fn new(state: S, planner: P, placer: L, config: SchedulerConfig) -> Self {
        Self {
            state,
            planner,
            placer,
            config,
            plan: None,
            diff: None,
        }
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    /// The plan built by the most recent attempt.
    pub fn last_plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    /// The reconciliation computed by the most recent attempt.
    pub fn last_diff(&self) -> Option<&DiffResult> {
        self.diff.as_ref()
    }

    /// Process one evaluation, retrying up to the configured attempt budget.
    #[instrument(
        skip(self, eval),
        fields(eval_id = %eval.id, job = %eval.job_name, triggered_by = ?eval.triggered_by)
    )]
    pub fn process(&mut self, eval: &Evaluation) -> SchedulerResult<()> {
        let attempts = self.config.max_schedule_attempts;
        let result = retry_max(attempts, || self.attempt(eval));
        if let Err(e) = &result {
            warn!(error = %e, "Evaluation failed");
        }
        result
    }

    /// One attempt: returns true once the evaluation needs no more work.
    fn attempt(&mut self, eval: &Evaluation) -> SchedulerResult<bool> {
        let job = self.state.job_by_name(&eval.job_name)?;
        let plan = self.compute_job_allocs(eval, job)?;

        if plan.is_no_op() {
            debug!(failed = plan.failed_allocs.len(), "Plan is a no-op");
            self.plan = Some(plan);
            return Ok(true);
        }

        info!(
            stops = plan.update_count(),
            placements = plan.alloc_count(),
            failed = plan.failed_allocs.len(),
            "Submitting plan"
        );
        let result = self.planner.submit_plan(&plan)?;
        self.plan = Some(plan);

        if let Some(index) = result.refresh_index {
            warn!(refresh_index = %index, "Plan hit stale state, retrying");
            return Ok(false);
        }
        Ok(true)
    }

    fn compute_job_allocs(
        &mut self,
        eval: &Evaluation,
        job: Option<Arc<Job>>,
    ) -> SchedulerResult<Plan> {
        let allocs: Vec<Arc<Allocation>> = self
            .state
            .allocs_by_job(&eval.job_name)?
            .into_iter()
            .filter(|a| !a.desired_status.is_terminal())
            .collect();
        let tainted = tainted_nodes(&self.state, &allocs)?;

        // A deregistered job requires nothing, so everything it still runs
        // gets evicted.
        let job = job.unwrap_or_else(|| Arc::new(Job::new(eval.job_name.clone(), 0)));
        let required = materialize_task_groups(&job);
        let diff = diff_allocs(&job, &tainted, &required, &allocs);
        debug!(%diff, "Reconciled allocations");

        let mut plan = eval.make_plan();
        for (tuples, description) in [
            (&diff.evict, ALLOC_NOT_NEEDED),
            (&diff.update, ALLOC_UPDATING),
            (&diff.migrate, ALLOC_MIGRATING),
        ] {
            for alloc in tuples.iter().filter_map(|t| t.alloc.as_ref()) {
                plan.append_update(alloc, AllocDesiredStatus::Stop, description);
            }
        }

        let mut place: Vec<&AllocTuple> = diff
            .update
            .iter()
            .chain(&diff.migrate)
            .chain(&diff.place)
            .collect();
        if !place.is_empty() {
            place.sort_by(|a, b| a.name.cmp(&b.name));
            self.compute_placements(&job, &place, &mut plan)?;
        }

        self.diff = Some(diff);
        Ok(plan)
    }

    fn compute_placements(
        &self,
        job: &Arc<Job>,
        place: &[&AllocTuple],
        plan: &mut Plan,
    ) -> SchedulerResult<()> {
        let datacenters = if job.datacenters.is_empty() {
            &self.config.default_datacenters
        } else {
            &job.datacenters
        };
        let nodes = ready_nodes_in_dcs(&self.state, datacenters)?;
        debug!(ready_nodes = nodes.len(), placements = place.len(), "Computing placements");

        for tuple in place {
            let Some(tg) = &tuple.task_group else {
                continue;
            };

            match self.placer.select_node(&nodes, tg) {
                Some(node_id) => plan.append_alloc(Allocation::new(
                    Arc::clone(job),
                    tg.name.clone(),
                    tuple.name.clone(),
                    node_id,
                )),
                None => {
                    warn!(
                        alloc = %tuple.name,
                        task_group = %tg.name,
                        "Failed to find a node for placement"
                    );
                    plan.append_failed(tuple.name.clone(), tg.name.clone(), ALLOC_PLACEMENT_FAILED);
                }
            }
        }
        Ok(())
    }
}
