//! Top-level dispatch: emergency short-circuit, then policy selection from
//! metrics, then delegation to one of the three planners.

use log::{debug, info};

use crate::emergency::{emergency_plan, is_urgent};
use crate::error::SchedulerError;
use crate::metrics::{mean_queue, queue_variance};
use crate::model::{ActionPlan, IntersectionState, PolicyParams, SchedulingPolicy};
use crate::policy::{priority_schedule, round_robin_schedule, sjf_schedule};

/// Stateless scheduler wrapping a fixed `PolicyParams`. Safe to share
/// read-only across threads once constructed.
pub struct Scheduler {
    params: PolicyParams,
    /// Advisory record of every resolved policy + the `sim_time` it was
    /// resolved at. Never consulted by scheduling logic; exists purely for
    /// callers that want to inspect past decisions.
    history: std::cell::RefCell<Vec<(f64, SchedulingPolicy)>>,
    /// `sim_time` observed on the most recent call, used to enforce
    /// monotonicity across calls on the same instance.
    last_sim_time: std::cell::Cell<Option<f64>>,
}

impl Scheduler {
    pub fn new(params: PolicyParams) -> Scheduler {
        Scheduler {
            params,
            history: std::cell::RefCell::new(Vec::new()),
            last_sim_time: std::cell::Cell::new(None),
        }
    }

    pub fn params(&self) -> &PolicyParams {
        &self.params
    }

    /// Advisory history of resolved (non-`Meta`) policies, oldest first.
    pub fn policy_history(&self) -> Vec<(f64, SchedulingPolicy)> {
        self.history.borrow().clone()
    }

    /// Produce the next action plan for `state` under `policy`. Pure aside
    /// from the optional debug-log emission and the advisory history append.
    pub fn schedule(
        &self,
        state: &IntersectionState,
        policy: SchedulingPolicy,
    ) -> Result<ActionPlan, SchedulerError> {
        validate_state(state)?;
        if let Some(last) = self.last_sim_time.get() {
            if state.sim_time < last {
                return Err(SchedulerError::InvalidState(format!(
                    "sim_time regressed from {} to {}",
                    last, state.sim_time
                )));
            }
        }
        self.last_sim_time.set(Some(state.sim_time));

        if self.params.debug {
            debug!("scheduling with policy {}", policy.as_tag());
        }

        if is_urgent(state, &self.params) {
            if self.params.debug {
                info!("urgent emergency detected at sim_time={}", state.sim_time);
            }
            return Ok(emergency_plan(state, &self.params));
        }

        let resolved = match policy {
            SchedulingPolicy::Meta => {
                let chosen = select_policy(state, &self.params);
                if self.params.debug {
                    info!(
                        "meta-scheduler selected {}: {}",
                        chosen.as_tag(),
                        explain_decision(state, policy, &self.params)
                    );
                }
                chosen
            }
            other => other,
        };

        self.history.borrow_mut().push((state.sim_time, resolved));

        let plan = match resolved {
            SchedulingPolicy::RoundRobin => round_robin_schedule(state, &self.params),
            SchedulingPolicy::ShortestJobFirst => sjf_schedule(state, &self.params),
            SchedulingPolicy::Priority => priority_schedule(state, &self.params),
            SchedulingPolicy::Meta => unreachable!("Meta is always resolved above"),
        };

        if plan.is_empty() {
            return Err(SchedulerError::EmptyPlan);
        }
        Ok(plan)
    }

    /// Human-readable explanation of the branch the meta-scheduler would
    /// take for `state`, for debug logs only. Does not itself schedule.
    pub fn explain_decision(&self, state: &IntersectionState, policy: SchedulingPolicy) -> String {
        explain_decision(state, policy, &self.params)
    }
}

fn validate_state(state: &IntersectionState) -> Result<(), SchedulerError> {
    if state.sim_time < 0.0 {
        return Err(SchedulerError::InvalidState(format!(
            "sim_time must be non-negative, got {}",
            state.sim_time
        )));
    }
    for ev in &state.emergency {
        if ev.time_to_intersection < 0.0 {
            return Err(SchedulerError::InvalidState(format!(
                "emergency vehicle {} has negative time_to_intersection {}",
                ev.vehicle_id, ev.time_to_intersection
            )));
        }
    }
    for (dir, waits) in &state.waiting_times {
        if waits.iter().any(|&w| w < 0.0) {
            return Err(SchedulerError::InvalidState(format!(
                "waiting_times[{:?}] contains a negative duration",
                dir
            )));
        }
    }
    Ok(())
}

fn select_policy(state: &IntersectionState, params: &PolicyParams) -> SchedulingPolicy {
    if !state.emergency.is_empty() {
        return SchedulingPolicy::Priority;
    }
    if mean_queue(state) < params.low_load_threshold {
        return SchedulingPolicy::RoundRobin;
    }
    if queue_variance(state) > params.high_variance_threshold {
        return SchedulingPolicy::ShortestJobFirst;
    }
    SchedulingPolicy::Priority
}

fn explain_decision(state: &IntersectionState, _policy: SchedulingPolicy, params: &PolicyParams) -> String {
    if !state.emergency.is_empty() {
        return "Emergency vehicles present - using Priority scheduling".to_string();
    }

    let avg_queue = mean_queue(state);
    let variance = queue_variance(state);

    if avg_queue < params.low_load_threshold {
        format!("Low traffic load (avg={:.1}) - using Round Robin", avg_queue)
    } else if variance > params.high_variance_threshold {
        format!(
            "High queue variance ({:.1}) - using SJF to reduce backlog",
            variance
        )
    } else {
        format!(
            "Balanced conditions (avg={:.1}, var={:.1}) - using Priority",
            avg_queue, variance
        )
    }
}

/// Parse a scheduling-policy tag coming from an external classifier at the
/// policy-oracle boundary.
pub fn parse_policy(tag: &str) -> Result<SchedulingPolicy, SchedulerError> {
    tag.parse::<SchedulingPolicy>()
        .map_err(SchedulerError::UnsupportedPolicy)
}
