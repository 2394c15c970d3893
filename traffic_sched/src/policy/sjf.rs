use crate::metrics::arrivals_in_horizon;
use crate::model::{ActionPlan, IntersectionState, Phase, PhaseId, PolicyParams};
use crate::transition::build_transition;

/// Pick the phase in `rr_cycle_order` with the fewest expected "jobs"
/// (current queue on its axis plus arrivals expected within `sjf_horizon`).
/// Ties go to the earlier entry in the cycle order.
pub fn sjf_schedule(state: &IntersectionState, params: &PolicyParams) -> ActionPlan {
    if params.rr_cycle_order.is_empty() {
        return Vec::new();
    }

    let jobs: Vec<(PhaseId, f64)> = params
        .rr_cycle_order
        .iter()
        .map(|&p| (p, jobs_for_phase(state, p, params.sjf_horizon)))
        .collect();

    let (target, job_count) = jobs
        .iter()
        .fold(None, |best: Option<(PhaseId, f64)>, &(p, j)| match best {
            Some((_, best_j)) if best_j <= j => best,
            _ => Some((p, j)),
        })
        .expect("rr_cycle_order is non-empty");

    let mut plan = build_transition(state.current_phase, target, params);
    let duration = params.clip_green(3.0 * job_count);
    plan.push(Phase::new(target, duration, true));
    plan
}

fn jobs_for_phase(state: &IntersectionState, phase: PhaseId, horizon: f64) -> f64 {
    state.queue_on_axis(phase) as f64 + arrivals_in_horizon(state, phase, horizon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::test_support::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scenario_b_high_variance_picks_same_axis() {
        let params = PolicyParams::default();
        let state = IntersectionState {
            queues: queues(&[
                (Direction::N, 10),
                (Direction::E, 1),
                (Direction::S, 8),
                (Direction::W, 1),
            ]),
            arrival_rates: rates(&[
                (Direction::N, 0.1),
                (Direction::E, 0.01),
                (Direction::S, 0.08),
                (Direction::W, 0.01),
            ]),
            current_phase: PhaseId::EwGreen,
            ..Default::default()
        };

        let plan = sjf_schedule(&state, &params);
        // jobs(EwGreen) = (1+1) + 30*(0.01+0.01) = 2.6; duration = 3*2.6 = 7.8.
        assert_eq!(plan, vec![Phase::new(PhaseId::EwGreen, 7.8, true)]);
    }

    #[test]
    fn ties_break_by_cycle_order() {
        let params = PolicyParams::default();
        // Both phases have zero jobs; the first cycle entry (NsGreen) wins.
        let plan = sjf_schedule(&IntersectionState::default(), &params);
        assert_eq!(plan.last().unwrap().phase, PhaseId::NsGreen);
    }

    #[test]
    fn zero_horizon_reduces_to_current_queue_sjf() {
        let mut params = PolicyParams::default();
        params.sjf_horizon = 0.0;
        let state = IntersectionState {
            queues: queues(&[(Direction::N, 1), (Direction::E, 5), (Direction::W, 5)]),
            arrival_rates: rates(&[(Direction::N, 10.0), (Direction::E, 10.0)]),
            current_phase: PhaseId::EwGreen,
            ..Default::default()
        };
        let plan = sjf_schedule(&state, &params);
        assert_eq!(plan.last().unwrap().phase, PhaseId::NsGreen);
    }
}
