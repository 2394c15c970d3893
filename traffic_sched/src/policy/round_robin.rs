use crate::model::{ActionPlan, IntersectionState, Phase, PolicyParams};
use crate::transition::build_transition;

/// Advance to the next phase in `rr_cycle_order`. Falls back to cycle index 0
/// when `current_phase` isn't in the cycle at all (e.g. mid-yellow or
/// all-red).
pub fn round_robin_schedule(state: &IntersectionState, params: &PolicyParams) -> ActionPlan {
    let cycle = &params.rr_cycle_order;
    if cycle.is_empty() {
        return Vec::new();
    }

    let next_index = match cycle.iter().position(|&p| p == state.current_phase) {
        Some(idx) => (idx + 1) % cycle.len(),
        None => 0,
    };
    let target = cycle[next_index];

    let mut plan = build_transition(state.current_phase, target, params);

    let queue_total = state.queue_on_axis(target) as f64;
    let duration = params.clip_green(params.min_green + 2.0 * queue_total);
    plan.push(Phase::new(target, duration, true));
    plan
}
