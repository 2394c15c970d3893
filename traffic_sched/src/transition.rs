//! Inserts safety phases (yellow, all-red) between any two incompatible
//! greens. Never emits a green itself; callers append the target green.

use crate::model::{ActionPlan, Phase, PhaseId, PolicyParams};

pub fn build_transition(current_phase: PhaseId, target_green: PhaseId, params: &PolicyParams) -> ActionPlan {
    if current_phase == target_green {
        return Vec::new();
    }
    if current_phase == PhaseId::AllRed {
        return Vec::new();
    }

    let mut plan = Vec::new();
    if let Some(yellow) = current_phase.same_axis_yellow_checked() {
        plan.push(Phase::new(yellow, params.yellow_duration, false));
    }
    plan.push(Phase::new(PhaseId::AllRed, params.all_red_duration, false));
    plan
}
