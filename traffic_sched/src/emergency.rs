//! Emergency preemption: detects urgency, resolves multi-direction conflicts
//! via FCFS, and produces a plan ending in a non-preemptable green.

use crate::model::{
    directions_with_emergency, emergencies_by_direction, ActionPlan, EmergencyVehicle,
    IntersectionState, Phase, PhaseId, PolicyParams,
};
use crate::transition::build_transition;

/// An emergency is urgent if its ETA is within the preempt buffer, or its
/// direction already has a queued vehicle.
pub fn is_urgent(state: &IntersectionState, params: &PolicyParams) -> bool {
    state.emergency.iter().any(|ev| {
        ev.time_to_intersection <= params.emergency_preempt_buffer || state.queue(ev.direction) > 0
    })
}

/// Build the preemption plan. Caller must have already confirmed
/// `state.emergency` is non-empty (normally via `is_urgent`).
pub fn emergency_plan(state: &IntersectionState, params: &PolicyParams) -> ActionPlan {
    let by_direction = emergencies_by_direction(&state.emergency);
    let target_direction = select_direction(state, &by_direction);
    let target = PhaseId::for_direction(target_direction);

    let mut plan = build_transition(state.current_phase, target, params);

    let count_in_direction = by_direction
        .get(&target_direction)
        .map(|v| v.len())
        .unwrap_or(0) as f64;
    let duration =
        params.clip_green(params.emergency_clear_duration + 5.0 * (count_in_direction - 1.0));
    plan.push(Phase::new(target, duration, false));
    plan
}

fn select_direction(
    state: &IntersectionState,
    by_direction: &std::collections::BTreeMap<crate::model::Direction, Vec<&EmergencyVehicle>>,
) -> crate::model::Direction {
    if directions_with_emergency(&state.emergency).len() > 1 {
        // Multiple directions: first-come-first-served on ETA across the
        // whole set.
        state
            .emergency
            .iter()
            .min_by(|a, b| a.time_to_intersection.partial_cmp(&b.time_to_intersection).unwrap())
            .expect("non-empty emergency set")
            .direction
    } else {
        // Single direction: break ties within it by (eta, priority).
        by_direction
            .values()
            .next()
            .expect("non-empty emergency set")
            .iter()
            .min_by(|a, b| {
                (a.time_to_intersection, a.priority)
                    .partial_cmp(&(b.time_to_intersection, b.priority))
                    .unwrap()
            })
            .expect("non-empty direction group")
            .direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::test_support::*;
    use pretty_assertions::assert_eq;

    fn base_state(emergency: Vec<EmergencyVehicle>, current_phase: PhaseId) -> IntersectionState {
        IntersectionState {
            queues: queues(&[
                (Direction::N, 2),
                (Direction::E, 3),
                (Direction::S, 1),
                (Direction::W, 2),
            ]),
            emergency,
            current_phase,
            ..Default::default()
        }
    }

    #[test]
    fn scenario_c_urgent_cross_axis() {
        let params = PolicyParams::default();
        let state = base_state(vec![ev(Direction::N, 4.0, "EMG001", 1)], PhaseId::EwGreen);
        assert!(is_urgent(&state, &params));

        let plan = emergency_plan(&state, &params);
        assert_eq!(
            plan,
            vec![
                Phase::new(PhaseId::EwYellow, 3.0, false),
                Phase::new(PhaseId::AllRed, 1.0, false),
                Phase::new(PhaseId::NsGreen, 15.0, false),
            ]
        );
    }

    #[test]
    fn scenario_d_two_emergencies_fcfs() {
        let params = PolicyParams::default();
        let state = base_state(
            vec![ev(Direction::E, 8.0, "e1", 1), ev(Direction::N, 5.0, "e2", 1)],
            PhaseId::EwGreen,
        );
        let plan = emergency_plan(&state, &params);
        assert_eq!(
            plan,
            vec![
                Phase::new(PhaseId::EwYellow, 3.0, false),
                Phase::new(PhaseId::AllRed, 1.0, false),
                Phase::new(PhaseId::NsGreen, 15.0, false),
            ]
        );
    }

    #[test]
    fn single_direction_ties_break_on_priority() {
        let params = PolicyParams::default();
        let state = base_state(
            vec![
                ev(Direction::N, 5.0, "low-priority", 5),
                ev(Direction::N, 5.0, "high-priority", 1),
            ],
            PhaseId::NsGreen,
        );
        let plan = emergency_plan(&state, &params);
        // Two emergencies in the same direction: duration bonus of 5*(2-1).
        assert_eq!(plan, vec![Phase::new(PhaseId::NsGreen, 20.0, false)]);
    }

    #[test]
    fn queued_direction_without_close_eta_is_urgent() {
        let params = PolicyParams::default();
        // ETA well outside the buffer, but N already has a queued vehicle.
        let state = base_state(vec![ev(Direction::N, 50.0, "e1", 1)], PhaseId::EwGreen);
        assert!(is_urgent(&state, &params));
    }
}
